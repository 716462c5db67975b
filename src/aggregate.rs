use crate::engine::RecognitionHit;
use serde::Serialize;

/// Default minimum confidence (exclusive) for keeping a detection
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.3;

/// Filtered view of one engine run
#[derive(Debug, Clone, Serialize)]
pub struct RecognitionSummary {
    /// Accepted text, trimmed, in the engine's detection order
    pub lines: Vec<String>,
    /// Number of accepted detections
    pub accepted: usize,
    /// Arithmetic mean confidence over accepted detections, 0.0 when none
    pub mean_confidence: f32,
}

/// Filter engine hits by confidence and summarize what is left.
///
/// A hit is kept iff its confidence is strictly greater than `threshold`.
/// No deduplication and no spatial reordering happen here; the engine
/// already resolved per-region text and its order is preserved.
pub fn aggregate(hits: &[RecognitionHit], threshold: f32) -> RecognitionSummary {
    let mut lines = Vec::new();
    let mut confidence_sum = 0.0f32;

    for hit in hits {
        if hit.confidence > threshold {
            lines.push(hit.text.trim().to_string());
            confidence_sum += hit.confidence;
        }
    }

    let accepted = lines.len();
    let mean_confidence = if accepted > 0 {
        confidence_sum / accepted as f32
    } else {
        0.0
    };

    RecognitionSummary {
        lines,
        accepted,
        mean_confidence,
    }
}
