use std::sync::Arc;

use crate::aggregate;
use crate::engine::{Languages, RecognitionEngine};
use crate::error::OcrError;
use crate::preprocessing;

/// Final result of one recognition request, ready to be rendered.
#[derive(Debug, Clone)]
pub struct RecognizedText {
    /// Accepted lines in the engine's detection order
    pub lines: Vec<String>,
    pub word_count: usize,
    pub mean_confidence: f32,
}

impl RecognizedText {
    /// Render the reply block shown to the person who sent the image.
    pub fn to_message(&self) -> String {
        format!(
            "Recognized Text:\n\n{}\n\nConfidence: {:.1}%\nWords found: {}\n\n\
             Tip: If the result isn't accurate, try taking a clearer photo with better lighting!",
            self.lines.join("\n"),
            self.mean_confidence * 100.0,
            self.word_count
        )
    }
}

/// Run one image through decode, preprocessing, the recognition engine and
/// aggregation.
///
/// The engine is passed in explicitly so everything up to the engine call
/// can be exercised with a stub. The engine call runs on the blocking pool;
/// a slow model only suspends its own request. Steps are strictly
/// sequential and there are no retries here.
pub async fn run(
    bytes: &[u8],
    engine: Arc<dyn RecognitionEngine>,
    languages: &Languages,
    threshold: f32,
) -> Result<RecognizedText, OcrError> {
    let image = image::load_from_memory(bytes).map_err(|e| {
        tracing::warn!("image decode failed: {e}");
        OcrError::DecodeFailed(e.to_string())
    })?;

    // Advisory cleanup; falls back to the original image rather than failing
    let cleaned = preprocessing::preprocess(&image);

    let languages = languages.clone();
    let detected = tokio::task::spawn_blocking(move || engine.detect(&cleaned, &languages))
        .await
        .map_err(|e| OcrError::EngineUnavailable(format!("recognition task failed: {e}")))?;

    let hits = match detected {
        Ok(hits) => hits,
        Err(e) => {
            tracing::error!("recognition engine call failed: {e}");
            return Err(match e {
                OcrError::EngineUnavailable(_) => e,
                other => OcrError::EngineUnavailable(other.to_string()),
            });
        }
    };

    let summary = aggregate::aggregate(&hits, threshold);
    if summary.accepted == 0 {
        tracing::info!("no detection cleared the confidence threshold {threshold}");
        return Err(OcrError::NoTextFound);
    }

    Ok(RecognizedText {
        word_count: summary.accepted,
        mean_confidence: summary.mean_confidence,
        lines: summary.lines,
    })
}
