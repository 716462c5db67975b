//! ocrs-backed recognition engine
//!
//! Pure Rust text recognition using the ocrs library. No system dependencies
//! required; the neural network models are downloaded on first use and
//! cached.

use crate::config::Config;
use crate::engine::{Languages, RecognitionEngine, RecognitionHit, Region};
use crate::error::OcrError;
use image::DynamicImage;
use ocrs::{DecodeMethod, ImageSource, OcrEngine as OcrsOcrEngine, OcrEngineParams};
use rten::Model;
use rten_imageproc::{BoundingRect, RotatedRect};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Default model URLs from the ocrs project
const DETECTION_MODEL_URL: &str =
    "https://ocrs-models.s3-accelerate.amazonaws.com/text-detection.rten";
const RECOGNITION_MODEL_URL: &str =
    "https://ocrs-models.s3-accelerate.amazonaws.com/text-recognition.rten";

/// Recognition engine wrapping the ocrs library
pub struct OcrsEngine {
    engine: OcrsOcrEngine,
}

impl OcrsEngine {
    /// Create the engine, downloading models if they are not cached yet
    pub fn new(_config: &Config) -> Result<Self, OcrError> {
        tracing::info!("Initializing ocrs engine...");

        let detection_model_path =
            ensure_model_downloaded(DETECTION_MODEL_URL, "text-detection.rten")?;
        let recognition_model_path =
            ensure_model_downloaded(RECOGNITION_MODEL_URL, "text-recognition.rten")?;

        let detection_model = Model::load_file(&detection_model_path)
            .map_err(|e| OcrError::InitFailed(format!("failed to load detection model: {e}")))?;
        let recognition_model = Model::load_file(&recognition_model_path)
            .map_err(|e| OcrError::InitFailed(format!("failed to load recognition model: {e}")))?;

        let engine = OcrsOcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            decode_method: DecodeMethod::Greedy,
            ..Default::default()
        })
        .map_err(|e| OcrError::InitFailed(format!("failed to create ocrs engine: {e}")))?;

        tracing::info!("ocrs engine ready");

        Ok(Self { engine })
    }
}

impl RecognitionEngine for OcrsEngine {
    fn name(&self) -> &'static str {
        "ocrs"
    }

    fn description(&self) -> &'static str {
        "Pure Rust text recognition, no system dependencies required"
    }

    fn detect(
        &self,
        image: &DynamicImage,
        languages: &Languages,
    ) -> Result<Vec<RecognitionHit>, OcrError> {
        if !self.supported_languages().contains(&languages.primary) {
            tracing::warn!(
                "ocrs cannot recognize '{}', falling back to Latin-script recognition",
                languages.primary
            );
        }

        let rgb = image.to_rgb8();
        let dimensions = rgb.dimensions();

        let source = ImageSource::from_bytes(rgb.as_raw(), dimensions)
            .map_err(|e| OcrError::EngineUnavailable(format!("failed to build input: {e}")))?;
        let input = self
            .engine
            .prepare_input(source)
            .map_err(|e| OcrError::EngineUnavailable(format!("failed to prepare input: {e}")))?;

        let word_rects = self
            .engine
            .detect_words(&input)
            .map_err(|e| OcrError::EngineUnavailable(format!("word detection failed: {e}")))?;
        let line_rects = self.engine.find_text_lines(&input, &word_rects);
        let line_texts = self
            .engine
            .recognize_text(&input, &line_rects)
            .map_err(|e| OcrError::EngineUnavailable(format!("text recognition failed: {e}")))?;

        let mut hits = Vec::new();
        for (words, line) in line_rects.iter().zip(&line_texts) {
            let Some(line) = line else { continue };
            if words.is_empty() {
                continue;
            }

            let text = line
                .words()
                .map(|word| word.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            if text.trim().is_empty() {
                continue;
            }

            let confidence = estimate_confidence(&text);
            hits.push(RecognitionHit::new(line_region(words), text, confidence));
        }

        tracing::debug!("ocrs detected {} text lines", hits.len());

        Ok(hits)
    }

    fn supported_languages(&self) -> Vec<String> {
        // The published models cover the Latin alphabet only
        vec!["en".to_string()]
    }
}

/// Axis-aligned box around all word rects of one line. `words` must be
/// non-empty.
fn line_region(words: &[RotatedRect]) -> Region {
    let mut rect = words[0].bounding_rect();
    for word in &words[1..] {
        rect = rect.union(word.bounding_rect());
    }
    Region {
        x: rect.left() as i32,
        y: rect.top() as i32,
        width: rect.width() as u32,
        height: rect.height() as u32,
    }
}

/// Estimate how trustworthy a recognized line is.
///
/// ocrs does not expose per-line scores, so this scores the shape of the
/// text itself: the share of readable characters, whether it splits into
/// plausible words, and runs of one repeated character that usually mean
/// the decoder got stuck.
fn estimate_confidence(text: &str) -> f32 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    // Too short to judge either way
    if total < 4 {
        return 0.5;
    }

    let readable = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || c.is_ascii_punctuation())
        .count();
    let readable_score = readable as f32 / total as f32;

    let words: Vec<&str> = text.split_whitespace().collect();
    let word_score = if words.is_empty() {
        0.0
    } else {
        let avg =
            words.iter().map(|w| w.chars().count()).sum::<usize>() as f32 / words.len() as f32;
        if avg < 2.0 {
            // Lines of one-character fragments are usually stroke noise
            0.3
        } else if avg <= 9.0 {
            1.0
        } else {
            0.6
        }
    };

    let repeat_score = match longest_run(text) {
        0..=3 => 1.0,
        4..=6 => 0.6,
        _ => 0.2,
    };

    (0.6 * readable_score + 0.25 * word_score + 0.15 * repeat_score).clamp(0.0, 1.0)
}

/// Length of the longest run of one repeated non-whitespace character
fn longest_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut prev: Option<char> = None;

    for c in text.chars() {
        if Some(c) == prev && !c.is_whitespace() {
            current += 1;
        } else {
            current = 1;
        }
        longest = longest.max(current);
        prev = Some(c);
    }

    longest
}

/// Return the cached model path, downloading it first if needed
fn ensure_model_downloaded(url: &str, filename: &str) -> Result<std::path::PathBuf, OcrError> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("handwriting-ocr");

    std::fs::create_dir_all(&cache_dir)
        .map_err(|e| OcrError::InitFailed(format!("failed to create cache directory: {e}")))?;

    let model_path = cache_dir.join(filename);

    if !model_path.exists() {
        tracing::info!("Downloading {} (this may take a moment)...", filename);
        download_file(url, &model_path)?;
        tracing::info!("Downloaded {} to {:?}", filename, model_path);
    } else {
        tracing::info!("Using cached model from {:?}", model_path);
    }

    Ok(model_path)
}

/// Download a file from URL to path using ureq
fn download_file(url: &str, path: &Path) -> Result<(), OcrError> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| OcrError::InitFailed(format!("failed to download model: {e}")))?;

    let mut file = File::create(path)
        .map_err(|e| OcrError::InitFailed(format!("failed to create model file: {e}")))?;

    let buffer = response
        .into_body()
        .read_to_vec()
        .map_err(|e| OcrError::InitFailed(format!("failed to read model body: {e}")))?;

    file.write_all(&buffer)
        .map_err(|e| OcrError::InitFailed(format!("failed to write model file: {e}")))?;

    Ok(())
}
