use crate::error::OcrError;
use image::DynamicImage;
use serde::Serialize;

/// Axis-aligned bounding box of one detection, in pixel coordinates of the
/// image handed to the engine. Carried through to the response untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// One engine-reported detection: where, what, and how sure.
#[derive(Debug, Clone, Serialize)]
pub struct RecognitionHit {
    pub region: Region,
    pub text: String,
    /// In [0.0, 1.0].
    pub confidence: f32,
}

impl RecognitionHit {
    pub fn new(region: Region, text: impl Into<String>, confidence: f32) -> Self {
        Self {
            region,
            text: text.into(),
            confidence,
        }
    }
}

/// Language pair requested for recognition. Engines that cannot honor a
/// language fall back to what they support and say so in the logs.
#[derive(Debug, Clone)]
pub struct Languages {
    pub primary: String,
    pub secondary: String,
}

impl Languages {
    /// Parse a "primary,secondary" override as sent by clients.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split(',').map(str::trim).filter(|p| !p.is_empty());
        let primary = parts.next()?.to_string();
        let secondary = parts.next().unwrap_or("en").to_string();
        Some(Self { primary, secondary })
    }
}

/// Trait that all recognition engines must implement.
///
/// The pipeline receives an engine as an explicit parameter, so everything
/// up to the engine call can be tested against a stub implementation.
pub trait RecognitionEngine: Send + Sync {
    /// Returns the engine identifier (e.g., "ocrs")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the engine
    fn description(&self) -> &'static str;

    /// Detect text in an image and return one hit per recognized line
    fn detect(
        &self,
        image: &DynamicImage,
        languages: &Languages,
    ) -> Result<Vec<RecognitionHit>, OcrError>;

    /// Get supported languages
    fn supported_languages(&self) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_languages_parse_pair() {
        let langs = Languages::parse("si, en").unwrap();
        assert_eq!(langs.primary, "si");
        assert_eq!(langs.secondary, "en");
    }

    #[test]
    fn test_languages_parse_single_defaults_secondary() {
        let langs = Languages::parse("ta").unwrap();
        assert_eq!(langs.primary, "ta");
        assert_eq!(langs.secondary, "en");
    }

    #[test]
    fn test_languages_parse_empty_is_none() {
        assert!(Languages::parse("").is_none());
        assert!(Languages::parse(" , ").is_none());
    }
}
