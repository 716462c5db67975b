use crate::error::OcrError;
use image::{DynamicImage, GrayImage};

/// Convert image to single-channel luminance
/// This is the foundation for the rest of the chain
pub fn apply(image: &DynamicImage) -> Result<GrayImage, OcrError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(OcrError::PreprocessingFailed(
            "image has zero width or height".to_string(),
        ));
    }

    match image {
        // Already single-channel: copy, the caller keeps its buffer
        DynamicImage::ImageLuma8(gray) => Ok(gray.clone()),
        // Standard 8-bit layouts convert with the usual luminance weighting
        DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_) => Ok(image.to_luma8()),
        other => Err(OcrError::PreprocessingFailed(format!(
            "unsupported pixel layout: {:?}",
            other.color()
        ))),
    }
}
