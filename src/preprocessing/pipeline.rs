use image::{DynamicImage, GrayImage};
use std::time::Instant;

use super::steps;
use crate::error::OcrError;

/// Clean up a decoded photo for text recognition.
///
/// Runs grayscale conversion, noise smoothing, adaptive binarization and a
/// morphological closing, in that order. The chain is advisory: if any step
/// rejects the input, the original image is returned unchanged and the
/// engine gets a best-effort input instead of the request failing.
pub fn preprocess(image: &DynamicImage) -> DynamicImage {
    let start = Instant::now();

    match run_chain(image) {
        Ok(cleaned) => {
            tracing::debug!(
                "preprocessed {}x{} image in {}ms",
                image.width(),
                image.height(),
                start.elapsed().as_millis()
            );
            DynamicImage::ImageLuma8(cleaned)
        }
        Err(e) => {
            tracing::warn!("preprocessing failed, passing original image through: {e}");
            image.clone()
        }
    }
}

/// The transform chain proper. This is the only place preprocessing errors
/// are allowed to surface; `preprocess` absorbs them.
fn run_chain(image: &DynamicImage) -> Result<GrayImage, OcrError> {
    let gray = steps::grayscale::apply(image)?;
    let smoothed = steps::smooth::apply(&gray)?;
    let binary = steps::threshold::apply(&smoothed)?;
    steps::close::apply(&binary)
}
