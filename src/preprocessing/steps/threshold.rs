use crate::error::OcrError;
use image::{GrayImage, Luma};

/// Adaptive threshold parameters
const WINDOW_SIZE: u32 = 11;
const SIGMA: f32 = 2.0;
/// Subtracted from the local mean before comparison
const BIAS: f32 = 2.0;

/// Binarize against a Gaussian-weighted local mean
///
/// A global cutoff fails on handwriting photos because lighting varies
/// across the page; comparing each pixel to its own 11x11 neighborhood
/// keeps strokes separable in both the bright and the shaded regions.
pub fn apply(image: &GrayImage) -> Result<GrayImage, OcrError> {
    let (width, height) = image.dimensions();
    let mean = gaussian_local_mean(image);

    Ok(GrayImage::from_fn(width, height, |x, y| {
        let reference = mean[(y * width + x) as usize] - BIAS;
        if image.get_pixel(x, y).0[0] as f32 > reference {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    }))
}

/// Normalized 1-D Gaussian kernel of the configured window size
fn gaussian_kernel(size: u32, sigma: f32) -> Vec<f32> {
    let half = (size / 2) as i32;
    let mut kernel: Vec<f32> = (-half..=half)
        .map(|i| (-(i * i) as f32 / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

/// Gaussian-weighted mean of each pixel's window, computed as two separable
/// passes with replicated borders.
fn gaussian_local_mean(img: &GrayImage) -> Vec<f32> {
    let (width, height) = img.dimensions();
    let (w, h) = (width as i32, height as i32);
    let kernel = gaussian_kernel(WINDOW_SIZE, SIGMA);
    let half = (WINDOW_SIZE / 2) as i32;

    // Horizontal pass
    let mut rows = vec![0.0f32; (width * height) as usize];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let sx = (x + k as i32 - half).clamp(0, w - 1);
                acc += weight * img.get_pixel(sx as u32, y as u32).0[0] as f32;
            }
            rows[(y * w + x) as usize] = acc;
        }
    }

    // Vertical pass
    let mut mean = vec![0.0f32; (width * height) as usize];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let sy = (y + k as i32 - half).clamp(0, h - 1);
                acc += weight * rows[(sy * w + x) as usize];
            }
            mean[(y * w + x) as usize] = acc;
        }
    }

    mean
}
