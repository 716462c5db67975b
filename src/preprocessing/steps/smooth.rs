use crate::error::OcrError;
use image::GrayImage;
use imageproc::filter::separable_filter_equal;

/// 5-tap binomial approximation of a Gaussian, normalized to 1
const KERNEL: [f32; 5] = [0.0625, 0.25, 0.375, 0.25, 0.0625];

/// Apply a 5x5 Gaussian blur to knock down sensor and paper-texture noise
/// before binarization, while keeping stroke edges at photo resolutions
pub fn apply(image: &GrayImage) -> Result<GrayImage, OcrError> {
    Ok(separable_filter_equal(image, &KERNEL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_smooth_preserves_dimensions() {
        let img = GrayImage::new(37, 21);
        let result = apply(&img).unwrap();
        assert_eq!(result.dimensions(), (37, 21));
    }

    #[test]
    fn test_smooth_leaves_uniform_image_unchanged() {
        let img = GrayImage::from_pixel(16, 16, Luma([200]));
        let result = apply(&img).unwrap();
        for pixel in result.pixels() {
            assert_eq!(pixel.0[0], 200);
        }
    }

    #[test]
    fn test_smooth_spreads_isolated_peak() {
        let mut img = GrayImage::from_pixel(11, 11, Luma([0]));
        img.put_pixel(5, 5, Luma([255]));

        let result = apply(&img).unwrap();

        // Peak is attenuated, neighbors pick up part of it
        assert!(result.get_pixel(5, 5).0[0] < 255);
        assert!(result.get_pixel(4, 5).0[0] > 0);
        assert!(result.get_pixel(5, 4).0[0] > 0);
        // Far corners stay untouched by a 5x5 kernel
        assert_eq!(result.get_pixel(0, 0).0[0], 0);
    }
}
