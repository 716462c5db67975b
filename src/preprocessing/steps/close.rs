use crate::error::OcrError;
use image::GrayImage;

/// Morphological closing with a 2x2 structuring element
///
/// Thresholding leaves pinhole specks inside otherwise solid regions; one
/// dilate/erode round with a small element removes them without materially
/// thickening strokes. The erosion window mirrors the dilation window so
/// shapes stay in place.
pub fn apply(image: &GrayImage) -> Result<GrayImage, OcrError> {
    Ok(erode(&dilate(image)))
}

/// Max over the 2x2 window anchored at the pixel, clamped at the borders
fn dilate(img: &GrayImage) -> GrayImage {
    let (width, height) = img.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let mut max = 0u8;
        for dy in 0..2 {
            for dx in 0..2 {
                let sx = (x + dx).min(width - 1);
                let sy = (y + dy).min(height - 1);
                max = max.max(img.get_pixel(sx, sy).0[0]);
            }
        }
        image::Luma([max])
    })
}

/// Min over the mirrored 2x2 window, clamped at the borders
fn erode(img: &GrayImage) -> GrayImage {
    let (width, height) = img.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let mut min = 255u8;
        for dy in 0..2 {
            for dx in 0..2 {
                let sx = x.saturating_sub(dx);
                let sy = y.saturating_sub(dy);
                min = min.min(img.get_pixel(sx, sy).0[0]);
            }
        }
        image::Luma([min])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_close_fills_single_pixel_pits() {
        let mut img = GrayImage::from_pixel(10, 10, Luma([255]));
        img.put_pixel(5, 5, Luma([0]));

        let result = apply(&img).unwrap();

        assert_eq!(result.get_pixel(5, 5).0[0], 255);
    }

    #[test]
    fn test_close_preserves_solid_regions() {
        // White block on black stays the same size
        let mut img = GrayImage::from_pixel(12, 12, Luma([0]));
        for y in 4..8 {
            for x in 4..8 {
                img.put_pixel(x, y, Luma([255]));
            }
        }

        let result = apply(&img).unwrap();

        for y in 0..12 {
            for x in 0..12 {
                assert_eq!(
                    result.get_pixel(x, y).0[0],
                    img.get_pixel(x, y).0[0],
                    "pixel ({}, {}) changed",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn test_close_keeps_output_binary() {
        let img = GrayImage::from_fn(20, 20, |x, y| {
            if (x + y) % 3 == 0 {
                Luma([0])
            } else {
                Luma([255])
            }
        });

        let result = apply(&img).unwrap();

        for pixel in result.pixels() {
            assert!(pixel.0[0] == 0 || pixel.0[0] == 255);
        }
    }

    #[test]
    fn test_close_never_darkens() {
        // Closing is extensive: no pixel gets darker
        let img = GrayImage::from_fn(15, 15, |x, y| {
            if x % 4 == 0 || y % 5 == 0 {
                Luma([0])
            } else {
                Luma([255])
            }
        });

        let result = apply(&img).unwrap();

        for (x, y, pixel) in result.enumerate_pixels() {
            assert!(pixel.0[0] >= img.get_pixel(x, y).0[0]);
        }
    }
}
