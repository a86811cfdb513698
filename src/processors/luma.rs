//! RGB to luma conversion.

use image::{GrayImage, Luma, RgbImage};

// BT.601 weights (0.299, 0.587, 0.114) in 14-bit fixed point.
const R_WEIGHT: u32 = 4899;
const G_WEIGHT: u32 = 9617;
const B_WEIGHT: u32 = 1868;
const SHIFT: u32 = 14;

/// Luma of a single RGB sample.
#[inline]
pub fn luma_bt601(rgb: [u8; 3]) -> u8 {
    let [r, g, b] = rgb;
    let weighted = r as u32 * R_WEIGHT + g as u32 * G_WEIGHT + b as u32 * B_WEIGHT;
    ((weighted + (1 << (SHIFT - 1))) >> SHIFT) as u8
}

/// Converts an RGB image to grayscale with BT.601 weights.
///
/// `image::imageops::grayscale` uses Rec. 709 weights, which shift the
/// stain colours of a slide noticeably; BT.601 is what the thresholds in
/// [`crate::core::constants`] were tuned against.
pub fn to_luma(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([luma_bt601(image.get_pixel(x, y).0)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primaries_and_extremes() {
        assert_eq!(luma_bt601([0, 0, 0]), 0);
        assert_eq!(luma_bt601([255, 255, 255]), 255);
        assert_eq!(luma_bt601([255, 0, 0]), 76);
        assert_eq!(luma_bt601([0, 255, 0]), 150);
        assert_eq!(luma_bt601([0, 0, 255]), 29);
    }

    #[test]
    fn test_gray_input_is_preserved() {
        for v in [0u8, 1, 17, 128, 200, 254, 255] {
            assert_eq!(luma_bt601([v, v, v]), v);
        }
    }

    #[test]
    fn test_to_luma_dimensions() {
        let image = RgbImage::from_pixel(7, 5, image::Rgb([100, 50, 200]));
        let gray = to_luma(&image);
        assert_eq!(gray.dimensions(), (7, 5));
        assert!(gray.pixels().all(|p| p.0[0] == luma_bt601([100, 50, 200])));
    }
}
