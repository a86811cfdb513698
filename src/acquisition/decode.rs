use std::io::Cursor;

use image::{ImageReader, RgbImage};

use crate::core::QuizError;

/// Decodes `bytes`, sniffing the format from content, into a 3-channel
/// image. Gray is replicated across channels and alpha is dropped.
pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImage, QuizError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let decoded = reader.decode()?;
    Ok(decoded.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgba, RgbaImage};

    fn encode_png(image: DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_gray_is_replicated() {
        let bytes = encode_png(DynamicImage::ImageLuma8(GrayImage::from_pixel(
            4,
            3,
            Luma([77]),
        )));
        let rgb = decode_rgb(&bytes).unwrap();
        assert_eq!(rgb.dimensions(), (4, 3));
        assert!(rgb.pixels().all(|p| p.0 == [77, 77, 77]));
    }

    #[test]
    fn test_alpha_is_dropped() {
        let bytes = encode_png(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            2,
            2,
            Rgba([10, 20, 30, 0]),
        )));
        let rgb = decode_rgb(&bytes).unwrap();
        assert!(rgb.pixels().all(|p| p.0 == [10, 20, 30]));
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        assert!(matches!(
            decode_rgb(b"<html>not found</html>"),
            Err(QuizError::Decode(_))
        ));
        assert!(matches!(decode_rgb(&[]), Err(QuizError::Decode(_))));
    }
}
