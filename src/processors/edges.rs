//! Nuclear contour extraction for the shape view.
//!
//! The grayscale slide is smoothed with a fixed 5x5 binomial kernel, run
//! through Canny, thickened with one or more 3x3 dilations and inverted so
//! contours render dark on a white background.

use image::GrayImage;
use image::imageops;
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::separable_filter_equal;
use imageproc::morphology;

use crate::core::constants::GAUSSIAN_5TAP;
use crate::core::{ProcessingStage, QuizError};

/// Edge-map filter producing the shape view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeFilter {
    pub canny_low: f32,
    pub canny_high: f32,
    pub dilation_iterations: u8,
}

impl ShapeFilter {
    pub fn new(canny_low: f32, canny_high: f32, dilation_iterations: u8) -> Self {
        Self {
            canny_low,
            canny_high,
            dilation_iterations,
        }
    }

    /// Smoothing step: separable 5x5 binomial blur.
    pub fn smooth(&self, gray: &GrayImage) -> GrayImage {
        separable_filter_equal(gray, &GAUSSIAN_5TAP)
    }

    /// Binary edge map (0 or 255) of `gray`, before inversion.
    pub fn edge_map(&self, gray: &GrayImage) -> Result<GrayImage, QuizError> {
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            return Err(QuizError::degenerate_input(
                ProcessingStage::Shape,
                width,
                height,
                "cannot detect edges in an empty image",
            ));
        }
        if self.canny_low > self.canny_high {
            return Err(QuizError::invalid_input(format!(
                "canny_low ({}) must not exceed canny_high ({})",
                self.canny_low, self.canny_high
            )));
        }

        let blurred = self.smooth(gray);
        let mut edges = canny(&blurred, self.canny_low, self.canny_high);
        for _ in 0..self.dilation_iterations {
            edges = morphology::dilate(&edges, Norm::LInf, 1);
        }
        Ok(edges)
    }

    /// Shape view: the dilated edge map inverted to dark-on-light.
    pub fn apply(&self, gray: &GrayImage) -> Result<GrayImage, QuizError> {
        let mut shape = self.edge_map(gray)?;
        imageops::invert(&mut shape);
        Ok(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::drawing::draw_filled_circle_mut;

    fn dark_disc() -> GrayImage {
        let mut gray = GrayImage::from_pixel(80, 60, Luma([220]));
        draw_filled_circle_mut(&mut gray, (40, 30), 15, Luma([40]));
        gray
    }

    fn is_binary(image: &GrayImage) -> bool {
        image.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255)
    }

    #[test]
    fn test_edge_map_is_binary_before_and_after_inversion() {
        let filter = ShapeFilter::new(50.0, 130.0, 1);
        let gray = dark_disc();

        let edges = filter.edge_map(&gray).unwrap();
        assert!(is_binary(&edges));
        assert!(edges.pixels().any(|p| p.0[0] == 255));

        let shape = filter.apply(&gray).unwrap();
        assert!(is_binary(&shape));
        for (edge, inverted) in edges.pixels().zip(shape.pixels()) {
            assert_eq!(edge.0[0], 255 - inverted.0[0]);
        }
    }

    #[test]
    fn test_contour_sits_on_disc_boundary() {
        let filter = ShapeFilter::new(50.0, 130.0, 1);
        let shape = filter.apply(&dark_disc()).unwrap();
        // Background far from the disc and the disc centre stay white.
        assert_eq!(shape.get_pixel(5, 5).0[0], 255);
        assert_eq!(shape.get_pixel(40, 30).0[0], 255);
        // Some pixel on the horizontal diameter near the rim is dark.
        assert!((22..=30).any(|x| shape.get_pixel(x, 30).0[0] == 0));
    }

    #[test]
    fn test_flat_image_has_no_edges() {
        let filter = ShapeFilter::new(50.0, 130.0, 1);
        let shape = filter.apply(&GrayImage::from_pixel(32, 32, Luma([128]))).unwrap();
        assert!(shape.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn test_dilation_thickens_contours() {
        let gray = dark_disc();
        let thin = ShapeFilter::new(50.0, 130.0, 0).edge_map(&gray).unwrap();
        let thick = ShapeFilter::new(50.0, 130.0, 1).edge_map(&gray).unwrap();
        let count = |image: &GrayImage| image.pixels().filter(|p| p.0[0] == 255).count();
        assert!(count(&thick) > count(&thin));
        for (a, b) in thin.pixels().zip(thick.pixels()) {
            assert!(a.0[0] <= b.0[0]);
        }
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let filter = ShapeFilter::new(130.0, 50.0, 1);
        assert!(matches!(
            filter.apply(&dark_disc()),
            Err(QuizError::InvalidInput { .. })
        ));
    }
}
