//! Aspect-preserving resize to a fixed display width.

use image::RgbImage;
use image::imageops::{self, FilterType};

use crate::core::{ProcessingStage, QuizError};

/// Resizes slides so their width matches `target_width`.
///
/// The height follows from the aspect ratio, rounded to the nearest pixel.
/// When `max_height` is set and the computed height exceeds it, the slide is
/// scaled to `max_height` instead and the width follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectResize {
    pub target_width: u32,
    pub max_height: Option<u32>,
}

impl AspectResize {
    pub fn new(target_width: u32) -> Self {
        Self {
            target_width,
            max_height: None,
        }
    }

    pub fn with_max_height(mut self, max_height: Option<u32>) -> Self {
        self.max_height = max_height;
        self
    }

    /// Output dimensions for a `width` x `height` input.
    ///
    /// # Errors
    ///
    /// `QuizError::DegenerateInput` when the input is empty or when either
    /// computed dimension rounds to zero.
    pub fn target_dimensions(&self, width: u32, height: u32) -> Result<(u32, u32), QuizError> {
        if width == 0 || height == 0 {
            return Err(QuizError::degenerate_input(
                ProcessingStage::Resize,
                width,
                height,
                "input image is empty",
            ));
        }

        let scaled = |value: u32, numerator: u32, denominator: u32| -> u32 {
            (value as f64 * numerator as f64 / denominator as f64).round() as u32
        };

        let mut out_w = self.target_width;
        let mut out_h = scaled(height, self.target_width, width);
        if let Some(max_height) = self.max_height
            && out_h > max_height
        {
            out_h = max_height;
            out_w = scaled(width, max_height, height);
        }

        if out_w == 0 || out_h == 0 {
            return Err(QuizError::degenerate_input(
                ProcessingStage::Resize,
                out_w,
                out_h,
                format!("resizing {width}x{height} yields an empty image"),
            ));
        }
        Ok((out_w, out_h))
    }

    /// Resizes `image` with bilinear sampling.
    pub fn apply(&self, image: &RgbImage) -> Result<RgbImage, QuizError> {
        let (width, height) = image.dimensions();
        let (out_w, out_h) = self.target_dimensions(width, height)?;
        if (out_w, out_h) == (width, height) {
            return Ok(image.clone());
        }
        Ok(imageops::resize(image, out_w, out_h, FilterType::Triangle))
    }
}
