//! The filter pipeline turning one slide into its display views.

use image::{GrayImage, RgbImage};
use std::time::Instant;
use tracing::debug;

use super::{AspectResize, Clahe, ShapeFilter, to_luma};
use crate::core::{ConfigValidator, FilterConfig, QuizError};

/// Views shown for one round. All four share the same dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedViews {
    /// The slide resized to the display width.
    pub original: RgbImage,
    /// Plain BT.601 luma of `original`.
    pub luminance: GrayImage,
    /// CLAHE-enhanced luma, exaggerating granularity.
    pub texture: GrayImage,
    /// Inverted, dilated edge map, showing nuclear contour and lobation.
    pub shape: GrayImage,
}

impl DerivedViews {
    pub fn dimensions(&self) -> (u32, u32) {
        self.original.dimensions()
    }
}

/// Resize, luma, texture and shape stages with fixed parameters.
///
/// The pipeline holds no state between calls: the same input and
/// configuration always produce byte-identical views.
#[derive(Debug, Clone)]
pub struct FilterPipeline {
    resize: AspectResize,
    clahe: Clahe,
    shape: ShapeFilter,
}

impl FilterPipeline {
    /// Builds a pipeline from a validated configuration.
    pub fn new(config: &FilterConfig) -> Result<Self, QuizError> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: &FilterConfig) -> Self {
        Self {
            resize: AspectResize::new(config.target_width).with_max_height(config.max_height),
            clahe: Clahe::new(config.clahe_clip_limit, config.clahe_tile_grid),
            shape: ShapeFilter::new(
                config.canny_low,
                config.canny_high,
                config.dilation_iterations,
            ),
        }
    }

    /// Derives the display views of `image`.
    ///
    /// # Errors
    ///
    /// `QuizError::DegenerateInput` when the slide is empty or too thin to
    /// survive the resize.
    pub fn derive_views(&self, image: &RgbImage) -> Result<DerivedViews, QuizError> {
        let start = Instant::now();

        let original = self.resize.apply(image)?;
        let luminance = to_luma(&original);
        let texture = self.clahe.apply(&luminance)?;
        let shape = self.shape.apply(&luminance)?;

        debug!(
            input_width = image.width(),
            input_height = image.height(),
            width = original.width(),
            height = original.height(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "derived views"
        );

        Ok(DerivedViews {
            original,
            luminance,
            texture,
            shape,
        })
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::from_config(&FilterConfig::default())
    }
}
