//! Conversions and file output for the slide views.

use std::fs;
use std::path::{Path, PathBuf};

use image::{GrayImage, Rgb, RgbImage};
use tracing::debug;

use crate::core::QuizError;
use crate::processors::DerivedViews;

/// Replicates a gray image across three channels.
pub fn gray_to_rgb(gray: &GrayImage) -> RgbImage {
    RgbImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = gray.get_pixel(x, y).0[0];
        Rgb([v, v, v])
    })
}

/// Writes the four views of round `round` into `dir` as PNG files and
/// returns their paths, in the order original, luminance, texture, shape.
pub fn save_views(dir: &Path, round: u32, views: &DerivedViews) -> Result<Vec<PathBuf>, QuizError> {
    fs::create_dir_all(dir)?;

    let path = |name: &str| dir.join(format!("round_{round:03}_{name}.png"));
    let outputs = [
        (path("original"), views.original.save(path("original"))),
        (path("luminance"), views.luminance.save(path("luminance"))),
        (path("texture"), views.texture.save(path("texture"))),
        (path("shape"), views.shape.save(path("shape"))),
    ];

    let mut written = Vec::with_capacity(outputs.len());
    for (path, result) in outputs {
        result.map_err(QuizError::ImageSave)?;
        debug!(path = %path.display(), "saved view");
        written.push(path);
    }
    Ok(written)
}
