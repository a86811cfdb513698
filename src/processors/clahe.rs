//! Contrast-limited adaptive histogram equalization (CLAHE).
//!
//! The image is split into a grid of tiles. Each tile gets its own
//! equalization lookup table built from a clipped histogram: counts above the
//! clip limit are cut and spread evenly over all bins, which bounds how much
//! any intensity range can be stretched. Output pixels blend the tables of
//! the four nearest tile centres bilinearly, so tile seams do not show.
//!
//! When the image size is not a multiple of the grid, the last row and column
//! of tiles are completed by reflecting the image about its border (without
//! repeating the edge pixel).

use image::{GrayImage, Luma};

use crate::core::constants::CLAHE_HISTOGRAM_BINS;
use crate::core::{ProcessingStage, QuizError};

const BINS: usize = CLAHE_HISTOGRAM_BINS;

type Lut = [u8; BINS];

/// Tile-based contrast enhancement with a fixed clip limit and grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clahe {
    /// Clip limit relative to the mean bin height of a tile. Values `<= 0`
    /// disable clipping (plain tile-wise equalization).
    pub clip_limit: f32,
    /// Number of tile columns.
    pub tiles_x: u32,
    /// Number of tile rows.
    pub tiles_y: u32,
}

impl Clahe {
    pub fn new(clip_limit: f32, tile_grid: (u32, u32)) -> Self {
        Self {
            clip_limit,
            tiles_x: tile_grid.0,
            tiles_y: tile_grid.1,
        }
    }

    /// Enhances `gray`, returning an image of the same size.
    pub fn apply(&self, gray: &GrayImage) -> Result<GrayImage, QuizError> {
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            return Err(QuizError::degenerate_input(
                ProcessingStage::Texture,
                width,
                height,
                "cannot equalize an empty image",
            ));
        }
        if self.tiles_x == 0 || self.tiles_y == 0 {
            return Err(QuizError::invalid_input(format!(
                "CLAHE tile grid must be at least 1x1, got {}x{}",
                self.tiles_x, self.tiles_y
            )));
        }

        let tile_w = width.div_ceil(self.tiles_x);
        let tile_h = height.div_ceil(self.tiles_y);
        let luts = self.tile_luts(gray, tile_w, tile_h);

        let tiles_x = self.tiles_x as usize;
        let x_weights: Vec<(usize, usize, f32)> = (0..width)
            .map(|x| interpolation_weights(x, tile_w, self.tiles_x))
            .collect();

        let mut out = GrayImage::new(width, height);
        for y in 0..height {
            let (ty1, ty2, ya) = interpolation_weights(y, tile_h, self.tiles_y);
            for (x, &(tx1, tx2, xa)) in x_weights.iter().enumerate() {
                let v = gray.get_pixel(x as u32, y).0[0] as usize;
                let top_left = luts[ty1 * tiles_x + tx1][v] as f32;
                let top_right = luts[ty1 * tiles_x + tx2][v] as f32;
                let bottom_left = luts[ty2 * tiles_x + tx1][v] as f32;
                let bottom_right = luts[ty2 * tiles_x + tx2][v] as f32;

                let top = top_left * (1.0 - xa) + top_right * xa;
                let bottom = bottom_left * (1.0 - xa) + bottom_right * xa;
                let value = top * (1.0 - ya) + bottom * ya;
                out.put_pixel(x as u32, y, Luma([value.round().clamp(0.0, 255.0) as u8]));
            }
        }
        Ok(out)
    }

    /// Effective clip limit, in pixels per bin, for tiles of `tile_area`.
    fn clip_count(&self, tile_area: usize) -> usize {
        if self.clip_limit > 0.0 {
            ((self.clip_limit * tile_area as f32 / BINS as f32) as usize).max(1)
        } else {
            usize::MAX
        }
    }

    fn tile_luts(&self, gray: &GrayImage, tile_w: u32, tile_h: u32) -> Vec<Lut> {
        let (width, height) = gray.dimensions();
        let tile_area = (tile_w * tile_h) as usize;
        let clip = self.clip_count(tile_area);
        let lut_scale = (BINS - 1) as f32 / tile_area as f32;

        let mut luts = Vec::with_capacity((self.tiles_x * self.tiles_y) as usize);
        for ty in 0..self.tiles_y {
            for tx in 0..self.tiles_x {
                let mut hist = [0usize; BINS];
                for y in ty * tile_h..(ty + 1) * tile_h {
                    let sy = reflect_101(y, height);
                    for x in tx * tile_w..(tx + 1) * tile_w {
                        let sx = reflect_101(x, width);
                        hist[gray.get_pixel(sx, sy).0[0] as usize] += 1;
                    }
                }
                clip_histogram(&mut hist, clip);
                luts.push(cumulative_lut(&hist, lut_scale));
            }
        }
        luts
    }
}

/// Cuts every bin at `clip` and spreads the excess over all bins: an equal
/// share to each, then the remainder one count at a time at a fixed stride.
fn clip_histogram(hist: &mut [usize; BINS], clip: usize) {
    let mut excess = 0usize;
    for bin in hist.iter_mut() {
        if *bin > clip {
            excess += *bin - clip;
            *bin = clip;
        }
    }
    if excess == 0 {
        return;
    }

    let batch = excess / BINS;
    let mut residual = excess - batch * BINS;
    for bin in hist.iter_mut() {
        *bin += batch;
    }
    if residual > 0 {
        let step = (BINS / residual).max(1);
        let mut i = 0;
        while i < BINS && residual > 0 {
            hist[i] += 1;
            residual -= 1;
            i += step;
        }
    }
}

fn cumulative_lut(hist: &[usize; BINS], scale: f32) -> Lut {
    let mut lut = [0u8; BINS];
    let mut sum = 0usize;
    for (entry, &count) in lut.iter_mut().zip(hist.iter()) {
        sum += count;
        *entry = (sum as f32 * scale).round().min(255.0) as u8;
    }
    lut
}

/// Neighbouring tile indices and the weight of the second one for pixel
/// `pos` along an axis with `tiles` tiles of `tile_len` pixels.
fn interpolation_weights(pos: u32, tile_len: u32, tiles: u32) -> (usize, usize, f32) {
    let f = pos as f32 / tile_len as f32 - 0.5;
    let lower = f.floor();
    let weight = f - lower;
    let first = (lower as i64).max(0) as usize;
    let second = ((lower as i64 + 1) as usize).min(tiles as usize - 1);
    (first.min(tiles as usize - 1), second, weight)
}

/// Mirrors `i` into `[0, len)` without repeating the border sample
/// (`... 2 1 | 0 1 2 ... n-1 | n-2 n-3 ...`).
fn reflect_101(i: u32, len: u32) -> u32 {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let m = i % period;
    if m < len { m } else { period - m }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mean absolute difference between horizontally adjacent pixels.
    fn local_contrast(image: &GrayImage) -> f64 {
        let (w, h) = image.dimensions();
        let mut total = 0u64;
        for y in 0..h {
            for x in 1..w {
                let a = image.get_pixel(x - 1, y).0[0] as i32;
                let b = image.get_pixel(x, y).0[0] as i32;
                total += (a - b).unsigned_abs() as u64;
            }
        }
        total as f64 / ((w - 1) * h) as f64
    }

    fn low_contrast_texture(w: u32, h: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, y| Luma([100 + ((x * 7 + y * 13) % 20) as u8]))
    }

    #[test]
    fn test_reflect_101() {
        let mapped: Vec<u32> = (0..10).map(|i| reflect_101(i, 4)).collect();
        assert_eq!(mapped, vec![0, 1, 2, 3, 2, 1, 0, 1, 2, 3]);
        assert_eq!(reflect_101(5, 1), 0);
    }

    #[test]
    fn test_clip_histogram_preserves_total() {
        let mut hist = [0usize; BINS];
        hist[10] = 1000;
        hist[200] = 37;
        clip_histogram(&mut hist, 20);
        assert_eq!(hist.iter().sum::<usize>(), 1037);
        assert!(hist.iter().all(|&count| count <= 20 + 1000 / BINS + 1));
    }

    #[test]
    fn test_uniform_image_stays_uniform() {
        let gray = GrayImage::from_pixel(64, 48, Luma([90]));
        let out = Clahe::new(5.0, (8, 8)).apply(&gray).unwrap();
        let first = out.get_pixel(0, 0).0[0];
        assert!(out.pixels().all(|p| p.0[0] == first));
    }

    #[test]
    fn test_increases_local_contrast() {
        let gray = low_contrast_texture(96, 64);
        let out = Clahe::new(5.0, (8, 8)).apply(&gray).unwrap();
        assert_eq!(out.dimensions(), gray.dimensions());
        assert!(local_contrast(&out) > 2.0 * local_contrast(&gray));
    }

    #[test]
    fn test_deterministic_and_handles_odd_sizes() {
        let gray = low_contrast_texture(301, 227);
        let clahe = Clahe::new(5.0, (8, 8));
        let a = clahe.apply(&gray).unwrap();
        let b = clahe.apply(&gray).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
        assert_eq!(a.dimensions(), (301, 227));

        // Smaller than the grid: every tile is a single reflected pixel.
        let tiny = low_contrast_texture(3, 2);
        assert_eq!(clahe.apply(&tiny).unwrap().dimensions(), (3, 2));
    }

    #[test]
    fn test_rejects_empty_input_and_grid() {
        let clahe = Clahe::new(5.0, (8, 8));
        assert!(matches!(
            clahe.apply(&GrayImage::new(0, 0)),
            Err(QuizError::DegenerateInput { .. })
        ));
        let gray = low_contrast_texture(16, 16);
        assert!(matches!(
            Clahe::new(5.0, (0, 8)).apply(&gray),
            Err(QuizError::InvalidInput { .. })
        ));
    }
}
