//! Synthetic placeholder slides.
//!
//! When a slide cannot be downloaded or decoded the round still needs
//! something to show. These placeholders draw a single stylised cell whose
//! nucleus has the archetypal shape of a label, so the texture and shape
//! views remain meaningful for that label.
//!
//! Geometry is fixed per label. Granules and the fine grain subtracted from
//! the canvas come from a PRNG seeded by the label, so the same label always
//! yields the same image.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_ellipse_mut};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::core::constants::SYNTHETIC_CANVAS_SIZE;
use crate::domain::CellLabel;

const BACKGROUND: Rgb<u8> = Rgb([220, 220, 220]);
const CYTOPLASM: Rgb<u8> = Rgb([200, 200, 255]);
const NUCLEUS: Rgb<u8> = Rgb([100, 0, 100]);
const EOSINOPHIL_GRANULE: Rgb<u8> = Rgb([240, 120, 80]);
const BASOPHIL_GRANULE: Rgb<u8> = Rgb([60, 0, 80]);

const CENTER: (i32, i32) = (150, 150);
const CYTOPLASM_RADIUS: i32 = 80;
const GRAIN_AMPLITUDE: u8 = 16;
const SEED_BASE: u64 = 0x4845_4d4f;

/// Draws the placeholder slide for `label`.
pub fn synthesize(label: CellLabel) -> RgbImage {
    let mut rng = StdRng::seed_from_u64(SEED_BASE + label.index() as u64);
    let mut canvas = RgbImage::from_pixel(SYNTHETIC_CANVAS_SIZE, SYNTHETIC_CANVAS_SIZE, BACKGROUND);
    draw_filled_circle_mut(&mut canvas, CENTER, CYTOPLASM_RADIUS, CYTOPLASM);

    match label {
        CellLabel::Neutrophil => draw_segmented_nucleus(&mut canvas),
        CellLabel::Eosinophil => {
            draw_bilobed_nucleus(&mut canvas);
            scatter_granules(&mut canvas, &mut rng, 40, 50..75, 3, EOSINOPHIL_GRANULE);
        }
        CellLabel::Lymphocyte => draw_filled_circle_mut(&mut canvas, CENTER, 62, NUCLEUS),
        CellLabel::Monocyte => draw_kidney_nucleus(&mut canvas),
        CellLabel::Basophil => {
            draw_filled_circle_mut(&mut canvas, CENTER, 35, NUCLEUS);
            scatter_granules(&mut canvas, &mut rng, 120, 0..70, 4, BASOPHIL_GRANULE);
        }
    }

    subtract_grain(&mut canvas, &mut rng);
    debug!(label = %label, "synthesized placeholder slide");
    canvas
}

/// Three overlapping lobes forming one connected, segmented nucleus.
fn draw_segmented_nucleus(canvas: &mut RgbImage) {
    for lobe in [(130, 140), (170, 140), (150, 170)] {
        draw_filled_circle_mut(canvas, lobe, 25, NUCLEUS);
    }
}

/// Two large lobes with a visible gap between them.
fn draw_bilobed_nucleus(canvas: &mut RgbImage) {
    draw_filled_circle_mut(canvas, (118, 145), 28, NUCLEUS);
    draw_filled_circle_mut(canvas, (182, 145), 28, NUCLEUS);
}

/// Ellipse with a cytoplasm-coloured bite taken out of its lower edge.
fn draw_kidney_nucleus(canvas: &mut RgbImage) {
    draw_filled_ellipse_mut(canvas, CENTER, 55, 40, NUCLEUS);
    draw_filled_circle_mut(canvas, (CENTER.0, CENTER.1 + 40), 22, CYTOPLASM);
}

fn scatter_granules(
    canvas: &mut RgbImage,
    rng: &mut StdRng,
    count: usize,
    radial_range: std::ops::Range<i32>,
    granule_radius: i32,
    color: Rgb<u8>,
) {
    for _ in 0..count {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let distance = rng.gen_range(radial_range.clone()) as f32;
        let x = CENTER.0 + (distance * angle.cos()).round() as i32;
        let y = CENTER.1 + (distance * angle.sin()).round() as i32;
        draw_filled_circle_mut(canvas, (x, y), granule_radius, color);
    }
}

/// Darkens every pixel by a small random amount, the same on all channels.
fn subtract_grain(canvas: &mut RgbImage, rng: &mut StdRng) {
    for pixel in canvas.pixels_mut() {
        let grain = rng.gen_range(0..GRAIN_AMPLITUDE);
        for channel in pixel.0.iter_mut() {
            *channel = channel.saturating_sub(grain);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::luma_bt601;

    fn is_nucleus(canvas: &RgbImage, x: u32, y: u32) -> bool {
        luma_bt601(canvas.get_pixel(x, y).0) < 120
    }

    fn nucleus_area(canvas: &RgbImage) -> usize {
        canvas
            .pixels()
            .filter(|p| luma_bt601(p.0) < 120)
            .count()
    }

    #[test]
    fn test_deterministic_per_label() {
        for label in CellLabel::ALL {
            let first = synthesize(label);
            assert_eq!(first.dimensions(), (300, 300));
            assert_eq!(first, synthesize(label));
        }
    }

    #[test]
    fn test_labels_are_distinguishable() {
        let images: Vec<RgbImage> = CellLabel::ALL.iter().map(|&l| synthesize(l)).collect();
        for i in 0..images.len() {
            for j in i + 1..images.len() {
                assert_ne!(images[i], images[j]);
            }
        }
    }

    #[test]
    fn test_archetype_geometry() {
        let neutrophil = synthesize(CellLabel::Neutrophil);
        assert!(is_nucleus(&neutrophil, 130, 140));
        assert!(is_nucleus(&neutrophil, 150, 150));
        assert!(is_nucleus(&neutrophil, 150, 170));

        // Bilobed: both lobes dark, the gap between them is not.
        let eosinophil = synthesize(CellLabel::Eosinophil);
        assert!(is_nucleus(&eosinophil, 118, 145));
        assert!(is_nucleus(&eosinophil, 182, 145));
        assert!(!is_nucleus(&eosinophil, 150, 145));

        // Kidney: dark above the dent, light inside it.
        let monocyte = synthesize(CellLabel::Monocyte);
        assert!(is_nucleus(&monocyte, 150, 125));
        assert!(is_nucleus(&monocyte, 110, 160));
        assert!(!is_nucleus(&monocyte, 150, 185));

        let lymphocyte = synthesize(CellLabel::Lymphocyte);
        assert!(is_nucleus(&lymphocyte, 150, 150));
        assert!(nucleus_area(&lymphocyte) > nucleus_area(&neutrophil));
    }

    #[test]
    fn test_background_is_light() {
        let canvas = synthesize(CellLabel::Basophil);
        let corner = canvas.get_pixel(2, 2).0;
        assert!(corner.iter().all(|&c| c > 200));
    }
}
