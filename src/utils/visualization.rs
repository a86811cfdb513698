//! Board rendering for the command-line front end.
//!
//! A board is one RGB image holding everything the player needs for a round:
//! the score line, the four views in a 2x2 grid with their titles, the result
//! line and a strip of answer controls coloured by their state.
//!
//! Text is drawn with `ab_glyph` when a font is available. Without one the
//! board is still produced, just without captions.

use std::path::Path;

use ab_glyph::{Font, FontVec, ScaleFont};
use image::{Rgb, RgbImage, imageops};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use tracing::{debug, info};

use super::image::gray_to_rgb;
use crate::core::QuizError;
use crate::domain::{ChoiceMark, QuizSession, RoundPhase};
use crate::processors::DerivedViews;

const BACKGROUND_COLOR: Rgb<u8> = Rgb([30, 30, 35]);
const TEXT_COLOR: Rgb<u8> = Rgb([235, 235, 235]);
const BUTTON_COLOR: Rgb<u8> = Rgb([50, 50, 60]);
const LOCKED_COLOR: Rgb<u8> = Rgb([40, 40, 45]);
const CORRECT_COLOR: Rgb<u8> = Rgb([50, 200, 50]);
const WRONG_COLOR: Rgb<u8> = Rgb([200, 50, 50]);

const MARGIN: u32 = 10;
const HEADER_HEIGHT: u32 = 34;
const TITLE_HEIGHT: u32 = 22;
const RESULT_HEIGHT: u32 = 30;
const STRIP_HEIGHT: u32 = 36;

const PANEL_TITLES: [&str; 4] = ["Original", "Luminância", "TEXTURA (Olhe!)", "FORMA (Núcleo)"];

/// Fonts and sizes used for board captions.
pub struct BoardConfig {
    /// The font to use for text rendering. If None, text rendering is skipped.
    pub font: Option<FontVec>,
    pub font_scale: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            font: None,
            font_scale: 16.0,
        }
    }
}

impl BoardConfig {
    /// Loads the font at `font_path`.
    pub fn with_font_path(font_path: &Path) -> Result<Self, QuizError> {
        let font_data = std::fs::read(font_path)?;
        let font = FontVec::try_from_vec(font_data).map_err(|_| {
            QuizError::invalid_input(format!("failed to parse font file: {}", font_path.display()))
        })?;
        Ok(Self {
            font: Some(font),
            ..Self::default()
        })
    }

    /// Tries a few well-known system font locations and falls back to a
    /// caption-less board.
    pub fn with_system_font() -> Self {
        let font_paths = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
        ];

        for path in &font_paths {
            if let Ok(font_data) = std::fs::read(path)
                && let Ok(font) = FontVec::try_from_vec(font_data)
            {
                info!("Loaded system font: {}", path);
                return Self {
                    font: Some(font),
                    ..Self::default()
                };
            }
        }

        debug!("No system font found, board captions will be skipped");
        Self::default()
    }
}

/// Pixel layout of a board for views of `view_width` x `view_height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    pub view_width: u32,
    pub view_height: u32,
}

impl BoardLayout {
    pub fn for_views(views: &DerivedViews) -> Self {
        let (view_width, view_height) = views.dimensions();
        Self {
            view_width,
            view_height,
        }
    }

    pub fn width(&self) -> u32 {
        2 * self.view_width + 3 * MARGIN
    }

    pub fn height(&self) -> u32 {
        HEADER_HEIGHT + 2 * (TITLE_HEIGHT + self.view_height + MARGIN) + RESULT_HEIGHT + STRIP_HEIGHT + MARGIN
    }

    /// Top-left corner of panel `index` (row-major in a 2x2 grid).
    pub fn panel_origin(&self, index: usize) -> (u32, u32) {
        let col = (index % 2) as u32;
        let row = (index / 2) as u32;
        let x = MARGIN + col * (self.view_width + MARGIN);
        let y = HEADER_HEIGHT + row * (TITLE_HEIGHT + self.view_height + MARGIN) + TITLE_HEIGHT;
        (x, y)
    }

    fn result_top(&self) -> u32 {
        HEADER_HEIGHT + 2 * (TITLE_HEIGHT + self.view_height + MARGIN)
    }

    /// Rectangle of answer control `index` in the choice strip.
    pub fn button_rect(&self, index: usize, count: usize) -> Rect {
        let count = count.max(1) as u32;
        let usable = self.width() - MARGIN;
        let slot = usable / count;
        let x = MARGIN + index as u32 * slot;
        let y = self.result_top() + RESULT_HEIGHT;
        Rect::at(x as i32, y as i32).of_size(slot.saturating_sub(MARGIN).max(1), STRIP_HEIGHT)
    }
}

fn mark_color(mark: ChoiceMark) -> Rgb<u8> {
    match mark {
        ChoiceMark::Enabled => BUTTON_COLOR,
        ChoiceMark::Locked => LOCKED_COLOR,
        ChoiceMark::Correct => CORRECT_COLOR,
        ChoiceMark::Wrong => WRONG_COLOR,
    }
}

/// Line shown under the views for the session's current phase.
pub fn result_line(session: &QuizSession) -> String {
    match (session.phase(), session.last_outcome()) {
        (RoundPhase::Answered, Some(outcome)) => outcome.message.clone(),
        (RoundPhase::Presenting, _) => "Qual célula é essa?".to_string(),
        _ => "Carregando...".to_string(),
    }
}

/// Composes the board for `views` in the state of `session`.
pub fn render_board(views: &DerivedViews, session: &QuizSession, config: &BoardConfig) -> RgbImage {
    let layout = BoardLayout::for_views(views);
    let mut board = RgbImage::from_pixel(layout.width(), layout.height(), BACKGROUND_COLOR);

    let panels = [
        views.original.clone(),
        gray_to_rgb(&views.luminance),
        gray_to_rgb(&views.texture),
        gray_to_rgb(&views.shape),
    ];
    for (index, panel) in panels.iter().enumerate() {
        let (x, y) = layout.panel_origin(index);
        imageops::replace(&mut board, panel, x as i64, y as i64);
        draw_caption(&mut board, config, PANEL_TITLES[index], x as i32, (y - TITLE_HEIGHT) as i32 + 3);
    }

    let round = format!("Rodada {}", session.round());
    draw_caption(&mut board, config, &round, MARGIN as i32, 8);
    let summary = session.score().summary();
    let summary_width = config
        .font
        .as_ref()
        .map_or(0.0, |font| measure_text_width(&summary, font, config.font_scale));
    let summary_x = (layout.width() - MARGIN) as f32 - summary_width;
    draw_caption(&mut board, config, &summary, summary_x.max(0.0) as i32, 8);
    draw_caption(
        &mut board,
        config,
        &result_line(session),
        MARGIN as i32,
        layout.result_top() as i32 + 6,
    );

    let marks = session.choice_marks();
    for (index, (label, mark)) in marks.iter().enumerate() {
        let rect = layout.button_rect(index, marks.len());
        draw_filled_rect_mut(&mut board, rect, mark_color(*mark));
        let text = format!("{} {}", index + 1, label.display_name());
        draw_caption(&mut board, config, &text, rect.left() + 6, rect.top() + 9);
    }

    board
}

/// Renders the board and writes it to `path`.
pub fn save_board(
    path: &Path,
    views: &DerivedViews,
    session: &QuizSession,
    config: &BoardConfig,
) -> Result<(), QuizError> {
    render_board(views, session, config)
        .save(path)
        .map_err(QuizError::ImageSave)?;
    info!(path = %path.display(), round = session.round(), "board written");
    Ok(())
}

fn draw_caption(board: &mut RgbImage, config: &BoardConfig, text: &str, x: i32, y: i32) {
    if let Some(font) = &config.font {
        draw_text_mut(board, TEXT_COLOR, x, y, config.font_scale, font, text);
    }
}

/// Measures the width of text when rendered with a specific font and scale.
fn measure_text_width(text: &str, font: &FontVec, scale: f32) -> f32 {
    let scaled_font = font.as_scaled(scale);
    text.chars()
        .map(|ch| scaled_font.h_advance(scaled_font.scaled_glyph(ch).id))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CellLabel, QuizItem};
    use crate::processors::FilterPipeline;
    use crate::synthetic::synthesize;

    fn views() -> DerivedViews {
        FilterPipeline::default()
            .derive_views(&synthesize(CellLabel::Neutrophil))
            .unwrap()
    }

    fn button_color(board: &RgbImage, layout: &BoardLayout, index: usize) -> Rgb<u8> {
        let rect = layout.button_rect(index, CellLabel::ALL.len());
        *board.get_pixel(rect.left() as u32 + 1, rect.bottom() as u32 - 1)
    }

    #[test]
    fn test_board_layout_fits_panels() {
        let views = views();
        let layout = BoardLayout::for_views(&views);
        assert_eq!(layout.width(), 630);
        let (x, y) = layout.panel_origin(3);
        assert!(x + 300 <= layout.width());
        assert!(y + 300 <= layout.result_top());
        let last = layout.button_rect(4, 5);
        assert!(last.right() < layout.width() as i32);
        assert!(last.bottom() < layout.height() as i32);
    }

    #[test]
    fn test_board_contains_views() {
        let views = views();
        let mut session = QuizSession::new(QuizItem::new("x", CellLabel::Neutrophil, "hint"));
        session.present(session.current_item().clone()).unwrap();

        let board = render_board(&views, &session, &BoardConfig::default());
        let layout = BoardLayout::for_views(&views);
        assert_eq!(board.dimensions(), (layout.width(), layout.height()));

        let (x, y) = layout.panel_origin(0);
        assert_eq!(board.get_pixel(x + 150, y + 150), views.original.get_pixel(150, 150));
        let (x, y) = layout.panel_origin(3);
        let shape = views.shape.get_pixel(20, 20).0[0];
        assert_eq!(board.get_pixel(x + 20, y + 20).0, [shape; 3]);
        assert_eq!(button_color(&board, &layout, 0), BUTTON_COLOR);
    }

    #[test]
    fn test_choice_strip_marks_answer() {
        let views = views();
        let mut session = QuizSession::new(QuizItem::new("x", CellLabel::Neutrophil, "hint"));
        session.present(session.current_item().clone()).unwrap();
        session.submit_answer(CellLabel::Monocyte).unwrap();

        let board = render_board(&views, &session, &BoardConfig::default());
        let layout = BoardLayout::for_views(&views);
        for (index, label) in CellLabel::ALL.iter().enumerate() {
            let expected = match label {
                CellLabel::Neutrophil => CORRECT_COLOR,
                CellLabel::Monocyte => WRONG_COLOR,
                _ => LOCKED_COLOR,
            };
            assert_eq!(button_color(&board, &layout, index), expected);
        }
    }

    #[test]
    fn test_result_line_follows_phase() {
        let mut session = QuizSession::new(QuizItem::new("x", CellLabel::Basophil, "hint"));
        assert_eq!(result_line(&session), "Carregando...");
        session.present(session.current_item().clone()).unwrap();
        assert_eq!(result_line(&session), "Qual célula é essa?");
        session.submit_answer(CellLabel::Basophil).unwrap();
        assert!(result_line(&session).starts_with("✅ CORRETO!"));
    }
}
