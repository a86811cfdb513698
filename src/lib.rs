//! # HemoQuiz
//!
//! A single-player quiz for identifying white blood cells on stained blood
//! smear slides.
//!
//! Each round fetches a slide, derives display views from it, and scores one
//! answer against a static question table. No cell classification is
//! performed: the right answer is the label stored with the slide.
//!
//! ## Features
//!
//! - Slide acquisition over HTTP or from a local directory, with bounded
//!   timeout, optional retry across the table and an in-memory cache
//! - Synthetic placeholder slides when a slide cannot be fetched or decoded
//! - Deterministic filter pipeline: aspect-preserving resize, BT.601 luma,
//!   CLAHE texture view and an inverted Canny edge map as shape view
//! - Explicit round state machine with running score
//! - Board rendering for the command-line front end (feature `visualization`)
//!
//! ## Modules
//!
//! * [`core`] - Configuration, constants and error handling
//! * [`domain`] - Labels, the question table and the round state machine
//! * [`acquisition`] - Image sources, decoding, retry and fallback
//! * [`processors`] - The filter pipeline producing the display views
//! * [`synthetic`] - Placeholder slide generator
//! * [`game`] - A full quiz session wiring the above together
//! * [`utils`] - Image output, board rendering and logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hemoquiz::prelude::*;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = QuizConfig::default();
//! let source = HttpImageSource::new(&config.acquisition);
//! let mut quiz = HemoQuiz::new(source, &config, question_bank(), StdRng::seed_from_u64(7))?;
//!
//! let views = quiz.start_round()?;
//! println!("texture view is {}x{}", views.texture.width(), views.texture.height());
//!
//! if let Some(outcome) = quiz.answer(CellLabel::Neutrophil) {
//!     println!("{}", outcome.message);
//! }
//! quiz.next()?;
//! # Ok(())
//! # }
//! ```

pub mod acquisition;
pub mod core;
pub mod domain;
pub mod game;
pub mod processors;
pub mod synthetic;
pub mod utils;

/// Prelude module for convenient imports.
///
/// ```rust
/// use hemoquiz::prelude::*;
/// ```
pub mod prelude {
    pub use crate::acquisition::{
        Acquired, Acquirer, CachedSource, HttpImageSource, ImageOrigin, ImageSource,
        LocalImageSource,
    };
    pub use crate::core::{FallbackPolicy, QuizConfig, QuizError, QuizResult, load_config};
    pub use crate::domain::{CellLabel, QuizItem, QuizSession, RoundPhase, question_bank};
    pub use crate::game::HemoQuiz;
    pub use crate::processors::{DerivedViews, FilterPipeline};
    pub use crate::synthetic::synthesize;
}
