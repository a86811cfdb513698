//! Image processing for the slide views.
//!
//! This module turns a decoded slide into the views shown to the player.
//!
//! # Modules
//!
//! * `resize` - Aspect-preserving resize to the display width
//! * `luma` - BT.601 grayscale conversion
//! * `clahe` - Tile-based contrast-limited histogram equalization (texture view)
//! * `edges` - Smoothing, Canny, dilation and inversion (shape view)
//! * `pipeline` - The full chain producing [`DerivedViews`]

mod clahe;
mod edges;
mod luma;
mod pipeline;
mod resize;

pub use clahe::Clahe;
pub use edges::ShapeFilter;
pub use luma::{luma_bt601, to_luma};
pub use pipeline::{DerivedViews, FilterPipeline};
pub use resize::AspectResize;
