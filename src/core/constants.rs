//! Constants used throughout the quiz.

/// Width, in pixels, every slide is resized to before filtering.
pub const DEFAULT_TARGET_WIDTH: u32 = 300;

/// CLAHE clip limit, relative to the mean bin height of a tile.
pub const DEFAULT_CLAHE_CLIP_LIMIT: f32 = 5.0;

/// CLAHE tile grid (columns, rows).
pub const DEFAULT_CLAHE_TILE_GRID: (u32, u32) = (8, 8);

/// Number of histogram bins used by CLAHE.
pub const CLAHE_HISTOGRAM_BINS: usize = 256;

/// Normalised 5-tap binomial approximation of a Gaussian, `[1, 4, 6, 4, 1] / 16`.
pub const GAUSSIAN_5TAP: [f32; 5] = [0.0625, 0.25, 0.375, 0.25, 0.0625];

/// Canny hysteresis thresholds tuned for nuclear contours.
pub const DEFAULT_CANNY_LOW: f32 = 50.0;
pub const DEFAULT_CANNY_HIGH: f32 = 130.0;

/// Number of 3x3 dilation passes applied to the edge map.
pub const DEFAULT_DILATION_ITERATIONS: u8 = 1;

/// Per-request timeout for slide downloads, in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 8;

/// Bounds accepted for the fetch timeout, in seconds.
pub const MIN_FETCH_TIMEOUT_SECS: u64 = 1;
pub const MAX_FETCH_TIMEOUT_SECS: u64 = 30;

/// User agent sent with slide downloads; some hosts reject the default one.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// Number of items tried before falling back to a synthetic slide.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1;

/// Upper bound on acquisition attempts per round.
pub const MAX_ATTEMPTS_LIMIT: usize = 10;

/// Side length of the synthetic placeholder canvas.
pub const SYNTHETIC_CANVAS_SIZE: u32 = 300;
