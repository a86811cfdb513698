//! Configuration for the quiz.
//!
//! Every section is deserializable from JSON and falls back to the defaults in
//! [`crate::core::constants`] for any field that is omitted, so an empty
//! object `{}` is a valid configuration file.
//!
//! ```json
//! {
//!   "filters": { "target_width": 360, "canny_low": 60.0, "canny_high": 160.0 },
//!   "acquisition": { "timeout_secs": 5, "max_attempts": 10 },
//!   "fallback": { "mode": "match_intended" }
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::constants::*;
use crate::domain::CellLabel;

/// Errors that can occur during configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that a configuration value is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Error indicating that a value falls outside its accepted range.
    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    /// Error reading the configuration file.
    #[error("failed to read config {path}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing the configuration file.
    #[error("failed to parse config {path}")]
    Parse {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A trait for validating configuration sections.
pub trait ConfigValidator {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates that a value lies in the inclusive range `[min, max]`.
    fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    ) -> Result<(), ConfigError> {
        if value.is_nan() || value < min || value > max {
            Err(ConfigError::OutOfRange {
                field,
                min,
                max,
                value,
            })
        } else {
            Ok(())
        }
    }

    /// Validates that a dimension is positive.
    fn validate_positive(&self, field: &'static str, value: u32) -> Result<(), ConfigError> {
        if value == 0 {
            Err(ConfigError::InvalidConfig {
                message: format!("{field} must be greater than 0"),
            })
        } else {
            Ok(())
        }
    }
}

/// Parameters of the filter pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Width every slide is resized to.
    pub target_width: u32,
    /// When set, slides taller than this are scaled down to this height
    /// instead, keeping the aspect ratio.
    pub max_height: Option<u32>,
    /// CLAHE clip limit.
    pub clahe_clip_limit: f32,
    /// CLAHE tile grid as (columns, rows).
    pub clahe_tile_grid: (u32, u32),
    /// Canny low hysteresis threshold.
    pub canny_low: f32,
    /// Canny high hysteresis threshold.
    pub canny_high: f32,
    /// Number of 3x3 dilation passes over the edge map.
    pub dilation_iterations: u8,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::get_defaults()
    }
}

impl ConfigValidator for FilterConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_positive("target_width", self.target_width)?;
        if let Some(max_height) = self.max_height {
            self.validate_positive("max_height", max_height)?;
        }
        self.validate_range(
            "clahe_clip_limit",
            self.clahe_clip_limit as f64,
            f32::EPSILON as f64,
            255.0,
        )?;
        self.validate_positive("clahe_tile_grid.0", self.clahe_tile_grid.0)?;
        self.validate_positive("clahe_tile_grid.1", self.clahe_tile_grid.1)?;
        self.validate_range("canny_low", self.canny_low as f64, f32::EPSILON as f64, 2048.0)?;
        self.validate_range(
            "canny_high",
            self.canny_high as f64,
            self.canny_low as f64,
            2048.0,
        )?;
        Ok(())
    }

    fn get_defaults() -> Self {
        Self {
            target_width: DEFAULT_TARGET_WIDTH,
            max_height: None,
            clahe_clip_limit: DEFAULT_CLAHE_CLIP_LIMIT,
            clahe_tile_grid: DEFAULT_CLAHE_TILE_GRID,
            canny_low: DEFAULT_CANNY_LOW,
            canny_high: DEFAULT_CANNY_HIGH,
            dilation_iterations: DEFAULT_DILATION_ITERATIONS,
        }
    }
}

/// Parameters of slide acquisition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Base URL that relative image references are joined onto.
    pub base_url: Option<String>,
    /// Number of items tried (cycling through the table) before the
    /// synthetic fallback is used.
    pub max_attempts: usize,
    /// Keep fetched bytes for the lifetime of the session.
    pub cache: bool,
}

impl AcquisitionConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self::get_defaults()
    }
}

impl ConfigValidator for AcquisitionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_range(
            "timeout_secs",
            self.timeout_secs as f64,
            MIN_FETCH_TIMEOUT_SECS as f64,
            MAX_FETCH_TIMEOUT_SECS as f64,
        )?;
        self.validate_range(
            "max_attempts",
            self.max_attempts as f64,
            1.0,
            MAX_ATTEMPTS_LIMIT as f64,
        )?;
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::InvalidConfig {
                message: "user_agent must not be empty".to_string(),
            });
        }
        if let Some(base_url) = &self.base_url
            && !(base_url.starts_with("http://") || base_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidConfig {
                message: format!("base_url must be an http(s) URL, got '{base_url}'"),
            });
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self {
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            base_url: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            cache: true,
        }
    }
}

/// Which archetype the synthetic placeholder draws when a slide cannot be
/// shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Always draw `label`, and relabel the round accordingly.
    FixedArchetype { label: CellLabel },
    /// Draw the archetype of the item's own label.
    MatchIntended,
}

impl FallbackPolicy {
    /// Label whose archetype is drawn for an item labelled `intended`.
    pub fn archetype_for(&self, intended: CellLabel) -> CellLabel {
        match self {
            FallbackPolicy::FixedArchetype { label } => *label,
            FallbackPolicy::MatchIntended => intended,
        }
    }
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        FallbackPolicy::FixedArchetype {
            label: CellLabel::Neutrophil,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    pub filters: FilterConfig,
    pub acquisition: AcquisitionConfig,
    pub fallback: FallbackPolicy,
}

impl ConfigValidator for QuizConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.filters.validate()?;
        self.acquisition.validate()
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<QuizConfig, ConfigError> {
    let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: QuizConfig = serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}
