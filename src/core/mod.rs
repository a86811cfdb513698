//! The core module of the quiz.
//!
//! This module contains the pieces every other module builds on:
//! - Configuration sections and validation
//! - Constants used throughout the pipeline
//! - Error handling

pub mod config;
pub mod constants;
pub mod errors;

pub use config::{
    AcquisitionConfig, ConfigError, ConfigValidator, FallbackPolicy, FilterConfig, QuizConfig,
    load_config,
};
pub use constants::*;
pub use errors::{ProcessingStage, QuizError, QuizResult};
