//! Error types for the quiz.
//!
//! This module defines the errors that can occur while acquiring a slide,
//! deriving its views, driving the round state machine and loading
//! configuration. Network and decode failures are recoverable: the
//! acquisition layer replaces the slide with a synthetic placeholder instead
//! of surfacing them. A degenerate input is a contract violation and is
//! always reported to the caller.

use thiserror::Error;

use crate::domain::RoundPhase;

/// Enum representing the stages of the filter pipeline.
///
/// Used to tag processing errors with the stage that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Aspect-preserving resize of the source image.
    Resize,
    /// Tile-based contrast enhancement.
    Texture,
    /// Smoothing, edge detection and dilation.
    Shape,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Resize => write!(f, "resize"),
            ProcessingStage::Texture => write!(f, "texture"),
            ProcessingStage::Shape => write!(f, "shape"),
        }
    }
}

/// Enum representing the errors raised by the quiz.
#[derive(Error, Debug)]
pub enum QuizError {
    /// The request could not be completed (connection refused, DNS, timeout).
    #[error("network failure fetching {reference}")]
    Network {
        /// Image reference that was being fetched.
        reference: String,
        /// The underlying transport error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The server answered with a non-success status.
    #[error("unexpected HTTP status {status} fetching {reference}")]
    HttpStatus {
        /// Image reference that was being fetched.
        reference: String,
        /// Status code returned by the server.
        status: u16,
    },

    /// The response body is not a decodable raster image.
    #[error("image decode")]
    Decode(#[source] image::ImageError),

    /// A computed image dimension is zero.
    #[error("degenerate input in {stage}: {width}x{height} ({message})")]
    DegenerateInput {
        /// Stage that rejected the input.
        stage: ProcessingStage,
        /// Width of the offending image.
        width: u32,
        /// Height of the offending image.
        height: u32,
        /// What went wrong.
        message: String,
    },

    /// A round operation was requested in a phase that does not allow it.
    #[error("cannot {action} while the round is {phase}")]
    InvalidTransition {
        /// Phase the round was in.
        phase: RoundPhase,
        /// The rejected operation.
        action: &'static str,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration")]
    Config(#[from] crate::core::config::ConfigError),

    /// Error writing an image to disk.
    #[error("image save")]
    ImageSave(#[source] image::ImageError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl QuizError {
    /// Creates a network error for `reference`.
    pub fn network(
        reference: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            reference: reference.into(),
            source: Box::new(error),
        }
    }

    /// Creates an error for a non-success HTTP status.
    pub fn http_status(reference: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            reference: reference.into(),
            status,
        }
    }

    /// Creates a degenerate-input error for an image of the given size.
    pub fn degenerate_input(
        stage: ProcessingStage,
        width: u32,
        height: u32,
        message: impl Into<String>,
    ) -> Self {
        Self::DegenerateInput {
            stage,
            width,
            height,
            message: message.into(),
        }
    }

    /// Creates an error for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an error for an operation requested in the wrong phase.
    pub fn invalid_transition(phase: RoundPhase, action: &'static str) -> Self {
        Self::InvalidTransition { phase, action }
    }

    /// Returns `true` for failures the acquisition layer recovers from by
    /// substituting a synthetic slide.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::HttpStatus { .. } | Self::Decode(_) | Self::Io(_)
        )
    }
}

impl From<image::ImageError> for QuizError {
    fn from(error: image::ImageError) -> Self {
        Self::Decode(error)
    }
}

/// Convenient result alias for quiz operations.
pub type QuizResult<T> = Result<T, QuizError>;
