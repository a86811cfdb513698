//! Utility functions shared by the library and the binary.
//!
//! This module provides image conversion and output helpers, the board
//! renderer used by the command-line front end, and logging setup.

pub mod image;
#[cfg(feature = "visualization")]
pub mod visualization;

pub use self::image::{gray_to_rgb, save_views};

/// Initializes the tracing subscriber for logging.
///
/// Sets up an environment filter (`RUST_LOG`, falling back to
/// `default_directive`) and a formatting layer writing to stderr.
pub fn init_tracing(default_directive: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
