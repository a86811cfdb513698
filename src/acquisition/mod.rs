//! Slide acquisition.
//!
//! An [`ImageSource`] turns a reference into bytes (HTTP, a local directory,
//! optionally cached). The [`Acquirer`] decodes them and, whenever that
//! fails, substitutes a synthetic placeholder so a round always has a slide.

mod acquirer;
mod decode;
mod retry;
mod source;

pub use acquirer::{Acquired, Acquirer, ImageOrigin};
pub use decode::decode_rgb;
pub use retry::retry_bounded;
pub use source::{CachedSource, HttpImageSource, ImageSource, LocalImageSource};

use std::path::Path;

use tracing::info;

use crate::core::AcquisitionConfig;

/// Builds the source described by `config`: a local directory when
/// `image_dir` is given, HTTP otherwise, wrapped in a cache when enabled.
pub fn source_from_config(
    config: &AcquisitionConfig,
    image_dir: Option<&Path>,
) -> Box<dyn ImageSource> {
    let source: Box<dyn ImageSource> = match image_dir {
        Some(dir) => {
            info!(root = %dir.display(), "reading slides from a local directory");
            Box::new(LocalImageSource::new(dir))
        }
        None => {
            info!(
                timeout_secs = config.timeout_secs,
                base_url = config.base_url.as_deref().unwrap_or("-"),
                "fetching slides over HTTP"
            );
            Box::new(HttpImageSource::new(config))
        }
    };
    if config.cache {
        Box::new(CachedSource::new(source))
    } else {
        source
    }
}
