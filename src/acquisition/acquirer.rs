//! Turning a question into a displayable slide, whatever the network does.

use std::fmt;
use std::time::Instant;

use image::RgbImage;
use tracing::{info, warn};

use super::{ImageSource, decode_rgb, retry_bounded};
use crate::core::{AcquisitionConfig, FallbackPolicy, QuizError, QuizResult};
use crate::domain::{QuizItem, cycle_from};
use crate::synthetic::synthesize;

/// Where the slide of a round came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOrigin {
    Remote,
    /// Drawn locally because the slide could not be obtained.
    Synthetic { reason: String },
}

impl fmt::Display for ImageOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageOrigin::Remote => write!(f, "remote"),
            ImageOrigin::Synthetic { reason } => write!(f, "synthetic ({reason})"),
        }
    }
}

/// The slide of a round and the item it is scored against.
///
/// `item` is the effective item: for a synthetic slide its label is the
/// archetype that was drawn, which may differ from the requested item.
#[derive(Debug, Clone)]
pub struct Acquired {
    pub image: RgbImage,
    pub item: QuizItem,
    pub origin: ImageOrigin,
}

impl Acquired {
    pub fn is_synthetic(&self) -> bool {
        matches!(self.origin, ImageOrigin::Synthetic { .. })
    }
}

/// Fetches and decodes slides, falling back to a synthetic placeholder.
pub struct Acquirer<S> {
    source: S,
    max_attempts: usize,
    fallback: FallbackPolicy,
}

impl<S: ImageSource> Acquirer<S> {
    pub fn new(source: S, config: &AcquisitionConfig, fallback: FallbackPolicy) -> Self {
        Self {
            source,
            max_attempts: config.max_attempts,
            fallback,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn fallback_policy(&self) -> FallbackPolicy {
        self.fallback
    }

    /// Fetches and decodes the slide of `item`, without any fallback.
    pub fn fetch_image(&self, item: &QuizItem) -> QuizResult<RgbImage> {
        let start = Instant::now();
        let bytes = self.source.fetch(&item.image_reference)?;
        let image = decode_rgb(&bytes)?;
        info!(
            reference = %item.image_reference,
            width = image.width(),
            height = image.height(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "acquired slide"
        );
        Ok(image)
    }

    /// Slide for `item`. Never fails: any fetch or decode error yields the
    /// synthetic placeholder chosen by the fallback policy.
    pub fn acquire(&self, item: &QuizItem) -> Acquired {
        match self.fetch_image(item) {
            Ok(image) => Acquired {
                image,
                item: item.clone(),
                origin: ImageOrigin::Remote,
            },
            Err(e) => self.synthetic_for(item, &e),
        }
    }

    /// Tries up to `max_attempts` items of `table`, starting at `start` and
    /// wrapping around. The first slide obtained wins; when all attempts
    /// fail the placeholder is built for the item at `start`.
    pub fn acquire_with_retry(&self, table: &[QuizItem], start: usize) -> QuizResult<Acquired> {
        if table.is_empty() {
            return Err(QuizError::invalid_input("question table is empty"));
        }
        let start = start % table.len();
        let candidates: Vec<usize> = cycle_from(start, table.len(), self.max_attempts).collect();

        let result = retry_bounded(candidates.len(), |attempt| {
            let item = &table[candidates[attempt]];
            self.fetch_image(item).map(|image| (image, item))
        });

        Ok(match result {
            Ok((image, item)) => Acquired {
                image,
                item: item.clone(),
                origin: ImageOrigin::Remote,
            },
            Err(e) => self.synthetic_for(&table[start], &e),
        })
    }

    fn synthetic_for(&self, item: &QuizItem, error: &QuizError) -> Acquired {
        let archetype = self.fallback.archetype_for(item.correct_label);
        warn!(
            reference = %item.image_reference,
            error = %error,
            recoverable = error.is_recoverable(),
            intended = %item.correct_label,
            archetype = %archetype,
            "slide unavailable, using synthetic placeholder"
        );
        Acquired {
            image: synthesize(archetype),
            item: item.relabeled(archetype),
            origin: ImageOrigin::Synthetic {
                reason: error.to_string(),
            },
        }
    }
}
