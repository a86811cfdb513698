//! Byte sources for slide references.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::{AcquisitionConfig, QuizError};

/// Something that turns an image reference into raw bytes.
///
/// Implementations only fetch; decoding and fallback happen in the
/// [`Acquirer`](super::Acquirer).
pub trait ImageSource {
    fn fetch(&self, reference: &str) -> Result<Vec<u8>, QuizError>;
}

impl<S: ImageSource + ?Sized> ImageSource for Box<S> {
    fn fetch(&self, reference: &str) -> Result<Vec<u8>, QuizError> {
        (**self).fetch(reference)
    }
}

impl<S: ImageSource + ?Sized> ImageSource for &S {
    fn fetch(&self, reference: &str) -> Result<Vec<u8>, QuizError> {
        (**self).fetch(reference)
    }
}

fn is_absolute_url(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

/// Plain HTTP GET with a global timeout and a fixed User-Agent.
pub struct HttpImageSource {
    agent: ureq::Agent,
    user_agent: String,
    base_url: Option<String>,
}

impl HttpImageSource {
    pub fn new(config: &AcquisitionConfig) -> Self {
        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout()))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(agent_config),
            user_agent: config.user_agent.clone(),
            base_url: config.base_url.clone(),
        }
    }

    /// URL requested for `reference`. Absolute URLs are used as they are,
    /// anything else is joined onto the base URL.
    pub fn resolve(&self, reference: &str) -> Result<String, QuizError> {
        if is_absolute_url(reference) {
            return Ok(reference.to_string());
        }
        match &self.base_url {
            Some(base) => Ok(format!(
                "{}/{}",
                base.trim_end_matches('/'),
                reference.trim_start_matches('/')
            )),
            None => Err(QuizError::invalid_input(format!(
                "'{reference}' is not a URL and no base_url is configured"
            ))),
        }
    }
}

impl ImageSource for HttpImageSource {
    fn fetch(&self, reference: &str) -> Result<Vec<u8>, QuizError> {
        let url = self.resolve(reference)?;
        debug!(url = %url, "fetching slide");

        let mut response = match self
            .agent
            .get(&url)
            .header("User-Agent", &self.user_agent)
            .call()
        {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(status)) => {
                return Err(QuizError::http_status(url, status));
            }
            Err(e) => return Err(QuizError::network(url, e)),
        };

        let bytes = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| QuizError::network(url.as_str(), e))?;
        debug!(url = %url, bytes = bytes.len(), "fetched slide");
        Ok(bytes)
    }
}

/// Reads slides from a directory. URL references are reduced to their last
/// path segment, so the built-in table works against a local mirror.
#[derive(Debug, Clone)]
pub struct LocalImageSource {
    root: PathBuf,
}

impl LocalImageSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, reference: &str) -> PathBuf {
        let key = if is_absolute_url(reference) {
            reference.rsplit('/').next().unwrap_or(reference)
        } else {
            reference.trim_start_matches('/')
        };
        self.root.join(key)
    }
}

impl ImageSource for LocalImageSource {
    fn fetch(&self, reference: &str) -> Result<Vec<u8>, QuizError> {
        let path = self.path_for(reference);
        debug!(path = %path.display(), "reading slide");
        Ok(fs::read(path)?)
    }
}

/// Keeps the bytes of every successful fetch for the life of the wrapper.
/// Failures are not cached, so a later round retries them.
pub struct CachedSource<S> {
    inner: S,
    entries: RefCell<HashMap<String, Vec<u8>>>,
}

impl<S: ImageSource> CachedSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            entries: RefCell::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl<S: ImageSource> ImageSource for CachedSource<S> {
    fn fetch(&self, reference: &str) -> Result<Vec<u8>, QuizError> {
        if let Some(bytes) = self.entries.borrow().get(reference) {
            debug!(reference, "slide cache hit");
            return Ok(bytes.clone());
        }
        let bytes = self.inner.fetch(reference)?;
        self.entries
            .borrow_mut()
            .insert(reference.to_string(), bytes.clone());
        info!(reference, cached = self.len(), "cached slide");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Counting {
        calls: Cell<usize>,
        fail: bool,
    }

    impl ImageSource for Counting {
        fn fetch(&self, reference: &str) -> Result<Vec<u8>, QuizError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                Err(QuizError::http_status(reference, 404))
            } else {
                Ok(reference.as_bytes().to_vec())
            }
        }
    }

    #[test]
    fn test_resolve_joins_base_url() {
        let config = AcquisitionConfig {
            base_url: Some("https://slides.example/bccd/".to_string()),
            ..AcquisitionConfig::default()
        };
        let source = HttpImageSource::new(&config);
        assert_eq!(
            source.resolve("/a.jpg").unwrap(),
            "https://slides.example/bccd/a.jpg"
        );
        assert_eq!(
            source.resolve("http://other.example/b.jpg").unwrap(),
            "http://other.example/b.jpg"
        );
    }

    #[test]
    fn test_resolve_without_base_url() {
        let source = HttpImageSource::new(&AcquisitionConfig::default());
        assert!(matches!(
            source.resolve("a.jpg"),
            Err(QuizError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_local_source_reads_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("BloodImage_00002.jpg"), b"slide").unwrap();
        let source = LocalImageSource::new(dir.path());

        let bytes = source
            .fetch("https://host.example/path/BloodImage_00002.jpg")
            .unwrap();
        assert_eq!(bytes, b"slide");
        assert_eq!(source.fetch("BloodImage_00002.jpg").unwrap(), b"slide");
        assert!(matches!(
            source.fetch("missing.jpg"),
            Err(QuizError::Io(_))
        ));
    }

    #[test]
    fn test_cache_only_keeps_successes() {
        let cached = CachedSource::new(Counting {
            calls: Cell::new(0),
            fail: false,
        });
        assert_eq!(cached.fetch("a").unwrap(), b"a");
        assert_eq!(cached.fetch("a").unwrap(), b"a");
        assert_eq!(cached.inner.calls.get(), 1);
        assert_eq!(cached.len(), 1);

        let failing = CachedSource::new(Counting {
            calls: Cell::new(0),
            fail: true,
        });
        assert!(failing.fetch("a").is_err());
        assert!(failing.fetch("a").is_err());
        assert_eq!(failing.inner.calls.get(), 2);
        assert!(failing.is_empty());
    }
}
