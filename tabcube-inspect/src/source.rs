//! Raw document fetching
//!
//! The resolver only ever sees document text through [`DocumentSource`].
//! Retry and timeouts are the source's business; the core never retries.

use crate::config::InspectConfig;
use crate::error::{InspectError, InspectResult};
use crate::location::to_path;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tabcube_graph_ir::iri;

/// Supplies the raw text of a document given its canonical location
pub trait DocumentSource {
    fn fetch(&self, location: &str) -> InspectResult<String>;
}

impl<T: DocumentSource + ?Sized> DocumentSource for &T {
    fn fetch(&self, location: &str) -> InspectResult<String> {
        (**self).fetch(location)
    }
}

impl<T: DocumentSource + ?Sized> DocumentSource for Box<T> {
    fn fetch(&self, location: &str) -> InspectResult<String> {
        (**self).fetch(location)
    }
}

/// Remote location -> local file, consulted before any other lookup
#[derive(Debug, Clone, Default)]
pub struct FallbackTable {
    entries: BTreeMap<String, PathBuf>,
}

impl FallbackTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: impl Into<String>, local: impl Into<PathBuf>) {
        self.entries.insert(location.into(), local.into());
    }

    /// Lookup ignores the fragment, since several nodes share one document
    pub fn get(&self, location: &str) -> Option<&Path> {
        self.entries
            .get(location)
            .or_else(|| self.entries.get(iri::strip_fragment(location)))
            .map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<BTreeMap<String, PathBuf>> for FallbackTable {
    fn from(entries: BTreeMap<String, PathBuf>) -> Self {
        Self { entries }
    }
}

fn read_local(location: &str, path: &Path) -> InspectResult<String> {
    tracing::debug!(location = %location, path = %path.display(), "reading document");
    std::fs::read_to_string(path).map_err(|source| InspectError::UnreadableDocument {
        location: location.to_string(),
        source,
    })
}

/// Reads `file:` locations from disk
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    fallbacks: FallbackTable,
}

impl FileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallbacks(fallbacks: FallbackTable) -> Self {
        Self { fallbacks }
    }
}

impl DocumentSource for FileSource {
    fn fetch(&self, location: &str) -> InspectResult<String> {
        if let Some(local) = self.fallbacks.get(location) {
            return read_local(location, local);
        }
        let path = to_path(location).ok_or_else(|| InspectError::Fetch {
            location: location.to_string(),
            message: "remote fetching is not enabled (build with the `http` feature)".to_string(),
        })?;
        read_local(location, &path)
    }
}

/// Local files plus `http(s)` over a blocking client
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::blocking::Client,
    local: FileSource,
}

#[cfg(feature = "http")]
impl HttpSource {
    pub fn new(timeout: std::time::Duration, fallbacks: FallbackTable) -> InspectResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InspectError::Fetch {
                location: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            local: FileSource::with_fallbacks(fallbacks),
        })
    }
}

#[cfg(feature = "http")]
impl DocumentSource for HttpSource {
    fn fetch(&self, location: &str) -> InspectResult<String> {
        if !crate::location::is_remote(location) || self.local.fallbacks.get(location).is_some() {
            return self.local.fetch(location);
        }
        tracing::debug!(location = %location, "fetching remote document");
        let fetch_err = |e: reqwest::Error| InspectError::Fetch {
            location: location.to_string(),
            message: e.to_string(),
        };
        self.client
            .get(iri::strip_fragment(location))
            .header(
                reqwest::header::ACCEPT,
                "application/ld+json, text/turtle;q=0.9, application/json;q=0.8",
            )
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .and_then(reqwest::blocking::Response::text)
            .map_err(fetch_err)
    }
}

/// The source a run should use for `config`
pub fn source_from_config(config: &InspectConfig) -> InspectResult<Box<dyn DocumentSource>> {
    let fallbacks = FallbackTable::from(config.fetch.fallbacks.clone());
    #[cfg(feature = "http")]
    {
        Ok(Box::new(HttpSource::new(config.fetch.timeout(), fallbacks)?))
    }
    #[cfg(not(feature = "http"))]
    {
        Ok(Box::new(FileSource::with_fallbacks(fallbacks)))
    }
}
