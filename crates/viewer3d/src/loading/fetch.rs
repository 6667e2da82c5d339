//! Fetch boundary between the orchestrator and the transport
//!
//! The orchestrator never performs IO itself. It hands out [`FetchRequest`]s
//! and is fed [`FetchEvent`]s tagged with the request's [`Ticket`]; whatever
//! owns the transport (browser fetch, HTTP client, file system) sits in
//! between. [`ByteSource`] is the blocking flavour of the same boundary, used
//! for texture loading and by the blocking driver.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use super::format::GeometryFormat;

/// Identifies one outstanding fetch of one load session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(pub(crate) u64);

impl Ticket {
    /// Raw ticket number
    pub fn id(self) -> u64 {
        self.0
    }
}

/// What a fetch is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    /// Companion material library text
    MaterialLibrary,
    /// Geometry file of the given format
    Geometry(GeometryFormat),
}

/// A fetch the transport should perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Ticket to tag every event for this fetch with
    pub ticket: Ticket,
    /// URL to fetch
    pub url: String,
    /// Purpose of the fetch
    pub kind: FetchKind,
    /// Wait this long before starting (non-zero only for retries)
    pub delay: Duration,
}

/// Outcome or progress of a fetch
#[derive(Debug)]
pub enum FetchEvent {
    /// Bytes received so far
    Progress {
        /// Bytes received
        loaded: u64,
        /// Total size if known
        total: Option<u64>,
    },
    /// Fetch finished with the full payload
    Loaded(Vec<u8>),
    /// Fetch failed
    Failed(FetchError),
}

/// Network or file failure
#[derive(Error, Debug)]
pub enum FetchError {
    /// Nothing exists at the URL
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// IO failure while reading the resource
    #[error("IO error reading {url}: {source}")]
    Io {
        /// URL being read
        url: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Transport-specific failure (HTTP status, CORS, aborted request...)
    #[error("Transport error for {url}: {reason}")]
    Transport {
        /// URL being fetched
        url: String,
        /// Reason reported by the transport
        reason: String,
    },
}

/// Blocking byte fetcher
pub trait ByteSource {
    /// Read the whole resource at `url`
    fn read_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

impl<T: ByteSource + ?Sized> ByteSource for &T {
    fn read_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).read_bytes(url)
    }
}

impl<T: ByteSource + ?Sized> ByteSource for std::sync::Arc<T> {
    fn read_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).read_bytes(url)
    }
}

/// Reads URLs as paths below a root directory
///
/// `file://` prefixes are stripped; absolute `http(s)` URLs are rejected
/// with [`FetchError::Transport`].
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    /// Create a source rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, url: &str) -> Result<PathBuf, FetchError> {
        let lower = url.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Err(FetchError::Transport {
                url: url.to_string(),
                reason: "remote URLs are not readable from the file system".to_string(),
            });
        }
        let path = url.strip_prefix("file://").unwrap_or(url);
        let path = path.split(['?', '#']).next().unwrap_or(path);
        Ok(self.root.join(path))
    }
}

impl ByteSource for FileSource {
    fn read_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let path = self.resolve(url)?;
        log::debug!("Reading {:?} for {}", path, url);
        std::fs::read(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                FetchError::NotFound(url.to_string())
            } else {
                FetchError::Io {
                    url: url.to_string(),
                    source,
                }
            }
        })
    }
}

/// In-memory resources keyed by URL
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource (builder pattern)
    pub fn with(mut self, url: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(url, bytes);
        self
    }

    /// Add or replace a resource
    pub fn insert(&mut self, url: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries.insert(url.into(), bytes.into());
    }
}

impl ByteSource for MemorySource {
    fn read_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.entries
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}
