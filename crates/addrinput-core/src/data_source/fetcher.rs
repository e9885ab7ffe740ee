/// The fetch contract used by [`CachingDataSource`][super::CachingDataSource].
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::jso::{JsoError, JsoMap};
use crate::lookup_key::LookupKey;

/// Failure to fetch one node payload.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No payload exists for the key.
    #[error("no data for {0}")]
    NotFound(String),
    /// Reading the payload failed.
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The payload is not a JSON object.
    #[error("malformed data for {key}: {source}")]
    Malformed {
        key: String,
        #[source]
        source: JsoError,
    },
}

impl FetchError {
    /// Returns `true` when the key simply has no data, as opposed to data
    /// that could not be read.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Retrieves the raw payload of one lookup key.
///
/// Implementations may block. The payload is either the node itself or a
/// bundle containing the node and its descendants keyed by lookup key.
pub trait Fetcher: Send + Sync {
    /// Fetches the payload for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the payload is missing, unreadable or
    /// malformed.
    fn fetch(&self, key: &LookupKey) -> Result<JsoMap, FetchError>;
}

/// Reads payloads from a local directory mirror.
///
/// The payload of `data/US/CA` is `<root>/data_US_CA.json`.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file that holds the payload for `key`.
    pub fn path_for(&self, key: &LookupKey) -> PathBuf {
        self.root
            .join(format!("{}.json", key.as_str().replace('/', "_")))
    }
}

impl Fetcher for DirectoryFetcher {
    fn fetch(&self, key: &LookupKey) -> Result<JsoMap, FetchError> {
        let path = self.path_for(key);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(FetchError::NotFound(key.to_string()));
            }
            Err(source) => return Err(FetchError::Io { path, source }),
        };
        JsoMap::parse(&text).map_err(|source| FetchError::Malformed {
            key: key.to_string(),
            source,
        })
    }
}
