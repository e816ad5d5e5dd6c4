//! Page cache for raw listing HTML
//!
//! Every successfully fetched listing page can be snapshotted to disk for
//! later inspection. The cache is advisory: the walker logs failures and
//! carries on.

mod filesystem;

pub use filesystem::FsPageCache;

use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Errors that can occur while caching a page
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to write cache entry {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create cache directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Destination for raw page content
pub trait PageCache: Send + Sync {
    /// Stores `body` under a key derived from `url`, replacing any previous
    /// entry for the same URL
    ///
    /// # Returns
    ///
    /// The location the entry was written to
    fn store(&self, url: &Url, body: &str) -> CacheResult<PathBuf>;
}
