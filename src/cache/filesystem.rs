use crate::cache::{CacheError, CacheResult, PageCache};
use crate::url::cache_key;
use std::path::{Path, PathBuf};
use url::Url;

/// Cache writing one `.html` file per URL
///
/// The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FsPageCache {
    dir: PathBuf,
}

impl FsPageCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the entries
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry for `url`
    pub fn entry_path(&self, url: &Url) -> PathBuf {
        self.dir.join(format!("{}.html", cache_key(url)))
    }
}

impl PageCache for FsPageCache {
    fn store(&self, url: &Url, body: &str) -> CacheResult<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|source| CacheError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.entry_path(url);
        std::fs::write(&path, body).map_err(|source| CacheError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::trace!("Cached {} at {}", url, path.display());
        Ok(path)
    }
}
