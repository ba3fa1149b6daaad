use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use tracing::{debug, info};

use crate::version::error::CacheError;

/// Extension of every entry file; `clear` only touches files it owns
const ENTRY_EXTENSION: &str = "body";

/// Prefix of in-flight writes
const PARTIAL_PREFIX: &str = ".partial-";

/// A cached response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub url: String,
    pub body: Vec<u8>,
    pub fetched_at: DateTime<Utc>,
}

/// Trait for storing fetched response bodies keyed by request URL
#[cfg_attr(test, automock)]
pub trait CacheStore: Send + Sync {
    /// Returns the entry for `url` if present and still fresh
    fn get(&self, url: &str) -> Result<Option<CacheEntry>, CacheError>;

    /// Stores `body` for `url`. An empty body removes any existing entry instead.
    fn put(&self, url: &str, body: &[u8]) -> Result<(), CacheError>;
}

/// File-per-URL cache; freshness is the file modification time
pub struct FileCache {
    dir: PathBuf,
    ttl: Duration,
}

impl FileCache {
    pub fn new(dir: &Path, ttl: Duration) -> Result<Self, CacheError> {
        fs::create_dir_all(dir)?;
        info!("Using cache directory {:?} (ttl {}s)", dir, ttl.as_secs());
        Ok(Self {
            dir: dir.to_path_buf(),
            ttl,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, url: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", cache_key(url), ENTRY_EXTENSION))
    }

    fn owns(name: &str) -> bool {
        name.starts_with(PARTIAL_PREFIX)
            || name
                .strip_suffix(ENTRY_EXTENSION)
                .is_some_and(|stem| stem.ends_with('.'))
    }

    fn is_fresh(&self, fetched_at: SystemTime) -> bool {
        // A timestamp in the future (clock skew) counts as fresh unless caching is off
        SystemTime::now()
            .duration_since(fetched_at)
            .map(|age| age < self.ttl)
            .unwrap_or(!self.ttl.is_zero())
    }

    /// Removes every cached entry, returning how many were deleted
    ///
    /// Files the cache did not write are left alone.
    pub fn clear(&self) -> Result<usize, CacheError> {
        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let owned = entry.file_name().to_str().is_some_and(Self::owns);
            if owned && entry.file_type()?.is_file() {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
        info!("Removed {} cache entries from {:?}", removed, self.dir);
        Ok(removed)
    }
}

impl CacheStore for FileCache {
    fn get(&self, url: &str) -> Result<Option<CacheEntry>, CacheError> {
        let path = self.path_for(url);

        let modified = match fs::metadata(&path) {
            Ok(meta) => meta.modified()?,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if !self.is_fresh(modified) {
            debug!("Cache entry for {} is stale", url);
            return Ok(None);
        }

        let body = match fs::read(&path) {
            Ok(body) => body,
            // Raced with a concurrent delete
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if body.is_empty() {
            return Ok(None);
        }

        Ok(Some(CacheEntry {
            url: url.to_string(),
            body,
            fetched_at: modified.into(),
        }))
    }

    fn put(&self, url: &str, body: &[u8]) -> Result<(), CacheError> {
        let path = self.path_for(url);

        if body.is_empty() {
            debug!("Refusing to cache empty body for {}", url);
            return match fs::remove_file(&path) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }

        // One temp file per write, persisted over the entry in a single rename
        let mut file = tempfile::Builder::new()
            .prefix(PARTIAL_PREFIX)
            .tempfile_in(&self.dir)?;
        file.write_all(body)?;
        file.as_file().sync_all()?;
        file.persist(&path).map_err(|e| e.error)?;

        debug!("Cached {} bytes for {}", body.len(), url);
        Ok(())
    }
}

/// Turns a URL into a file name that is safe on every platform
pub fn cache_key(url: &str) -> String {
    url.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '?' | '&' | '=' | '*' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() || c.is_control() => '_',
            c => c,
        })
        .collect()
}
