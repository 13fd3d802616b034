//! File-backed local cache tier. No TTL; always available.
//!
//! Entries live in memory behind a short-held lock; the file is rewritten
//! asynchronously with flushes serialized, so reads never wait on disk I/O.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use repairdesk_core::CacheEntry;

use crate::error::StorageError;
use crate::fs_util::{read_snapshot, write_atomic};

#[derive(Debug)]
pub struct LocalCacheTier {
    path: PathBuf,
    entries: Mutex<HashMap<String, CacheEntry>>,
    flush_lock: tokio::sync::Mutex<()>,
}

impl LocalCacheTier {
    /// Opens the tier, loading existing entries from `path`.
    ///
    /// A corrupt cache file is discarded with a warning: cached search results
    /// are always recoverable from the research API.
    ///
    /// # Errors
    /// Returns an error only if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries: HashMap<String, CacheEntry> = match read_snapshot(&path) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e @ StorageError::DataCorruption { .. }) => {
                tracing::warn!(path = %path.display(), error = %e, "discarding corrupt shop cache");
                HashMap::new()
            },
            Err(e) => return Err(e),
        };
        Ok(Self { path, entries: Mutex::new(entries), flush_lock: tokio::sync::Mutex::new(()) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }

    /// Overwrites `key` and rewrites the cache file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written; the in-memory entry is
    /// kept either way.
    pub async fn put(&self, key: &str, entry: CacheEntry) -> Result<(), StorageError> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).insert(key.to_owned(), entry);
        self.flush().await
    }

    /// Snapshots the entries as they are once the flush lock is held, then
    /// writes without holding the entry lock.
    async fn flush(&self) -> Result<(), StorageError> {
        let _guard = self.flush_lock.lock().await;
        let bytes = {
            let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            serde_json::to_vec_pretty(&*entries)
                .map_err(|e| StorageError::corrupt("serializing shop cache", e))?
        };
        write_atomic(&self.path, &bytes).await
    }
}
