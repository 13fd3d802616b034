//! JSON snapshot-backed [`SessionStore`].
//!
//! The whole table lives in memory and is rewritten to disk as a complete
//! snapshot after every mutation. Flushes are serialized, and each flush
//! serializes the table as it is when the flush starts, so the file always
//! ends up holding the latest state.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::error::StorageError;
use crate::fs_util::{read_snapshot, write_atomic};
use crate::traits::{SessionRecord, SessionStore};

pub struct JsonSnapshotStore<T> {
    path: PathBuf,
    records: RwLock<HashMap<String, T>>,
    flush_lock: Mutex<()>,
}

impl<T> std::fmt::Debug for JsonSnapshotStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonSnapshotStore").field("path", &self.path).finish_non_exhaustive()
    }
}

impl<T: SessionRecord> JsonSnapshotStore<T> {
    /// Opens the store, hydrating it from `path` when the file exists.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let records: HashMap<String, T> = read_snapshot(&path)?.unwrap_or_default();
        tracing::info!(
            entity = T::ENTITY,
            path = %path.display(),
            count = records.len(),
            "hydrated session store"
        );
        Ok(Self { path, records: RwLock::new(records), flush_lock: Mutex::new(()) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the current table to disk.
    ///
    /// # Errors
    /// Returns an error if serialization or the atomic file write fails.
    pub async fn flush(&self) -> Result<(), StorageError> {
        let _guard = self.flush_lock.lock().await;
        let bytes = {
            let records = self.records.read().await;
            serde_json::to_vec_pretty(&*records)
                .map_err(|e| StorageError::corrupt(format!("serializing {}", T::ENTITY), e))?
        };
        write_atomic(&self.path, &bytes).await
    }
}

#[async_trait]
impl<T: SessionRecord> SessionStore<T> for JsonSnapshotStore<T> {
    async fn persist(&self, session: &T) {
        let id = session.record_id().to_owned();
        self.records.write().await.insert(id.clone(), session.clone());
        if let Err(e) = self.flush().await {
            tracing::error!(entity = T::ENTITY, id = %id, error = %e, "failed to persist session");
        }
    }

    async fn load(&self, id: &str) -> Option<T> {
        self.records.read().await.get(id).cloned()
    }

    async fn load_all(&self) -> HashMap<String, T> {
        self.records.read().await.clone()
    }
}
