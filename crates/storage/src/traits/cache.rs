use async_trait::async_trait;
use repairdesk_core::CacheEntry;

use crate::error::StorageError;

/// Networked cache tier. Entries expire remotely after their TTL.
#[async_trait]
pub trait RemoteCacheTier: Send + Sync {
    /// Get the entry stored under `key`, if present and not expired.
    async fn fetch(&self, key: &str) -> Result<Option<CacheEntry>, StorageError>;

    /// Overwrite the entry stored under `key`.
    async fn store(&self, key: &str, entry: &CacheEntry) -> Result<(), StorageError>;
}
