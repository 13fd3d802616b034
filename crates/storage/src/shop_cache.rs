//! Two-tier shop cache.
//!
//! Reads check the local tier first and fall back to the remote tier; remote
//! hits are copied into the local tier so both tiers converge. Writes to the
//! local tier are awaited; the remote tier is written in a detached task.

use std::sync::Arc;

use chrono::{Duration, Utc};
use repairdesk_core::{CacheEntry, REMOTE_CACHE_TTL_SECS, Shop, cache_key};

use crate::local_cache::LocalCacheTier;
use crate::traits::RemoteCacheTier;

pub struct ShopCache {
    local: LocalCacheTier,
    remote: Option<Arc<dyn RemoteCacheTier>>,
    ttl: Duration,
}

impl std::fmt::Debug for ShopCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopCache")
            .field("local", &self.local)
            .field("remote", &self.remote.is_some())
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl ShopCache {
    pub fn new(local: LocalCacheTier, remote: Option<Arc<dyn RemoteCacheTier>>) -> Self {
        Self { local, remote, ttl: Duration::seconds(REMOTE_CACHE_TTL_SECS) }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub async fn get(&self, location: &str) -> Option<CacheEntry> {
        let key = cache_key(location);
        if let Some(entry) = self.local.get(&key) {
            tracing::debug!(key = %key, "shop cache hit (local)");
            return Some(entry);
        }

        let remote = self.remote.as_ref()?;
        match remote.fetch(&key).await {
            Ok(Some(entry)) if !entry.is_expired(Utc::now(), self.ttl) => {
                tracing::debug!(key = %key, "shop cache hit (remote), backfilling local tier");
                if let Err(e) = self.local.put(&key, entry.clone()).await {
                    tracing::warn!(key = %key, error = %e, "failed to backfill local shop cache");
                }
                Some(entry)
            },
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(
                    key = %key,
                    transient = e.is_transient(),
                    error = %e,
                    "remote shop cache lookup failed"
                );
                None
            },
        }
    }

    /// Unconditionally overwrites the entry for `location` in both tiers.
    pub async fn put(
        &self,
        location: &str,
        shops: Vec<Shop>,
        damage_description: &str,
    ) -> CacheEntry {
        let key = cache_key(location);
        let entry = CacheEntry::new(location, shops, damage_description, Utc::now());

        if let Err(e) = self.local.put(&key, entry.clone()).await {
            tracing::error!(key = %key, error = %e, "failed to write local shop cache");
        }

        if let Some(remote) = &self.remote {
            let remote = Arc::clone(remote);
            let remote_entry = entry.clone();
            // Fire and forget: the caller never waits on the remote tier.
            tokio::spawn(async move {
                if let Err(e) = remote.store(&key, &remote_entry).await {
                    tracing::warn!(
                        key = %key,
                        transient = e.is_transient(),
                        error = %e,
                        "remote shop cache write failed"
                    );
                }
            });
        }

        entry
    }
}
