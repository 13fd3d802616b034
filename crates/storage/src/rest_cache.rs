//! Remote cache tier backed by a PostgREST-style table.
//!
//! Rows carry an `expires_at` column set to `timestamp + ttl`; expired rows
//! are treated as misses even before the table owner purges them.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use repairdesk_core::{CacheEntry, RemoteCacheConfig, Shop};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::traits::RemoteCacheTier;

const REQUEST_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Serialize, Deserialize)]
struct CacheRow {
    cache_key: String,
    location: String,
    shops: Vec<Shop>,
    #[serde(default)]
    damage_description: String,
    timestamp: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

pub struct RestCacheTier {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    table: String,
    ttl: Duration,
}

impl std::fmt::Debug for RestCacheTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestCacheTier")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("table", &self.table)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl RestCacheTier {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(config: &RemoteCacheConfig, ttl: Duration) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            table: config.table.clone(),
            ttl,
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StorageError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_else(|_| "Could not read error body".to_owned());
        Err(StorageError::RemoteStatus { code: status.as_u16(), body })
    }
}

#[async_trait]
impl RemoteCacheTier for RestCacheTier {
    async fn fetch(&self, key: &str) -> Result<Option<CacheEntry>, StorageError> {
        let response = self
            .client
            .get(self.table_url())
            .query(&[("cache_key", format!("eq.{key}")), ("select", "*".to_owned())])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let body = Self::check(response).await?.text().await?;
        let rows: Vec<CacheRow> = serde_json::from_str(&body)
            .map_err(|e| StorageError::corrupt("remote cache rows", e))?;

        let now = Utc::now();
        Ok(rows.into_iter().find(|row| row.expires_at > now).map(|row| CacheEntry {
            location: row.location,
            shops: row.shops,
            timestamp: row.timestamp,
            damage_description: row.damage_description,
        }))
    }

    async fn store(&self, key: &str, entry: &CacheEntry) -> Result<(), StorageError> {
        let row = CacheRow {
            cache_key: key.to_owned(),
            location: entry.location.clone(),
            shops: entry.shops.clone(),
            damage_description: entry.damage_description.clone(),
            timestamp: entry.timestamp,
            expires_at: entry.timestamp + self.ttl,
        };
        let response = self
            .client
            .post(self.table_url())
            .query(&[("on_conflict", "cache_key")])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&row)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
