//! Fetch-or-cache shop search.
//!
//! A live research task is started as a detached tokio task and raced
//! against a deadline measured from the start of the request. Whatever
//! happens to the race, the detached fetch keeps running and refreshes the
//! cache when it finds shops. The cache lookup runs alongside the fetch and
//! is only awaited when the live result cannot be served.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use repairdesk_core::{
    CacheEntry, DEFAULT_SEARCH_RADIUS_MILES, DEFAULT_SEARCH_TIMEOUT_MS, Shop, TaskKind, TaskState,
    fallback_shops,
};
use repairdesk_remote::{
    PollPolicy, RemoteError, ResearchRequest, TaskClient, TaskOutput, TaskPayload,
    poll_until_terminal,
};
use repairdesk_storage::ShopCache;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::{Instant, timeout_at};

use crate::ServiceError;

#[derive(Debug, Clone, PartialEq)]
pub struct ShopSearchRequest {
    pub location: String,
    pub damage_description: String,
    pub radius_miles: Option<u32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShopSearchResult {
    pub shops: Vec<Shop>,
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ShopSearchResult {
    fn fresh(shops: Vec<Shop>) -> Self {
        Self { shops, cached: false, cache_timestamp: None, message: None, error: None }
    }

    /// Cache entry if one with shops exists, otherwise the fallback dataset.
    fn degraded(entry: Option<CacheEntry>, message: &str, error: Option<String>) -> Self {
        match entry {
            Some(entry) => Self {
                shops: entry.shops,
                cached: true,
                cache_timestamp: Some(entry.timestamp),
                message: Some(format!("{message}; showing cached results")),
                error,
            },
            None => Self {
                shops: fallback_shops(),
                cached: true,
                cache_timestamp: None,
                message: Some(format!("{message}; showing sample shops")),
                error,
            },
        }
    }
}

pub struct ShopSearchService {
    client: Arc<dyn TaskClient>,
    cache: Arc<ShopCache>,
    policy: PollPolicy,
    search_timeout: Duration,
}

impl ShopSearchService {
    #[must_use]
    pub fn new(client: Arc<dyn TaskClient>, cache: Arc<ShopCache>, policy: PollPolicy) -> Self {
        Self {
            client,
            cache,
            policy,
            search_timeout: Duration::from_millis(DEFAULT_SEARCH_TIMEOUT_MS),
        }
    }

    #[must_use]
    pub const fn with_search_timeout(mut self, search_timeout: Duration) -> Self {
        self.search_timeout = search_timeout;
        self
    }

    /// Never fails on remote trouble: the worst case is cached or sample
    /// shops with `error` set. Only a blank location is rejected.
    pub async fn resolve_shops(
        &self,
        request: ShopSearchRequest,
    ) -> Result<ShopSearchResult, ServiceError> {
        let location = request.location.trim().to_owned();
        if location.is_empty() {
            return Err(ServiceError::InvalidInput("location is required".to_owned()));
        }
        let deadline = Instant::now() + self.search_timeout;
        let damage_description = request.damage_description.trim().to_owned();

        let research = ResearchRequest {
            location: location.clone(),
            damage_description: damage_description.clone(),
            radius_miles: request.radius_miles.unwrap_or(DEFAULT_SEARCH_RADIUS_MILES),
            latitude: request.latitude,
            longitude: request.longitude,
        };
        let fetch = tokio::spawn(fetch_and_cache(
            Arc::clone(&self.client),
            Arc::clone(&self.cache),
            self.policy,
            research,
        ));

        let lookup = {
            let cache = Arc::clone(&self.cache);
            let location = location.clone();
            tokio::spawn(async move {
                cache.get(&location).await.filter(|entry| !entry.shops.is_empty())
            })
        };

        let result = match timeout_at(deadline, fetch).await {
            Ok(Ok(Ok(shops))) if !shops.is_empty() => {
                tracing::info!(location = %location, count = shops.len(), "live shop search succeeded");
                ShopSearchResult::fresh(shops)
            },
            Ok(Ok(Ok(_))) => {
                tracing::warn!(location = %location, "live shop search returned no shops");
                ShopSearchResult::degraded(
                    cached_entry(lookup).await,
                    "No shops found by live search",
                    Some("live search returned no shops".to_owned()),
                )
            },
            Ok(Ok(Err(e))) => {
                tracing::warn!(location = %location, error = %e, "live shop search failed");
                ShopSearchResult::degraded(
                    cached_entry(lookup).await,
                    "Live search failed",
                    Some(e.to_string()),
                )
            },
            Ok(Err(e)) => {
                tracing::error!(location = %location, error = %e, "shop search task aborted");
                ShopSearchResult::degraded(
                    cached_entry(lookup).await,
                    "Live search failed",
                    Some("search task aborted".to_owned()),
                )
            },
            Err(_) => {
                tracing::info!(
                    location = %location,
                    timeout_ms = self.search_timeout.as_millis(),
                    "live shop search still running, serving cache or sample data"
                );
                ShopSearchResult::degraded(
                    cached_entry(lookup).await,
                    "Live search is still running",
                    None,
                )
            },
        };
        Ok(result)
    }
}

/// Result of the concurrent cache lookup; a panicked lookup counts as a miss.
async fn cached_entry(lookup: JoinHandle<Option<CacheEntry>>) -> Option<CacheEntry> {
    lookup.await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "shop cache lookup task failed");
        None
    })
}

/// Runs one research task to completion and caches a non-empty result.
async fn fetch_and_cache(
    client: Arc<dyn TaskClient>,
    cache: Arc<ShopCache>,
    policy: PollPolicy,
    request: ResearchRequest,
) -> Result<Vec<Shop>, RemoteError> {
    let location = request.location.clone();
    let damage_description = request.damage_description.clone();

    let handle = client.create_task(&TaskPayload::Research(request)).await?;
    let status = poll_until_terminal(client.as_ref(), &handle, policy).await?;
    if status.state == TaskState::Failed {
        return Err(RemoteError::TaskFailed { kind: TaskKind::Research, id: handle.id });
    }
    let shops = match status.output {
        Some(TaskOutput::Shops(shops)) => shops,
        _ => Vec::new(),
    };

    if shops.is_empty() {
        tracing::info!(location = %location, task = %handle.id, "research task found no shops");
    } else {
        cache.put(&location, shops.clone(), &damage_description).await;
        tracing::debug!(location = %location, count = shops.len(), "shop cache refreshed");
    }
    Ok(shops)
}
