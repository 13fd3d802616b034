use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::shop::Shop;

/// Shops previously found for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub location: String,
    pub shops: Vec<Shop>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub damage_description: String,
}

impl CacheEntry {
    pub fn new(
        location: impl Into<String>,
        shops: Vec<Shop>,
        damage_description: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            location: location.into(),
            shops,
            timestamp,
            damage_description: damage_description.into(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.timestamp > ttl
    }
}

/// Derives the cache key for a location.
///
/// Lowercases, then maps every character outside `[a-z0-9]` to `_`. Distinct
/// locations can collide ("San Jose, CA!" and "San Jose, CA?"); that is
/// accepted.
pub fn cache_key(location: &str) -> String {
    location
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '_' })
        .collect()
}
