//! Storage layer for repairdesk
//!
//! Two concerns live here: write-through session stores (call sessions and
//! bookings, one JSON snapshot file each) and the two-tier shop cache (local
//! JSON file plus an optional remote REST table with a TTL).

mod error;
mod fs_util;
mod local_cache;
mod rest_cache;
mod shop_cache;
mod snapshot_store;
#[cfg(test)]
mod tests;
pub mod traits;

pub use error::StorageError;
pub use local_cache::LocalCacheTier;
pub use rest_cache::RestCacheTier;
pub use shop_cache::ShopCache;
pub use snapshot_store::JsonSnapshotStore;
pub use traits::{RemoteCacheTier, SessionRecord, SessionStore};
