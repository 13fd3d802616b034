//! Shared constants for repairdesk.
//!
//! Polling policies and timeouts are fixed per job kind; the values here are
//! the defaults that `AppConfig` falls back to.

/// Interval between two status checks of the same remote task.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;

/// Maximum time a poll loop waits for a terminal state (10 minutes).
pub const DEFAULT_MAX_WAIT_MS: u64 = 600_000;

/// Budget for a shop search before cache or fallback data is served.
pub const DEFAULT_SEARCH_TIMEOUT_MS: u64 = 15_000;

/// Latency of a simulated task when no credentials are configured.
pub const DEFAULT_SIMULATION_DELAY_MS: u64 = 3_000;

/// Sessions still `calling` after this many seconds are failed at startup.
pub const DEFAULT_STALE_SESSION_SECS: i64 = 1_800;

/// Time-to-live of entries in the remote cache tier (7 days).
pub const REMOTE_CACHE_TTL_SECS: i64 = 7 * 86_400;

/// Shops called per quote session when the caller gives no limit.
pub const DEFAULT_CALL_LIMIT: usize = 3;

/// Upper bound on shops called per quote session.
pub const MAX_CALL_LIMIT: usize = 5;

/// Search radius used when the caller gives none.
pub const DEFAULT_SEARCH_RADIUS_MILES: u32 = 10;

/// Maximum shops returned by one search.
pub const MAX_SEARCH_RESULTS: usize = 10;
