//! Runtime configuration loaded from `REPAIRDESK_*` environment variables.
//!
//! A missing credential never fails startup: the matching capability runs in
//! simulation mode instead.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_MAX_WAIT_MS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_SEARCH_TIMEOUT_MS,
    DEFAULT_SIMULATION_DELAY_MS, DEFAULT_STALE_SESSION_SECS,
};
use crate::env_config::{non_empty, parse_with_default};

pub const DEFAULT_RESEARCH_URL: &str = "https://api.browser-use.com";
pub const DEFAULT_VOICE_URL: &str = "https://api.vapi.ai";
pub const DEFAULT_CACHE_TABLE: &str = "shop_cache";

/// Credentials for the web research API.
#[derive(Clone)]
pub struct ResearchConfig {
    pub api_key: String,
    pub base_url: String,
}

/// Credentials for the voice calling API.
#[derive(Clone)]
pub struct VoiceConfig {
    pub api_key: String,
    pub base_url: String,
    pub phone_number_id: String,
    pub assistant_id: Option<String>,
}

/// Connection settings for the remote cache tier (PostgREST-style table).
#[derive(Clone)]
pub struct RemoteCacheConfig {
    pub base_url: String,
    pub api_key: String,
    pub table: String,
}

impl fmt::Debug for ResearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResearchConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl fmt::Debug for VoiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("phone_number_id", &self.phone_number_id)
            .field("assistant_id", &self.assistant_id)
            .finish()
    }
}

impl fmt::Debug for RemoteCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteCacheConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("table", &self.table)
            .finish()
    }
}

/// Timeouts and intervals for the orchestration layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub search_timeout: Duration,
    pub poll_interval: Duration,
    pub max_wait: Duration,
    pub simulation_delay: Duration,
    pub stale_session_after: chrono::Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            search_timeout: Duration::from_millis(DEFAULT_SEARCH_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_wait: Duration::from_millis(DEFAULT_MAX_WAIT_MS),
            simulation_delay: Duration::from_millis(DEFAULT_SIMULATION_DELAY_MS),
            stale_session_after: chrono::Duration::seconds(DEFAULT_STALE_SESSION_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub research: Option<ResearchConfig>,
    pub voice: Option<VoiceConfig>,
    pub remote_cache: Option<RemoteCacheConfig>,
    pub timings: Timings,
}

impl AppConfig {
    /// Reads the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| non_empty(lookup(var));

        let data_dir = get("REPAIRDESK_DATA_DIR").map(PathBuf::from).unwrap_or_else(|| {
            dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join("repairdesk")
        });

        let research = get("REPAIRDESK_RESEARCH_API_KEY").map(|api_key| ResearchConfig {
            api_key,
            base_url: trim_url(
                get("REPAIRDESK_RESEARCH_URL").unwrap_or_else(|| DEFAULT_RESEARCH_URL.to_owned()),
            ),
        });

        let voice = match (get("REPAIRDESK_VOICE_API_KEY"), get("REPAIRDESK_VOICE_PHONE_NUMBER_ID")) {
            (Some(api_key), Some(phone_number_id)) => Some(VoiceConfig {
                api_key,
                base_url: trim_url(
                    get("REPAIRDESK_VOICE_URL").unwrap_or_else(|| DEFAULT_VOICE_URL.to_owned()),
                ),
                phone_number_id,
                assistant_id: get("REPAIRDESK_VOICE_ASSISTANT_ID"),
            }),
            (Some(_), None) => {
                tracing::warn!(
                    "REPAIRDESK_VOICE_API_KEY set without REPAIRDESK_VOICE_PHONE_NUMBER_ID, voice calls will be simulated"
                );
                None
            },
            _ => None,
        };

        let remote_cache = match (get("REPAIRDESK_CACHE_URL"), get("REPAIRDESK_CACHE_KEY")) {
            (Some(base_url), Some(api_key)) => Some(RemoteCacheConfig {
                base_url: trim_url(base_url),
                api_key,
                table: get("REPAIRDESK_CACHE_TABLE").unwrap_or_else(|| DEFAULT_CACHE_TABLE.to_owned()),
            }),
            _ => None,
        };

        let defaults = Timings::default();
        let millis = |var: &str, default: Duration| {
            let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
            Duration::from_millis(parse_with_default(var, lookup(var), default_ms))
        };
        let timings = Timings {
            search_timeout: millis("REPAIRDESK_SEARCH_TIMEOUT_MS", defaults.search_timeout),
            poll_interval: millis("REPAIRDESK_POLL_INTERVAL_MS", defaults.poll_interval),
            max_wait: millis("REPAIRDESK_MAX_WAIT_MS", defaults.max_wait),
            simulation_delay: millis("REPAIRDESK_SIMULATION_DELAY_MS", defaults.simulation_delay),
            stale_session_after: chrono::Duration::seconds(parse_with_default(
                "REPAIRDESK_STALE_SESSION_SECS",
                lookup("REPAIRDESK_STALE_SESSION_SECS"),
                DEFAULT_STALE_SESSION_SECS,
            )),
        };

        Self { data_dir, research, voice, remote_cache, timings }
    }

    pub fn call_sessions_path(&self) -> PathBuf {
        self.data_dir.join("call_sessions.json")
    }

    pub fn booking_sessions_path(&self) -> PathBuf {
        self.data_dir.join("booking_sessions.json")
    }

    pub fn shop_cache_path(&self) -> PathBuf {
        self.data_dir.join("shop_cache.json")
    }
}

fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_owned()
}
