use std::collections::HashMap;

use async_trait::async_trait;
use repairdesk_core::{BookingSession, CallSession};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A record kept by a [`SessionStore`], addressed by a locally generated id.
pub trait SessionRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Entity name used in logs.
    const ENTITY: &'static str;

    fn record_id(&self) -> &str;
}

impl SessionRecord for CallSession {
    const ENTITY: &'static str = "call session";

    fn record_id(&self) -> &str {
        &self.session_id
    }
}

impl SessionRecord for BookingSession {
    const ENTITY: &'static str = "booking";

    fn record_id(&self) -> &str {
        &self.booking_id
    }
}

/// Durable id → session table with write-through persistence.
#[async_trait]
pub trait SessionStore<T: SessionRecord>: Send + Sync {
    /// Upsert and flush immediately.
    ///
    /// Best-effort: a failed flush is logged and the in-memory record stays
    /// authoritative for the lifetime of the process.
    async fn persist(&self, session: &T);

    /// Get a session by id.
    async fn load(&self, id: &str) -> Option<T>;

    /// Every known session, keyed by id.
    async fn load_all(&self) -> HashMap<String, T>;
}
