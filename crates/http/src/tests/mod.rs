
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use repairdesk_core::{BookingSession, CallSession};
use repairdesk_remote::{ExternalTaskClient, PollPolicy, TaskClient};
use repairdesk_service::{BookingService, QuoteCallService, ShopSearchService};
use repairdesk_storage::{JsonSnapshotStore, LocalCacheTier, ShopCache};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::{AppState, create_router};

/// Router over fully simulated remote APIs, with stores in a temp dir.
pub(crate) fn test_router(dir: &TempDir, simulation_delay: Duration) -> Router {
    let client: Arc<dyn TaskClient> = Arc::new(ExternalTaskClient::simulated(simulation_delay));
    let policy = PollPolicy::new(Duration::from_millis(10), Duration::from_secs(5));

    let local = LocalCacheTier::open(dir.path().join("shop_cache.json")).unwrap();
    let cache = Arc::new(ShopCache::new(local, None));
    let sessions: Arc<JsonSnapshotStore<CallSession>> =
        Arc::new(JsonSnapshotStore::open(dir.path().join("call_sessions.json")).unwrap());
    let bookings: Arc<JsonSnapshotStore<BookingSession>> =
        Arc::new(JsonSnapshotStore::open(dir.path().join("booking_sessions.json")).unwrap());

    let state = AppState {
        shop_search: Arc::new(
            ShopSearchService::new(Arc::clone(&client), cache, policy)
                .with_search_timeout(Duration::from_millis(200)),
        ),
        quote_calls: Arc::new(QuoteCallService::new(Arc::clone(&client), sessions, policy)),
        bookings: Arc::new(BookingService::new(client, bookings, policy)),
    };
    create_router(Arc::new(state))
}

pub(crate) async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(router, request).await
}

pub(crate) async fn post_json(router: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap();
    send(router, request).await
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}
