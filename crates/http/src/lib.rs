//! HTTP API server for repairdesk.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(clippy::absolute_paths, reason = "Explicit paths for clarity")]
#![allow(missing_copy_implementations, reason = "Types may grow")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short closure params are idiomatic")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]
#![allow(clippy::single_call_fn, reason = "Helper functions improve readability")]

pub mod api_error;
mod api_types;
mod handlers;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Json, Router};
use repairdesk_service::{BookingService, QuoteCallService, ShopSearchService};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use api_types::VersionResponse;

/// Shared application state for all HTTP handlers.
pub struct AppState {
    pub shop_search: Arc<ShopSearchService>,
    pub quote_calls: Arc<QuoteCallService>,
    pub bookings: Arc<BookingService>,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/version", get(version))
        .route("/api/shops/search", post(handlers::search::search_shops))
        .route("/api/calls", post(handlers::calls::start_calls))
        .route("/api/calls/{session_id}", get(handlers::calls::get_call_session))
        .route("/api/bookings", post(handlers::bookings::start_booking))
        .route("/api/bookings/{booking_id}", get(handlers::bookings::get_booking))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { version: env!("CARGO_PKG_VERSION") })
}
