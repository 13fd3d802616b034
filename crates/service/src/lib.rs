//! Service layer for repairdesk
//!
//! Orchestration between the HTTP handlers, the remote task clients and the
//! stores: the fetch-or-cache shop search, quote-call and booking sessions
//! with their background monitors, and the startup reconciliation sweep.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::cognitive_complexity, reason = "Complex async flows are inherent")]
#![allow(clippy::min_ident_chars, reason = "Short error vars are idiomatic")]

mod booking;
mod error;
mod quote_calls;
mod reconcile;
mod shop_search;

#[cfg(test)]
mod tests;

pub use booking::{BookingRequest, BookingService, BookingStatus, StartBookingResult};
pub use error::ServiceError;
pub use quote_calls::{CallSessionStatus, QuoteCallService, StartCallsRequest, StartCallsResult};
pub use reconcile::{ReconciliationReport, run_startup_reconciliation};
pub use shop_search::{ShopSearchRequest, ShopSearchResult, ShopSearchService};
