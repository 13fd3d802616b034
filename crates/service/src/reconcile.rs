//! Startup reconciliation sweep.
//!
//! Sessions persisted as `calling` lost their monitor when the previous
//! process exited. Old ones are failed; recent ones get their monitor back.

use serde::Serialize;

use crate::booking::BookingService;
use crate::quote_calls::QuoteCallService;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    pub failed_sessions: usize,
    pub resumed_sessions: usize,
    pub failed_bookings: usize,
    pub resumed_bookings: usize,
}

impl ReconciliationReport {
    pub const fn is_empty(&self) -> bool {
        self.failed_sessions == 0
            && self.resumed_sessions == 0
            && self.failed_bookings == 0
            && self.resumed_bookings == 0
    }
}

pub async fn run_startup_reconciliation(
    quotes: &QuoteCallService,
    bookings: &BookingService,
    stale_after: chrono::Duration,
) -> ReconciliationReport {
    let (failed_sessions, resumed_sessions) = quotes.reconcile(stale_after).await;
    let (failed_bookings, resumed_bookings) = bookings.reconcile(stale_after).await;
    let report =
        ReconciliationReport { failed_sessions, resumed_sessions, failed_bookings, resumed_bookings };
    if report.is_empty() {
        tracing::debug!("startup reconciliation: nothing in flight");
    } else {
        tracing::info!(
            failed_sessions,
            resumed_sessions,
            failed_bookings,
            resumed_bookings,
            "startup reconciliation finished"
        );
    }
    report
}
