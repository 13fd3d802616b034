//! Booking-call sessions: one call to one shop to book an appointment.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Days, Utc};
use repairdesk_core::{BookingOutcome, BookingSession, SessionStatus, Shop, ShopContact, TaskKind};
use repairdesk_remote::{
    BookingCallRequest, PollPolicy, TaskClient, TaskHandle, TaskOutput, TaskPayload,
    poll_until_terminal,
};
use repairdesk_storage::SessionStore;
use serde::Serialize;

use crate::ServiceError;

#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    pub shop: Shop,
    pub damage_description: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub preferred_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartBookingResult {
    pub booking_id: String,
    pub requested_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingStatus {
    pub booking_id: String,
    pub status: SessionStatus,
    pub elapsed_seconds: i64,
    pub shop: ShopContact,
    pub requested_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<BookingOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BookingStatus {
    pub fn from_session(session: BookingSession, now: DateTime<Utc>) -> Self {
        Self {
            elapsed_seconds: session.elapsed_seconds(now),
            booking_id: session.booking_id,
            status: session.status,
            shop: session.shop,
            requested_date: session.requested_date,
            result: session.result,
            error: session.error,
        }
    }
}

pub struct BookingService {
    client: Arc<dyn TaskClient>,
    store: Arc<dyn SessionStore<BookingSession>>,
    policy: PollPolicy,
}

impl BookingService {
    #[must_use]
    pub fn new(
        client: Arc<dyn TaskClient>,
        store: Arc<dyn SessionStore<BookingSession>>,
        policy: PollPolicy,
    ) -> Self {
        Self { client, store, policy }
    }

    /// Places the booking call and starts monitoring it.
    ///
    /// A call that cannot be placed still yields a stored, `failed` booking
    /// with `error` set.
    pub async fn start_booking(
        &self,
        request: BookingRequest,
    ) -> Result<StartBookingResult, ServiceError> {
        let customer_name = request.customer_name.trim().to_owned();
        let customer_phone = request.customer_phone.trim().to_owned();
        if customer_name.is_empty() || customer_phone.is_empty() {
            return Err(ServiceError::InvalidInput("customer name and phone are required".to_owned()));
        }
        if !request.shop.has_phone() {
            return Err(ServiceError::InvalidInput(format!(
                "shop '{}' has no phone number",
                request.shop.name
            )));
        }
        let now = Utc::now();
        let requested_date = resolve_requested_date(request.preferred_time.as_deref(), now);
        let shop = request.shop.contact();
        let damage_description = request.damage_description.trim().to_owned();

        let payload = TaskPayload::BookingCall(BookingCallRequest {
            shop: shop.clone(),
            customer_name: customer_name.clone(),
            customer_phone: customer_phone.clone(),
            damage_description: damage_description.clone(),
            requested_date: requested_date.clone(),
        });
        let created = self.client.create_task(&payload).await;
        let call_id = created.as_ref().map(|handle| handle.id.clone()).unwrap_or_default();

        let mut session = BookingSession::new(
            call_id,
            shop,
            customer_name,
            customer_phone,
            damage_description,
            requested_date.clone(),
            now,
        );
        let booking_id = session.booking_id.clone();

        if let Err(e) = created {
            tracing::warn!(booking = %booking_id, error = %e, "failed to place booking call");
            let error = format!("could not place booking call: {e}");
            session.mark_failed(error.clone());
            self.store.persist(&session).await;
            return Ok(StartBookingResult { booking_id, requested_date, error: Some(error) });
        }

        self.store.persist(&session).await;
        tracing::info!(booking = %booking_id, call = %session.call_id, "booking call started");
        self.spawn_monitor(session, self.policy);
        Ok(StartBookingResult { booking_id, requested_date, error: None })
    }

    pub async fn get_booking_status(&self, booking_id: &str) -> Result<BookingStatus, ServiceError> {
        let session = self
            .store
            .load(booking_id)
            .await
            .ok_or_else(|| ServiceError::NotFound { entity: "booking", id: booking_id.to_owned() })?;
        Ok(BookingStatus::from_session(session, Utc::now()))
    }

    pub async fn all_bookings(&self) -> Vec<BookingSession> {
        self.store.load_all().await.into_values().collect()
    }

    /// Same contract as [`crate::QuoteCallService::reconcile`].
    pub async fn reconcile(&self, stale_after: chrono::Duration) -> (usize, usize) {
        let now = Utc::now();
        let mut failed = 0;
        let mut resumed = 0;
        for mut session in self.all_bookings().await {
            if session.status != SessionStatus::Calling {
                continue;
            }
            let age = now - session.start_time;
            if age > stale_after || session.call_id.is_empty() {
                session.mark_failed("abandoned: the service restarted while the call was in progress");
                self.store.persist(&session).await;
                failed += 1;
                continue;
            }
            let elapsed = age.to_std().unwrap_or(Duration::ZERO);
            let policy = PollPolicy {
                max_wait: self.policy.max_wait.saturating_sub(elapsed),
                ..self.policy
            };
            tracing::info!(booking = %session.booking_id, "resuming booking call monitor");
            self.spawn_monitor(session, policy);
            resumed += 1;
        }
        (failed, resumed)
    }

    fn spawn_monitor(&self, session: BookingSession, policy: PollPolicy) {
        let client = Arc::clone(&self.client);
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            monitor_booking(client.as_ref(), store.as_ref(), session, policy).await;
        });
    }
}

async fn monitor_booking(
    client: &dyn TaskClient,
    store: &dyn SessionStore<BookingSession>,
    mut session: BookingSession,
    policy: PollPolicy,
) {
    let handle = TaskHandle::new(TaskKind::BookingCall, session.call_id.clone());
    match poll_until_terminal(client, &handle, policy).await {
        Ok(status) => {
            let outcome = match status.output {
                Some(TaskOutput::Booking { outcome, .. }) => outcome,
                _ => None,
            };
            session.record_call_outcome(status.state, outcome);
            tracing::info!(
                booking = %session.booking_id,
                status = %session.status,
                "booking call finished"
            );
        },
        Err(e) => {
            tracing::warn!(booking = %session.booking_id, error = %e, "booking call monitor failed");
            let reason = if e.is_timeout() {
                format!("booking call did not finish in time: {e}")
            } else {
                e.to_string()
            };
            session.mark_failed(reason);
        },
    }
    store.persist(&session).await;
}

/// The caller's preferred time, or tomorrow's date when none is given.
fn resolve_requested_date(preferred: Option<&str>, now: DateTime<Utc>) -> String {
    match preferred.map(str::trim).filter(|p| !p.is_empty()) {
        Some(preferred) => preferred.to_owned(),
        None => {
            let today = now.date_naive();
            today.checked_add_days(Days::new(1)).unwrap_or(today).format("%Y-%m-%d").to_string()
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_requested_date_defaults_to_tomorrow() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 15, 30, 0).unwrap();
        assert_eq!(resolve_requested_date(None, now), "2026-10-20");
        assert_eq!(resolve_requested_date(Some("  "), now), "2026-10-20");
        assert_eq!(resolve_requested_date(Some(" Friday 9am "), now), "Friday 9am");
    }
}
