use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::ranking::{QuoteAnalysis, analyze_and_rank};
use crate::shop::ShopContact;
use crate::task::TaskState;

/// Local lifecycle of a call or booking session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Calling,
    Completed,
    Failed,
}

impl SessionStatus {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl Display for SessionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match *self {
            Self::Calling => write!(f, "calling"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "calling" => Ok(Self::Calling),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(CoreError::UnknownVariant { kind: "session status", value: s.to_owned() }),
        }
    }
}

/// Price and duration estimate extracted from a finished call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Outcome of one quote call, refreshed on every poll cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallResult {
    pub call_id: String,
    pub shop: ShopContact,
    pub state: TaskState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quotation: Option<Quotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_reason: Option<String>,
}

impl CallResult {
    /// A result for a call whose remote state has not been observed yet.
    pub fn pending(call_id: impl Into<String>, shop: ShopContact) -> Self {
        Self {
            call_id: call_id.into(),
            shop,
            state: TaskState::Pending,
            quotation: None,
            transcript: None,
            summary: None,
            ended_reason: None,
        }
    }

    /// Quoted price when the call produced a usable quotation.
    pub fn quoted_price(&self) -> Option<f64> {
        self.quotation.as_ref().map(|q| q.price).filter(|p| p.is_finite() && *p > 0.0)
    }
}

/// One round of quote calls to several shops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallSession {
    pub session_id: String,
    pub call_ids: Vec<String>,
    pub shops: Vec<ShopContact>,
    pub damage_description: String,
    pub status: SessionStatus,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<CallResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<QuoteAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CallSession {
    /// `call_ids` and `shops` are parallel: one call per shop.
    pub fn new(
        call_ids: Vec<String>,
        shops: Vec<ShopContact>,
        damage_description: impl Into<String>,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            call_ids,
            shops,
            damage_description: damage_description.into(),
            status: SessionStatus::Calling,
            start_time,
            results: None,
            analysis: None,
            error: None,
        }
    }

    /// Records the outcome of one poll cycle.
    ///
    /// The session completes, and gets its ranked analysis, only when there
    /// is one result per call and every result is terminal. Returns `true`
    /// when this cycle completed the session.
    pub fn record_poll_cycle(&mut self, results: Vec<CallResult>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        let all_terminal = results.len() == self.call_ids.len()
            && results.iter().all(|r| r.state.is_terminal());
        if all_terminal {
            self.analysis = Some(analyze_and_rank(&results));
            self.status = SessionStatus::Completed;
        }
        self.results = Some(results);
        all_terminal
    }

    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.status = SessionStatus::Failed;
        self.analysis = None;
        self.error = Some(reason.into());
    }

    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        (now - self.start_time).num_seconds().max(0)
    }
}

/// Appointment details reported by a booking call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingOutcome {
    pub appointment_booked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// One appointment-booking call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSession {
    pub booking_id: String,
    pub call_id: String,
    pub shop: ShopContact,
    pub customer_name: String,
    pub customer_phone: String,
    pub damage_description: String,
    pub requested_date: String,
    pub status: SessionStatus,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<BookingOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BookingSession {
    pub fn new(
        call_id: impl Into<String>,
        shop: ShopContact,
        customer_name: impl Into<String>,
        customer_phone: impl Into<String>,
        damage_description: impl Into<String>,
        requested_date: impl Into<String>,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            booking_id: uuid::Uuid::new_v4().to_string(),
            call_id: call_id.into(),
            shop,
            customer_name: customer_name.into(),
            customer_phone: customer_phone.into(),
            damage_description: damage_description.into(),
            requested_date: requested_date.into(),
            status: SessionStatus::Calling,
            start_time,
            result: None,
            error: None,
        }
    }

    /// Applies the terminal state of the booking call.
    ///
    /// `completed` requires a successful call that actually booked the
    /// appointment; every other terminal combination is `failed`. Non-terminal
    /// states are ignored.
    pub fn record_call_outcome(&mut self, state: TaskState, outcome: Option<BookingOutcome>) {
        if !state.is_terminal() || self.status.is_terminal() {
            return;
        }
        let booked = state == TaskState::Succeeded
            && outcome.as_ref().is_some_and(|o| o.appointment_booked);
        self.status = if booked { SessionStatus::Completed } else { SessionStatus::Failed };
        if !booked && self.error.is_none() {
            self.error = Some(match (state, outcome.is_some()) {
                (TaskState::Failed, _) => "booking call failed".to_owned(),
                (_, true) => "shop could not book the appointment".to_owned(),
                _ => "booking call ended without an outcome".to_owned(),
            });
        }
        self.result = outcome;
    }

    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.status = SessionStatus::Failed;
        self.error = Some(reason.into());
    }

    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        (now - self.start_time).num_seconds().max(0)
    }
}
