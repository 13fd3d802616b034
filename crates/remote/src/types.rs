//! Boundary records for the three remote job kinds.
//!
//! Requests and outputs are explicit per-kind variants; raw third-party JSON
//! never leaves this crate.

use repairdesk_core::{BookingOutcome, Quotation, Shop, ShopContact, TaskKind, TaskState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct ResearchRequest {
    pub location: String,
    pub damage_description: String,
    pub radius_miles: u32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteCallRequest {
    pub shop: ShopContact,
    pub damage_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingCallRequest {
    pub shop: ShopContact,
    pub customer_name: String,
    pub customer_phone: String,
    pub damage_description: String,
    pub requested_date: String,
}

/// What to create on the remote side.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskPayload {
    Research(ResearchRequest),
    QuoteCall(QuoteCallRequest),
    BookingCall(BookingCallRequest),
}

impl TaskPayload {
    pub const fn kind(&self) -> TaskKind {
        match self {
            Self::Research(_) => TaskKind::Research,
            Self::QuoteCall(_) => TaskKind::QuoteCall,
            Self::BookingCall(_) => TaskKind::BookingCall,
        }
    }
}

/// Opaque reference to a remote task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskHandle {
    pub kind: TaskKind,
    pub id: String,
}

impl TaskHandle {
    pub fn new(kind: TaskKind, id: impl Into<String>) -> Self {
        Self { kind, id: id.into() }
    }
}

/// Conversation artifacts shared by both call kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallReport {
    pub transcript: Option<String>,
    pub summary: Option<String>,
    pub ended_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutput {
    Shops(Vec<Shop>),
    Quote { report: CallReport, quotation: Option<Quotation> },
    Booking { report: CallReport, outcome: Option<BookingOutcome> },
}

/// Normalized view of a remote task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskStatus {
    pub state: TaskState,
    pub output: Option<TaskOutput>,
}

impl TaskStatus {
    pub const fn pending() -> Self {
        Self { state: TaskState::Pending, output: None }
    }

    pub const fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}
