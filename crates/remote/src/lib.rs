//! Remote task clients for repairdesk
//!
//! Research (browsing agent) and voice calling APIs behind one
//! create/status interface, a deterministic simulator for missing
//! credentials, and the generic poller.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short closure vars are idiomatic")]

mod client;
mod error;
mod parse;
mod poller;
mod research;
mod simulation;
mod types;
mod voice;

#[cfg(test)]
mod tests;

pub use client::{ExternalTaskClient, TaskClient};
pub use error::RemoteError;
pub use parse::{parse_price, strip_markdown_json, truncate};
pub use poller::{PollPolicy, poll_until, poll_until_terminal};
pub use research::ResearchClient;
pub use simulation::{SIMULATED_ID_PREFIX, Simulator};
pub use types::{
    BookingCallRequest, CallReport, QuoteCallRequest, ResearchRequest, TaskHandle, TaskOutput,
    TaskPayload, TaskStatus,
};
pub use voice::{CallPurpose, VoiceClient};
