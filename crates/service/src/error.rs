//! Typed error enum for the service layer.
//!
//! Remote and timeout failures are absorbed into session state or fallback
//! payloads before they reach callers; what remains here is what a caller
//! can act on.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller provided invalid input (empty shop list, blank fields).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No session or booking with this id.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

impl ServiceError {
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
