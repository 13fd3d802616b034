//! Typed error enum for the remote task clients.

use std::time::Duration;

use repairdesk_core::TaskKind;
use thiserror::Error;

/// Errors from remote task API operations and polling.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("unknown task {0}")]
    UnknownTask(String),
    #[error("{kind} task {id} ended in failure")]
    TaskFailed { kind: TaskKind, id: String },
    #[error("task kind mismatch: expected {expected}, got {got}")]
    KindMismatch { expected: TaskKind, got: TaskKind },
    #[error("client initialization failed: {0}")]
    ClientInit(String),
    #[error("task did not reach a terminal state within {waited:?}")]
    Timeout { waited: Duration },
}

impl RemoteError {
    /// Whether this error is transient and the status check may be repeated.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HttpRequest(_) => true,
            Self::HttpStatus { code, .. } => matches!(code, 429 | 500 | 502 | 503 | 504 | 529),
            _ => false,
        }
    }

    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
