//! Typed error enum for the storage layer.
//!
//! Lets callers tell file-system failures, corrupt snapshots and remote cache
//! failures apart instead of downcasting opaque boxes.

use std::path::PathBuf;

use thiserror::Error;

/// Storage-layer error with variants covering every expected failure mode.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing a snapshot file failed.
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot or row data could not be (de)serialized.
    #[error("data corruption: {context}")]
    DataCorruption {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Transport failure talking to the remote cache tier.
    #[error("remote cache request failed: {0}")]
    Remote(#[from] reqwest::Error),

    /// Remote cache tier answered with a non-success status.
    #[error("remote cache returned HTTP {code}: {body}")]
    RemoteStatus { code: u16, body: String },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn corrupt(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::DataCorruption { context: context.into(), source }
    }

    /// Whether this error is likely transient (worth retrying).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Remote(e) => e.is_timeout() || e.is_connect(),
            Self::RemoteStatus { code, .. } => matches!(code, 429 | 500 | 502 | 503 | 504),
            Self::Io { .. } | Self::DataCorruption { .. } => false,
        }
    }
}
