//! Error types for the OT engine
//!
//! None of these are retried internally. `ProtocolViolation` and `Desync`
//! mean the session has diverged from the sequencing authority and the
//! caller should resynchronize; `MalformedOperation` means a single message
//! should be dropped.

use thiserror::Error;

/// Errors surfaced by the OT engine
#[derive(Debug, Error)]
pub enum SyncError {
    /// The transport confirmed more operations than are pending
    #[error("Protocol violation: confirmation of {requested} operations but only {pending} pending")]
    ProtocolViolation { requested: usize, pending: usize },

    /// An operation does not fit the current document
    #[error("Desync: operation {op} out of range for document length {document_len}")]
    Desync { op: String, document_len: usize },

    /// A payload or factory call that does not describe a valid operation
    #[error("Malformed operation: {0}")]
    MalformedOperation(String),

    /// Local edit refused because the pending log is full
    #[error("Pending log is at its limit of {limit} unconfirmed operations")]
    Backpressure { limit: usize },

    /// Wire text that is not valid JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SyncError {
    /// Whether the only way forward is a full resynchronization
    pub fn requires_resync(&self) -> bool {
        matches!(
            self,
            SyncError::ProtocolViolation { .. } | SyncError::Desync { .. }
        )
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SyncError>;
