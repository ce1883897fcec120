//! Transport errors

use thiserror::Error;

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Transport errors
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// No handler registered for a requested subject
    #[error("no responder for subject '{subject}'")]
    NoResponder { subject: String },

    /// The request deadline elapsed. Callers must treat this as
    /// "unknown, retry or show stale data", never as a negative result.
    #[error("request on '{subject}' timed out after {timeout_ms}ms")]
    Timeout { subject: String, timeout_ms: u64 },

    /// Subject or pattern the transport refuses to use
    #[error("invalid subject '{subject}': {reason}")]
    InvalidSubject {
        subject: String,
        reason: &'static str,
    },

    /// The bus side of a channel is gone
    #[error("transport closed")]
    Closed,
}
