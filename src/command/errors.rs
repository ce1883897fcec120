//! Command errors
//!
//! Every variant folds into a `{success:false, error}` reply; none of
//! them escapes the handler loop.

use thiserror::Error;

use crate::store::StoreError;

/// Result type for command processing
pub type CommandResult<T> = Result<T, CommandError>;

/// Command pipeline errors
#[derive(Debug, Clone, Error)]
pub enum CommandError {
    /// Subject did not name a known `commands.<module>.<verb>`
    #[error("Unknown command: {subject}")]
    UnknownCommand { subject: String },

    /// Command targets a nonexistent record
    #[error("{module} not found: {id}")]
    RecordNotFound { module: String, id: String },

    /// Payload failed to parse or violated a field rule
    #[error("malformed command payload: {message}")]
    Malformed { message: String },

    /// Storage failure while applying or persisting
    #[error("storage failure: {0}")]
    Storage(StoreError),
}

impl CommandError {
    /// Unrecognized command subject
    pub fn unknown(subject: impl Into<String>) -> Self {
        Self::UnknownCommand {
            subject: subject.into(),
        }
    }

    /// Malformed payload
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { module, id } => Self::RecordNotFound { module, id },
            StoreError::ImmutableId { .. } => Self::Malformed {
                message: err.to_string(),
            },
            other => Self::Storage(other),
        }
    }
}
