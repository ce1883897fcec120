//! Client errors

use thiserror::Error;

use crate::definition::DefinitionError;
use crate::transport::TransportError;

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Client-side failures
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Request/subscribe failure; a timeout means "unknown", not "no"
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The fetched definition failed validation
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// The backend answered with an error payload
    #[error("{message}")]
    Rejected { message: String },

    /// A reply that did not have the expected shape
    #[error("malformed reply: {message}")]
    BadReply { message: String },
}

impl ClientError {
    /// Backend-provided rejection
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Structurally unusable reply
    pub fn bad_reply(message: impl Into<String>) -> Self {
        Self::BadReply {
            message: message.into(),
        }
    }
}
