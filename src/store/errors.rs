//! Storage errors

use thiserror::Error;

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// No record under `(module, id)`
    #[error("record not found: {module}/{id}")]
    NotFound { module: String, id: String },

    /// A record value without a usable string `id`
    #[error("record has no string 'id' field")]
    MissingId,

    /// An update tried to change the record's id
    #[error("record id is immutable (is '{existing}', update carries '{attempted}')")]
    ImmutableId { existing: String, attempted: String },

    /// Bucket or key name the store refuses to use
    #[error("invalid store key '{key}': {reason}")]
    InvalidKey { key: String, reason: &'static str },

    /// Stored value that no longer parses as JSON
    #[error("corrupt entry {bucket}/{key}: {message}")]
    Corrupt {
        bucket: String,
        key: String,
        message: String,
    },

    /// Filesystem failure
    #[error("io failure at {path}: {message}")]
    Io { path: String, message: String },

    /// Poisoned interior lock; treated as an unrecoverable store fault
    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    /// Record lookup miss for `(module, id)`
    pub fn not_found(module: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            module: module.into(),
            id: id.into(),
        }
    }

    /// Filesystem failure at `path`
    pub fn io(path: impl Into<String>, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
