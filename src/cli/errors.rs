//! CLI errors

use thiserror::Error;

use crate::client::ClientError;
use crate::config::ConfigError;
use crate::definition::DefinitionError;
use crate::store::StoreError;
use crate::transport::TransportError;

/// Result type for CLI commands
pub type CliResult<T> = Result<T, CliError>;

/// Failures that end a CLI command
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("runtime failure: {0}")]
    Runtime(String),
}
