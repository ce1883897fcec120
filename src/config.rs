//! Backend configuration
//!
//! One JSON file, deserialized at startup. Absent fields fall back to
//! defaults; an absent `data_dir` selects the in-memory store.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File missing or unreadable
    #[error("cannot read config {path}: {message}")]
    Unreadable { path: String, message: String },

    /// File content is not a valid config
    #[error("invalid config {path}: {message}")]
    Invalid { path: String, message: String },
}

/// Backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory for the file-backed store; in-memory when absent
    #[serde(default)]
    pub data_dir: Option<String>,

    /// Directory holding `<module>.json` definition files
    #[serde(default = "default_definitions_dir")]
    pub definitions_dir: String,

    /// Request deadline for transport operations
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Write seed records and definitions at startup
    #[serde(default = "default_seed")]
    pub seed: bool,
}

fn default_definitions_dir() -> String {
    "./definitions".to_string()
}

fn default_request_timeout_ms() -> u64 {
    5000
}

fn default_seed() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            definitions_dir: default_definitions_dir(),
            request_timeout_ms: default_request_timeout_ms(),
            seed: default_seed(),
        }
    }
}

impl Config {
    /// Loads a config file; a missing file yields the defaults so a
    /// bare `opsdeck demo` works without any setup
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Invalid {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}
