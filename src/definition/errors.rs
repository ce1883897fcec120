//! Definition errors
//!
//! Every variant names the dotted path of the offending node so a
//! malformed definition can be traced without re-reading the file.

use thiserror::Error;

/// Result type for definition parsing and loading
pub type DefinitionResult<T> = Result<T, DefinitionError>;

/// Errors produced while parsing or loading a module definition
#[derive(Debug, Clone, Error)]
pub enum DefinitionError {
    /// Component carries an unrecognized `tag` discriminator
    #[error("{path}: unknown component tag '{tag}'")]
    UnknownTag { path: String, tag: String },

    /// Action carries an unrecognized `action` discriminator
    #[error("{path}: unknown action '{action}'")]
    UnknownAction { path: String, action: String },

    /// Condition node is not one of eq/neq/gt/lt/and/or/not
    #[error("{path}: unknown condition '{condition}'")]
    UnknownCondition { path: String, condition: String },

    /// A required view key is absent from `views`
    #[error("{path}: missing required view '{view}'")]
    MissingView { path: String, view: String },

    /// `views` carries a key outside list/detail/empty
    #[error("{path}: unknown view '{view}'")]
    UnknownView { path: String, view: String },

    /// A view's `name` does not match its key in `views`
    #[error("{path}: view name '{found}' does not match its key '{expected}'")]
    ViewNameMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// Anything else: wrong JSON shape, bad binding path, missing field
    #[error("{path}: {message}")]
    Malformed { path: String, message: String },

    /// Definition file could not be read
    #[error("cannot read definition file {file}: {message}")]
    Unreadable { file: String, message: String },

    /// No definition exists for the requested module
    #[error("Definition not found: {module}")]
    NotFound { module: String },
}

impl DefinitionError {
    /// Unknown component tag at `path`
    pub fn unknown_tag(path: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::UnknownTag {
            path: path.into(),
            tag: tag.into(),
        }
    }

    /// Unknown action discriminator at `path`
    pub fn unknown_action(path: impl Into<String>, action: impl Into<String>) -> Self {
        Self::UnknownAction {
            path: path.into(),
            action: action.into(),
        }
    }

    /// Unknown condition connective or comparison at `path`
    pub fn unknown_condition(path: impl Into<String>, condition: impl Into<String>) -> Self {
        Self::UnknownCondition {
            path: path.into(),
            condition: condition.into(),
        }
    }

    /// Shape or content problem at `path`
    pub fn malformed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// No definition registered for `module`
    pub fn not_found(module: impl Into<String>) -> Self {
        Self::NotFound {
            module: module.into(),
        }
    }
}
