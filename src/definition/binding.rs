//! Binding expressions and validated paths
//!
//! A `Path` is a dot-delimited sequence of mapping-key traversals. Paths
//! are parsed and validated once, when the definition is loaded, so a
//! typo fails at load time instead of resolving to nothing at render
//! time.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// A rejected path literal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid path '{raw}': {reason}")]
pub struct PathError {
    /// The original literal
    pub raw: String,
    /// Why it was rejected
    pub reason: &'static str,
}

/// A validated dot-delimited key path, e.g. `filters.city`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Parse and validate a dotted path literal
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError {
                raw: raw.to_string(),
                reason: "path is empty",
            });
        }
        let mut segments = Vec::new();
        for segment in raw.split('.') {
            if segment.is_empty() {
                return Err(PathError {
                    raw: raw.to_string(),
                    reason: "path contains an empty segment",
                });
            }
            segments.push(segment.to_string());
        }
        Ok(Self { segments })
    }

    /// The traversal segments in order
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Traverse `root` one mapping key at a time.
    ///
    /// Returns `None` as soon as any segment is absent or the current
    /// node is not an object. Never fails.
    pub fn lookup<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        let mut current = root;
        for segment in &self.segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Path::parse(&raw).map_err(D::Error::custom)
    }
}

/// A reference into one of the two resolution scopes.
///
/// `{"$bind": path}` resolves against mutable application state;
/// `{"$ref": path}` resolves against the current record in view scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Binding {
    /// Resolve against application state
    #[serde(rename = "$bind")]
    State(Path),
    /// Resolve against the current record
    #[serde(rename = "$ref")]
    Record(Path),
}

impl Binding {
    /// The path independent of scope
    pub fn path(&self) -> &Path {
        match self {
            Binding::State(path) | Binding::Record(path) => path,
        }
    }
}

/// A value position that accepts either a literal or a binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Bindable {
    /// A binding expression resolved at render time
    Expr(Binding),
    /// A literal JSON value used as-is
    Literal(Value),
}

impl Bindable {
    /// Convenience constructor for a literal string
    pub fn literal(value: impl Into<Value>) -> Self {
        Bindable::Literal(value.into())
    }
}

/// True when a value has the single-key `{"$bind": ...}` / `{"$ref": ...}`
/// shape of a binding expression
pub fn is_expression_shape(value: &Value) -> bool {
    match value.as_object() {
        Some(obj) if obj.len() == 1 => obj.keys().any(|k| k == "$bind" || k == "$ref"),
        _ => false,
    }
}

// An object shaped like an expression must parse as one; a bad path in
// `{"$ref": "a..b"}` is a load-time error, not a silent literal.
impl<'de> Deserialize<'de> for Bindable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if is_expression_shape(&value) {
            let binding: Binding = serde_json::from_value(value).map_err(D::Error::custom)?;
            Ok(Bindable::Expr(binding))
        } else {
            Ok(Bindable::Literal(value))
        }
    }
}
