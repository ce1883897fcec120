//! Condition trees
//!
//! A small boolean expression language over binary comparisons, used by
//! `visibleWhen` / `disabledWhen`. The evaluation semantics live in
//! [`crate::runtime::evaluator`]; this module only defines the shape.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::binding::{is_expression_shape, Binding};

/// One comparison operand: a literal or a binding expression
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Operand {
    /// Resolved through the binding resolver at evaluation time
    Expr(Binding),
    /// A literal JSON value
    Literal(Value),
}

// Same rule as `Bindable`: an expression-shaped object must parse as an
// expression, so a bad path fails at load time.
impl<'de> Deserialize<'de> for Operand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if is_expression_shape(&value) {
            let binding: Binding = serde_json::from_value(value).map_err(D::Error::custom)?;
            Ok(Operand::Expr(binding))
        } else {
            Ok(Operand::Literal(value))
        }
    }
}

/// A boolean expression tree.
///
/// Comparisons (`eq`, `neq`, `gt`, `lt`) are leaves; `and`, `or`, `not`
/// combine subtrees. Serialized form is externally tagged:
/// `{"eq": [a, b]}`, `{"and": [...]}`, `{"not": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// Value equality (string/number only, no coercion)
    Eq(Operand, Operand),
    /// Negated value equality
    Neq(Operand, Operand),
    /// Numeric greater-than
    Gt(Operand, Operand),
    /// Numeric less-than
    Lt(Operand, Operand),
    /// All children true (vacuously true when empty)
    And(Vec<Condition>),
    /// Any child true (vacuously false when empty)
    Or(Vec<Condition>),
    /// Negation of a single child
    Not(Box<Condition>),
}

/// The set of recognized condition keys, used by the validator to
/// distinguish "unknown condition" from a shape error.
pub const CONDITION_KEYS: &[&str] = &["eq", "neq", "gt", "lt", "and", "or", "not"];
