//! Condition evaluator
//!
//! Evaluates condition trees to booleans. The evaluator is total: a
//! type-mismatched comparison is `false` (or not-equal), never an
//! error, so a bad condition hides a button instead of breaking the
//! view. Rendering fails safe, not stops.

use serde_json::Value;

use crate::definition::{ComponentCommon, Condition, Operand};

use super::resolver::resolve_operand;
use super::scope::Scope;

/// Evaluate a condition tree against a scope
pub fn evaluate(condition: &Condition, scope: &Scope<'_>) -> bool {
    match condition {
        Condition::Eq(left, right) => values_equal(
            resolve_operand(left, scope),
            resolve_operand(right, scope),
        ),
        Condition::Neq(left, right) => !values_equal(
            resolve_operand(left, scope),
            resolve_operand(right, scope),
        ),
        Condition::Gt(left, right) => compare_numeric(left, right, scope, |a, b| a > b),
        Condition::Lt(left, right) => compare_numeric(left, right, scope, |a, b| a < b),
        Condition::And(children) => children.iter().all(|c| evaluate(c, scope)),
        Condition::Or(children) => children.iter().any(|c| evaluate(c, scope)),
        Condition::Not(child) => !evaluate(child, scope),
    }
}

/// Visibility of a component: absent `visibleWhen` means visible
pub fn is_visible(common: &ComponentCommon, scope: &Scope<'_>) -> bool {
    common
        .visible_when
        .as_ref()
        .map_or(true, |condition| evaluate(condition, scope))
}

/// Disabled state of a component: absent `disabledWhen` means enabled
pub fn is_disabled(common: &ComponentCommon, scope: &Scope<'_>) -> bool {
    common
        .disabled_when
        .as_ref()
        .is_some_and(|condition| evaluate(condition, scope))
}

/// Equality is defined for string↔string and number↔number pairs only.
/// Any other pairing, including a missing operand, is not-equal. There
/// is no coercion: `"3"` does not equal `3`.
fn values_equal(left: Option<Value>, right: Option<Value>) -> bool {
    match (left, right) {
        (Some(Value::String(a)), Some(Value::String(b))) => a == b,
        (Some(Value::Number(a)), Some(Value::Number(b))) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        _ => false,
    }
}

fn compare_numeric(
    left: &Operand,
    right: &Operand,
    scope: &Scope<'_>,
    cmp: fn(f64, f64) -> bool,
) -> bool {
    let left = resolve_operand(left, scope).as_ref().and_then(Value::as_f64);
    let right = resolve_operand(right, scope).as_ref().and_then(Value::as_f64);
    match (left, right) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}
