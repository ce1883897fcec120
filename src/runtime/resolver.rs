//! Binding resolver
//!
//! Pure resolution of binding expressions against a [`Scope`]. Missing
//! is a value here, not an error: any absent path segment yields `None`
//! and resolution never raises. Same scope + same expression always
//! yields the same result.
//!
//! `$ref` resolves against the record root only, `$bind` against the
//! state root only; there is no cross-scope fallback.

use serde_json::{Map, Value};

use crate::definition::binding::is_expression_shape;
use crate::definition::{Bindable, Binding, Operand, Path};

use super::scope::Scope;

/// Resolve a binding expression to its value, `None` when missing
pub fn resolve(binding: &Binding, scope: &Scope<'_>) -> Option<Value> {
    match binding {
        Binding::State(path) => path.lookup(scope.state()).cloned(),
        Binding::Record(path) => scope.record().and_then(|r| path.lookup(r)).cloned(),
    }
}

/// Resolve a literal-or-binding position; literals pass through as-is
pub fn resolve_bindable(bindable: &Bindable, scope: &Scope<'_>) -> Option<Value> {
    match bindable {
        Bindable::Expr(binding) => resolve(binding, scope),
        Bindable::Literal(value) => Some(value.clone()),
    }
}

/// Resolve a condition operand
pub fn resolve_operand(operand: &Operand, scope: &Scope<'_>) -> Option<Value> {
    match operand {
        Operand::Expr(binding) => resolve(binding, scope),
        Operand::Literal(value) => Some(value.clone()),
    }
}

/// Resolve a plain data-source path against application state
pub fn resolve_state_path(path: &Path, scope: &Scope<'_>) -> Option<Value> {
    path.lookup(scope.state()).cloned()
}

/// Deep-replace embedded binding expressions in an action payload.
///
/// Any object of the shape `{"$bind": path}` / `{"$ref": path}` becomes
/// its resolved value; an unresolvable expression becomes JSON null so
/// the backend sees an explicit absent value rather than a dangling
/// expression object.
pub fn interpolate(payload: &Value, scope: &Scope<'_>) -> Value {
    if is_expression_shape(payload) {
        if let Ok(binding) = serde_json::from_value::<Binding>(payload.clone()) {
            return resolve(&binding, scope).unwrap_or(Value::Null);
        }
        // expression-shaped but unparsable (bad path survives only in
        // hand-built payloads); fall through as a literal
    }
    match payload {
        Value::Object(fields) => {
            let mut out = Map::with_capacity(fields.len());
            for (key, value) in fields {
                out.insert(key.clone(), interpolate(value, scope));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(|v| interpolate(v, scope)).collect()),
        other => other.clone(),
    }
}
