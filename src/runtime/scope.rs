//! Resolution scope
//!
//! A scope bundles the two read-only roots a binding can resolve
//! against: mutable application state and the current record in view
//! scope (if any). Scopes are threaded down the render walk and never
//! mutated by children; narrowing to a row record produces a new scope.

use serde_json::Value;

/// The two resolution roots for one evaluation
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    state: &'a Value,
    record: Option<&'a Value>,
}

impl<'a> Scope<'a> {
    /// A scope with application state only
    pub fn of_state(state: &'a Value) -> Self {
        Self {
            state,
            record: None,
        }
    }

    /// A scope with both state and a current record
    pub fn with_record(state: &'a Value, record: &'a Value) -> Self {
        Self {
            state,
            record: Some(record),
        }
    }

    /// The application-state root
    pub fn state(&self) -> &'a Value {
        self.state
    }

    /// The current-record root, if any
    pub fn record(&self) -> Option<&'a Value> {
        self.record
    }

    /// The same state root with a different current record
    pub fn narrowed(&self, record: &'a Value) -> Self {
        Self {
            state: self.state,
            record: Some(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn narrowing_replaces_only_the_record() {
        let state = json!({"incidents": []});
        let row = json!({"id": "INC-001"});
        let outer = Scope::of_state(&state);
        assert!(outer.record().is_none());

        let inner = outer.narrowed(&row);
        assert_eq!(inner.record(), Some(&row));
        assert_eq!(inner.state(), &state);
        // the outer scope is unchanged
        assert!(outer.record().is_none());
    }
}
