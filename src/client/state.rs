//! Client state
//!
//! The explicit, single-writer state object behind a client view: the
//! record collection, the loaded definition, the current selection, and
//! modal flags. Owned by the UI event loop; no ambient global, no
//! locking. All mutation goes through the typed operations here.
//!
//! Merges are idempotent by id and replace unconditionally, because a
//! change notification always carries a fully materialized record and
//! ordering across a query result and a concurrent notification is not
//! guaranteed.

use std::collections::HashMap;

use serde_json::Value;

use crate::definition::ModuleDefinition;
use crate::store::Record;

/// State behind one module's view
#[derive(Debug)]
pub struct ClientState {
    module: String,
    definition: Option<ModuleDefinition>,
    records: Vec<Record>,
    current: Option<Record>,
    modals: HashMap<String, bool>,
    generation: u64,
}

impl ClientState {
    /// Fresh state for a module
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            definition: None,
            records: Vec::new(),
            current: None,
            modals: HashMap::new(),
            generation: 0,
        }
    }

    /// The module this state belongs to
    pub fn module(&self) -> &str {
        &self.module
    }

    /// The loaded definition, if any
    pub fn definition(&self) -> Option<&ModuleDefinition> {
        self.definition.as_ref()
    }

    /// Installs the definition (loaded once per session)
    pub fn set_definition(&mut self, definition: ModuleDefinition) {
        self.definition = Some(definition);
    }

    /// The record collection in display order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Replaces the whole collection from a query result
    pub fn replace_records(&mut self, records: Vec<Record>) {
        self.records = records;
        // the selection tracks the collection
        if let Some(current) = &self.current {
            let id = current.id().to_string();
            self.current = self.records.iter().find(|r| r.id() == id).cloned();
        }
    }

    /// Merges one record: replace in place by id, or prepend when new.
    /// Also refreshes the current selection when ids match.
    pub fn apply_update(&mut self, record: Record) {
        if let Some(existing) = self.records.iter_mut().find(|r| r.id() == record.id()) {
            *existing = record.clone();
        } else {
            self.records.insert(0, record.clone());
        }
        if self
            .current
            .as_ref()
            .is_some_and(|current| current.id() == record.id())
        {
            self.current = Some(record);
        }
    }

    /// Selects the record with `id` for the detail view
    pub fn show_detail(&mut self, id: &str) -> bool {
        match self.records.iter().find(|r| r.id() == id) {
            Some(record) => {
                self.current = Some(record.clone());
                true
            }
            None => false,
        }
    }

    /// The current selection, if any
    pub fn current(&self) -> Option<&Record> {
        self.current.as_ref()
    }

    /// Clears the selection (the empty view)
    pub fn show_empty(&mut self) {
        self.current = None;
    }

    /// Opens or closes a named overlay
    pub fn set_modal(&mut self, name: &str, open: bool) {
        self.modals.insert(name.to_string(), open);
    }

    /// Whether a named overlay is open
    pub fn is_modal_open(&self, name: &str) -> bool {
        self.modals.get(name).copied().unwrap_or(false)
    }

    /// The generation used to discard stale replies
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Bumps the generation; call when the view navigates away so a
    /// late reply for the old view is ignored rather than applied
    pub fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Applies a query result only if the state has not moved on since
    /// the request was issued; returns whether it was applied
    pub fn apply_records_if_current(&mut self, issued_at: u64, records: Vec<Record>) -> bool {
        if issued_at != self.generation {
            return false;
        }
        self.replace_records(records);
        true
    }

    /// The state as a JSON value, the root `$bind` paths resolve
    /// against: the collection under the module name, the selection
    /// under `current`
    pub fn to_value(&self) -> Value {
        let mut root = serde_json::Map::new();
        root.insert(
            self.module.clone(),
            Value::Array(self.records.iter().map(Record::to_value).collect()),
        );
        root.insert(
            "current".to_string(),
            self.current
                .as_ref()
                .map(Record::to_value)
                .unwrap_or(Value::Null),
        );
        Value::Object(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, status: &str) -> Record {
        Record::from_value(json!({"id": id, "status": status})).unwrap()
    }

    #[test]
    fn apply_update_replaces_in_place_by_id() {
        let mut state = ClientState::new("incidents");
        state.replace_records(vec![record("A", "open"), record("B", "open")]);

        state.apply_update(record("B", "resolved"));
        assert_eq!(state.records().len(), 2);
        assert_eq!(state.records()[1].get("status"), Some(&json!("resolved")));
    }

    #[test]
    fn apply_update_prepends_new_records() {
        let mut state = ClientState::new("incidents");
        state.replace_records(vec![record("A", "open")]);
        state.apply_update(record("C", "open"));
        assert_eq!(state.records()[0].id(), "C");
        assert_eq!(state.records().len(), 2);
    }

    #[test]
    fn apply_update_is_idempotent() {
        let mut state = ClientState::new("incidents");
        state.apply_update(record("A", "resolved"));
        state.apply_update(record("A", "resolved"));
        assert_eq!(state.records().len(), 1);
    }

    #[test]
    fn selection_follows_updates() {
        let mut state = ClientState::new("incidents");
        state.replace_records(vec![record("A", "open")]);
        assert!(state.show_detail("A"));

        state.apply_update(record("A", "acknowledged"));
        assert_eq!(
            state.current().unwrap().get("status"),
            Some(&json!("acknowledged"))
        );

        state.show_empty();
        assert!(state.current().is_none());
    }

    #[test]
    fn show_detail_unknown_id_is_a_no_op() {
        let mut state = ClientState::new("incidents");
        assert!(!state.show_detail("missing"));
        assert!(state.current().is_none());
    }

    #[test]
    fn stale_replies_are_discarded() {
        let mut state = ClientState::new("incidents");
        let issued_at = state.generation();
        // the user navigates away before the reply arrives
        state.bump_generation();

        let applied = state.apply_records_if_current(issued_at, vec![record("A", "open")]);
        assert!(!applied);
        assert!(state.records().is_empty());

        // a reply for the current generation applies
        let applied = state.apply_records_if_current(state.generation(), vec![record("A", "open")]);
        assert!(applied);
        assert_eq!(state.records().len(), 1);
    }

    #[test]
    fn modal_flags() {
        let mut state = ClientState::new("incidents");
        assert!(!state.is_modal_open("edit"));
        state.set_modal("edit", true);
        assert!(state.is_modal_open("edit"));
        state.set_modal("edit", false);
        assert!(!state.is_modal_open("edit"));
    }

    #[test]
    fn state_value_exposes_collection_and_selection() {
        let mut state = ClientState::new("incidents");
        state.replace_records(vec![record("A", "open")]);
        state.show_detail("A");

        let value = state.to_value();
        assert_eq!(value["incidents"][0]["id"], "A");
        assert_eq!(value["current"]["id"], "A");
    }
}
