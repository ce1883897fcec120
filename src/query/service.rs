//! Query service
//!
//! Stateless read façade over the record store and definition registry,
//! answering `data.get.<module>` and `definitions.get.<module>`.
//!
//! The two unknown-module behaviors differ on purpose: a data query for
//! an unknown module is an empty sequence, while a definitions query is
//! an explicit error payload. The asymmetry is inherited behavior and
//! covered by tests; do not unify it.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::definition::DefinitionRegistry;
use crate::observability::{Logger, MetricsRegistry};
use crate::store::RecordStore;

/// Read-only request handling for data and definitions
pub struct QueryService {
    store: RecordStore,
    registry: Arc<DefinitionRegistry>,
    metrics: Arc<MetricsRegistry>,
}

impl QueryService {
    /// Creates a service over its collaborators
    pub fn new(
        store: RecordStore,
        registry: Arc<DefinitionRegistry>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            store,
            registry,
            metrics,
        }
    }

    /// All current records of a module as a JSON array. Unknown module
    /// or storage failure both degrade to an empty array; a data query
    /// never returns an error payload.
    pub fn data(&self, module: &str) -> Value {
        self.metrics.increment_queries_served();
        match self.store.list_all(module) {
            Ok(records) => Value::Array(records.iter().map(|r| r.to_value()).collect()),
            Err(e) => {
                Logger::error("query.data_failed", &[("module", module), ("error", &e.to_string())]);
                Value::Array(Vec::new())
            }
        }
    }

    /// The definition for a module, or `{"error": "Definition not
    /// found: <module>"}` when none is registered.
    pub fn definition(&self, module: &str) -> Value {
        self.metrics.increment_definition_requests();
        match self.registry.get(module) {
            Some(definition) => serde_json::to_value(definition).unwrap_or_else(|e| {
                Logger::error(
                    "query.definition_unserializable",
                    &[("module", module), ("error", &e.to_string())],
                );
                error_payload(module)
            }),
            None => error_payload(module),
        }
    }
}

fn error_payload(module: &str) -> Value {
    json!({"error": format!("Definition not found: {}", module)})
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::parse_module;
    use crate::store::{MemoryKeyedStore, Record, RecordStore};
    use serde_json::json;

    fn minimal_definition() -> Value {
        json!({
            "layout": "splitscreen",
            "views": {
                "list": {"tag": "view", "name": "list", "children": []},
                "detail": {"tag": "view", "name": "detail", "children": []},
                "empty": {"tag": "view", "name": "empty", "children": []}
            }
        })
    }

    fn service() -> QueryService {
        let store = RecordStore::new(Arc::new(MemoryKeyedStore::new()));
        store
            .put(
                "incidents",
                &Record::from_value(json!({"id": "INC-001", "status": "open"})).unwrap(),
            )
            .unwrap();

        let mut registry = DefinitionRegistry::new();
        registry.register("incidents", parse_module(&minimal_definition()).unwrap());

        QueryService::new(store, Arc::new(registry), Arc::new(MetricsRegistry::new()))
    }

    #[test]
    fn data_returns_all_records() {
        let service = service();
        let data = service.data("incidents");
        let records = data.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["id"], "INC-001");
    }

    #[test]
    fn unknown_module_data_is_an_empty_array() {
        let service = service();
        assert_eq!(service.data("bogus"), json!([]));
    }

    #[test]
    fn definition_round_trips_through_the_registry() {
        let service = service();
        let definition = service.definition("incidents");
        assert_eq!(definition["layout"], "splitscreen");
        assert!(definition.get("error").is_none());
    }

    #[test]
    fn unknown_module_definition_is_an_error_payload() {
        // Deliberately asymmetric with the data query above.
        let service = service();
        assert_eq!(
            service.definition("bogus"),
            json!({"error": "Definition not found: bogus"})
        );
    }
}
