//! Command processor
//!
//! One state machine per command:
//! `received → validated → applied → persisted → notified`, or
//! `received → rejected`. All-or-nothing: a rejected command persists
//! nothing and notifies nobody.
//!
//! There is no revision compare against the store. Two racing commands
//! on the same id are a read-modify-write race: the last writer's value
//! wins and both notifications are published.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::notify::ChangeNotifier;
use crate::observability::{Logger, MetricsRegistry};
use crate::store::{Record, RecordStore};
use crate::transport::subject;

use super::errors::{CommandError, CommandResult};
use super::types::{AcknowledgePayload, CommandReply, CommandVerb, UpdatePayload};

/// Status value written by the acknowledge command
pub const STATUS_ACKNOWLEDGED: &str = "acknowledged";

/// Validates and applies keyed commands against the record store
pub struct CommandProcessor {
    store: RecordStore,
    notifier: ChangeNotifier,
    metrics: Arc<MetricsRegistry>,
}

impl CommandProcessor {
    /// Creates a processor over its collaborators
    pub fn new(store: RecordStore, notifier: ChangeNotifier, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            store,
            notifier,
            metrics,
        }
    }

    /// Handles one command request end to end, folding every failure
    /// into the reply. This never panics and never returns an error;
    /// the handler loop must survive anything a client sends.
    pub async fn handle(&self, subject_str: &str, payload: &Value) -> CommandReply {
        match self.process(subject_str, payload) {
            Ok(record) => {
                self.metrics.increment_commands_applied();
                Logger::info(
                    "command.applied",
                    &[("subject", subject_str), ("id", record.id())],
                );
                CommandReply::ok()
            }
            Err(e) => {
                self.metrics.increment_commands_rejected();
                Logger::warn(
                    "command.rejected",
                    &[("subject", subject_str), ("error", &e.to_string())],
                );
                CommandReply::fail(e.to_string())
            }
        }
    }

    /// The pipeline proper; the returned record is the persisted state
    fn process(&self, subject_str: &str, payload: &Value) -> CommandResult<Record> {
        let module = subject::token(subject_str, 1);
        let verb = subject::token(subject_str, 2);
        let (module, verb) = match (module, verb) {
            (Some(module), Some(verb))
                if subject::token(subject_str, 0) == Some("commands")
                    && subject::token(subject_str, 3).is_none() =>
            {
                (module, verb)
            }
            _ => return Err(CommandError::unknown(subject_str)),
        };
        let verb = CommandVerb::parse(verb).ok_or_else(|| CommandError::unknown(subject_str))?;

        match verb {
            CommandVerb::Acknowledge => self.acknowledge(module, payload),
            CommandVerb::Update => self.update(module, payload),
        }
    }

    /// Fixed transition `open|any → acknowledged`. Acknowledging an
    /// already-acknowledged record still succeeds, still stamps
    /// `updatedAt`, still notifies; there is no short-circuit.
    fn acknowledge(&self, module: &str, payload: &Value) -> CommandResult<Record> {
        let payload: AcknowledgePayload = parse_payload(payload)?;
        let mut record = self.store.get(module, &payload.id)?;

        record.set("status", Value::String(STATUS_ACKNOWLEDGED.to_string()));
        record.stamp_updated_at(Utc::now());

        self.store.put(module, &record)?;
        self.notifier.publish(module, &record);
        Ok(record)
    }

    /// Shallow merge of the update payload onto the current record
    fn update(&self, module: &str, payload: &Value) -> CommandResult<Record> {
        let payload: UpdatePayload = parse_payload(payload)?;
        let mut record = self.store.get(module, &payload.id)?;

        record.merge(&payload.updates)?;
        record.stamp_updated_at(Utc::now());

        self.store.put(module, &record)?;
        self.notifier.publish(module, &record);
        Ok(record)
    }
}

fn parse_payload<T: serde::de::DeserializeOwned>(payload: &Value) -> CommandResult<T> {
    serde_json::from_value(payload.clone()).map_err(|e| CommandError::malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryKeyedStore, RecordStore};
    use crate::transport::{MemoryBus, Transport};
    use serde_json::json;

    struct Fixture {
        bus: Arc<MemoryBus>,
        store: RecordStore,
        processor: CommandProcessor,
    }

    fn fixture() -> Fixture {
        let bus = Arc::new(MemoryBus::new());
        let store = RecordStore::new(Arc::new(MemoryKeyedStore::new()));
        let metrics = Arc::new(MetricsRegistry::new());
        let notifier = ChangeNotifier::new(bus.clone(), metrics.clone());
        let processor = CommandProcessor::new(store.clone(), notifier, metrics);
        Fixture {
            bus,
            store,
            processor,
        }
    }

    fn seed(store: &RecordStore, value: Value) {
        store
            .put("incidents", &Record::from_value(value).unwrap())
            .unwrap();
    }

    #[tokio::test]
    async fn acknowledge_sets_status_and_notifies() {
        let f = fixture();
        seed(&f.store, json!({"id": "INC-001", "status": "open", "city": "New York"}));
        let mut sub = f.bus.subscribe("incidents.updated").unwrap();

        let reply = f
            .processor
            .handle("commands.incidents.acknowledge", &json!({"id": "INC-001"}))
            .await;
        assert_eq!(reply, CommandReply::ok());

        let stored = f.store.get("incidents", "INC-001").unwrap();
        assert_eq!(stored.get("status"), Some(&json!("acknowledged")));
        assert!(stored.updated_at().is_some());
        // untouched fields survive
        assert_eq!(stored.get("city"), Some(&json!("New York")));

        let notified = sub.recv().await.unwrap();
        assert_eq!(notified.payload["status"], "acknowledged");
    }

    #[tokio::test]
    async fn acknowledge_is_idempotent_without_short_circuit() {
        let f = fixture();
        seed(&f.store, json!({"id": "INC-002", "status": "acknowledged"}));
        let mut sub = f.bus.subscribe("incidents.updated").unwrap();

        let reply = f
            .processor
            .handle("commands.incidents.acknowledge", &json!({"id": "INC-002"}))
            .await;
        assert_eq!(reply, CommandReply::ok());

        // still stamped, still notified
        let stored = f.store.get("incidents", "INC-002").unwrap();
        assert!(stored.updated_at().is_some());
        assert!(sub.recv().await.is_some());
    }

    #[tokio::test]
    async fn update_merges_shallowly() {
        let f = fixture();
        seed(&f.store, json!({"id": "X-1", "status": "open", "city": "A"}));

        let reply = f
            .processor
            .handle(
                "commands.incidents.update",
                &json!({"id": "X-1", "updates": {"status": "resolved"}}),
            )
            .await;
        assert_eq!(reply, CommandReply::ok());

        let stored = f.store.get("incidents", "X-1").unwrap();
        assert_eq!(stored.get("status"), Some(&json!("resolved")));
        assert_eq!(stored.get("city"), Some(&json!("A")));
        assert!(stored.updated_at().is_some());
    }

    #[tokio::test]
    async fn unknown_id_is_rejected_without_side_effects() {
        let f = fixture();
        let mut sub = f.bus.subscribe("incidents.updated").unwrap();

        let reply = f
            .processor
            .handle("commands.incidents.acknowledge", &json!({"id": "INC-404"}))
            .await;
        assert!(!reply.success);
        assert!(reply.error.unwrap().contains("INC-404"));
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test]
    async fn malformed_payload_is_rejected_without_side_effects() {
        let f = fixture();
        seed(&f.store, json!({"id": "INC-001", "status": "open"}));
        let mut sub = f.bus.subscribe("incidents.updated").unwrap();

        let reply = f
            .processor
            .handle("commands.incidents.update", &json!({"no_id": true}))
            .await;
        assert!(!reply.success);

        // id change attempt is malformed, and nothing was persisted
        let reply = f
            .processor
            .handle(
                "commands.incidents.update",
                &json!({"id": "INC-001", "updates": {"id": "INC-999"}}),
            )
            .await;
        assert!(!reply.success);
        assert!(f.store.get("incidents", "INC-999").is_err());
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test]
    async fn unknown_verb_and_subject_shape_are_rejected() {
        let f = fixture();
        let reply = f
            .processor
            .handle("commands.incidents.escalate", &json!({"id": "INC-001"}))
            .await;
        assert!(!reply.success);
        assert!(reply.error.unwrap().starts_with("Unknown command"));

        let reply = f.processor.handle("commands.incidents", &json!({})).await;
        assert!(!reply.success);

        let reply = f
            .processor
            .handle("commands.incidents.update.extra", &json!({}))
            .await;
        assert!(!reply.success);
    }
}
