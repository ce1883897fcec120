//! Backend wiring
//!
//! Registers the request handlers on the transport and owns the
//! subsystems behind them. Per-request failures are folded into reply
//! payloads; nothing a client sends can take a handler down. Startup
//! failures (unreadable storage or definitions) are fatal and belong to
//! the caller.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::command::CommandProcessor;
use crate::definition::DefinitionRegistry;
use crate::notify::ChangeNotifier;
use crate::observability::{Logger, MetricsRegistry};
use crate::query::QueryService;
use crate::store::RecordStore;
use crate::transport::subject::topics;
use crate::transport::{subject, Transport, TransportResult};

/// The message-serving backend
pub struct Backend {
    bus: Arc<dyn Transport>,
    query: Arc<QueryService>,
    processor: Arc<CommandProcessor>,
}

impl Backend {
    /// Wires the subsystems together over a transport handle
    pub fn new(
        bus: Arc<dyn Transport>,
        store: RecordStore,
        registry: Arc<DefinitionRegistry>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        let notifier = ChangeNotifier::new(bus.clone(), metrics.clone());
        let processor = Arc::new(CommandProcessor::new(
            store.clone(),
            notifier,
            metrics.clone(),
        ));
        let query = Arc::new(QueryService::new(store, registry, metrics));
        Self {
            bus,
            query,
            processor,
        }
    }

    /// Registers all request handlers. Call once at startup.
    pub fn start(&self) -> TransportResult<()> {
        self.register_definitions()?;
        self.register_data()?;
        self.register_commands()?;
        Logger::info("backend.ready", &[]);
        Ok(())
    }

    fn register_definitions(&self) -> TransportResult<()> {
        let query = self.query.clone();
        self.bus.respond(
            topics::DEFINITIONS_PATTERN,
            Arc::new(move |subject_str, _payload| {
                let query = query.clone();
                Box::pin(async move {
                    match subject::token(&subject_str, 2) {
                        Some(module) => query.definition(module),
                        None => json!({"error": "malformed definitions subject"}),
                    }
                })
            }),
        )
    }

    fn register_data(&self) -> TransportResult<()> {
        let query = self.query.clone();
        self.bus.respond(
            topics::DATA_PATTERN,
            Arc::new(move |subject_str, _payload| {
                let query = query.clone();
                Box::pin(async move {
                    match subject::token(&subject_str, 2) {
                        Some(module) => query.data(module),
                        None => Value::Array(Vec::new()),
                    }
                })
            }),
        )
    }

    fn register_commands(&self) -> TransportResult<()> {
        let processor = self.processor.clone();
        self.bus.respond(
            topics::COMMANDS_PATTERN,
            Arc::new(move |subject_str, payload| {
                let processor = processor.clone();
                Box::pin(async move {
                    processor.handle(&subject_str, &payload).await.to_value()
                })
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::parse_module;
    use crate::server::seed;
    use crate::store::{MemoryKeyedStore, RecordStore};
    use crate::transport::MemoryBus;
    use serde_json::json;

    fn boot() -> (Arc<MemoryBus>, Backend) {
        let bus = Arc::new(MemoryBus::new());
        let store = RecordStore::new(Arc::new(MemoryKeyedStore::new()));
        seed::apply_seed(&store).unwrap();

        let mut registry = DefinitionRegistry::new();
        for (module, raw) in seed::builtin_definitions() {
            registry.register(module, parse_module(&raw).unwrap());
        }

        let backend = Backend::new(
            bus.clone(),
            store,
            Arc::new(registry),
            Arc::new(MetricsRegistry::new()),
        );
        backend.start().unwrap();
        (bus, backend)
    }

    #[tokio::test]
    async fn serves_definitions_and_misses() {
        let (bus, _backend) = boot();
        let definition = bus
            .request("definitions.get.incidents", Value::Null)
            .await
            .unwrap();
        assert_eq!(definition["layout"], "splitscreen");

        let miss = bus
            .request("definitions.get.bogus", Value::Null)
            .await
            .unwrap();
        assert_eq!(miss, json!({"error": "Definition not found: bogus"}));
    }

    #[tokio::test]
    async fn serves_data_and_empty_for_unknown_modules() {
        let (bus, _backend) = boot();
        let data = bus.request("data.get.incidents", Value::Null).await.unwrap();
        assert_eq!(data.as_array().unwrap().len(), 3);

        let empty = bus.request("data.get.bogus", Value::Null).await.unwrap();
        assert_eq!(empty, json!([]));
    }

    #[tokio::test]
    async fn routes_commands_and_rejects_unknown_ones() {
        let (bus, _backend) = boot();
        let reply = bus
            .request("commands.incidents.acknowledge", json!({"id": "INC-001"}))
            .await
            .unwrap();
        assert_eq!(reply["success"], true);

        let reply = bus
            .request("commands.incidents.escalate", json!({"id": "INC-001"}))
            .await
            .unwrap();
        assert_eq!(reply["success"], false);
    }
}
