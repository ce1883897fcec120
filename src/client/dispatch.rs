//! Action dispatcher
//!
//! Maps an [`Action`] to one effect on the collaborators: a route
//! change, a command over the transport, a modal flag, or a selection
//! change. A failed publish surfaces as a non-fatal notice; the view
//! keeps running.
//!
//! The dispatcher does not enforce request backpressure. At-most-one
//! in-flight publish per user click is the caller's duty: disable the
//! triggering control until the reply or timeout arrives, or duplicate
//! commands will be sent.

use std::sync::Arc;

use serde_json::Value;

use crate::command::CommandReply;
use crate::definition::{Action, Bindable};
use crate::runtime::{interpolate, resolve_bindable, Scope};
use crate::transport::Transport;

use super::state::ClientState;

/// Router collaborator: client-local view routing is out of scope here
/// except that an action must be able to trigger it
pub trait Router {
    /// Requests a route change
    fn navigate(&mut self, route: &str);
}

/// Router that records requested routes; used by tests and the demo
#[derive(Debug, Default)]
pub struct RecordingRouter {
    /// Routes in request order
    pub routes: Vec<String>,
}

impl Router for RecordingRouter {
    fn navigate(&mut self, route: &str) {
        self.routes.push(route.to_string());
    }
}

/// What a dispatch came to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The action (and any chained action) ran to completion
    Completed,
    /// A non-fatal problem for the UI layer to surface
    Notice(String),
}

/// Dispatches actions against the state, transport, and router
pub struct ActionDispatcher<'a> {
    bus: Arc<dyn Transport>,
    state: &'a mut ClientState,
    router: &'a mut dyn Router,
}

impl<'a> ActionDispatcher<'a> {
    /// Borrows the collaborators for one dispatch
    pub fn new(
        bus: Arc<dyn Transport>,
        state: &'a mut ClientState,
        router: &'a mut dyn Router,
    ) -> Self {
        Self { bus, state, router }
    }

    /// Runs one action, following `then` chains iteratively. `record`
    /// is the record scope of the triggering component (a table row or
    /// the current detail record).
    pub async fn dispatch(&mut self, action: &Action, record: Option<&Value>) -> DispatchOutcome {
        let mut next = Some(action.clone());

        while let Some(action) = next.take() {
            match action {
                Action::Navigate { to } => self.router.navigate(&to),
                Action::Modal { modal, close } => self.state.set_modal(&modal, !close),
                Action::ShowEmpty => self.state.show_empty(),
                Action::ShowDetail { id } => {
                    let Some(id) = self.resolve_id(&id, record) else {
                        return DispatchOutcome::Notice("unresolved id expression".into());
                    };
                    if !self.state.show_detail(&id) {
                        return DispatchOutcome::Notice(format!("no record '{}'", id));
                    }
                }
                Action::Publish {
                    topic,
                    payload,
                    then,
                } => {
                    let resolved = {
                        let state_value = self.state.to_value();
                        let scope = scope_for(&state_value, record);
                        interpolate(&payload, &scope)
                    };
                    match self.bus.request(&topic, resolved).await {
                        Ok(reply) => {
                            let reply: CommandReply = match serde_json::from_value(reply) {
                                Ok(reply) => reply,
                                Err(e) => {
                                    return DispatchOutcome::Notice(format!(
                                        "malformed reply on '{}': {}",
                                        topic, e
                                    ))
                                }
                            };
                            if !reply.success {
                                return DispatchOutcome::Notice(
                                    reply.error.unwrap_or_else(|| "command failed".into()),
                                );
                            }
                            next = then.map(|boxed| *boxed);
                        }
                        Err(e) => return DispatchOutcome::Notice(e.to_string()),
                    }
                }
            }
        }

        DispatchOutcome::Completed
    }

    fn resolve_id(&self, id: &Bindable, record: Option<&Value>) -> Option<String> {
        let state_value = self.state.to_value();
        let scope = scope_for(&state_value, record);
        resolve_bindable(id, &scope)
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

fn scope_for<'v>(state: &'v Value, record: Option<&'v Value>) -> Scope<'v> {
    match record {
        Some(record) => Scope::with_record(state, record),
        None => Scope::of_state(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{parse_module, DefinitionRegistry};
    use crate::observability::MetricsRegistry;
    use crate::server::{seed, Backend};
    use crate::store::{MemoryKeyedStore, Record, RecordStore};
    use crate::transport::MemoryBus;
    use serde_json::json;

    fn boot() -> Arc<MemoryBus> {
        let bus = Arc::new(MemoryBus::new());
        let store = RecordStore::new(Arc::new(MemoryKeyedStore::new()));
        seed::apply_seed(&store).unwrap();
        let mut registry = DefinitionRegistry::new();
        for (module, raw) in seed::builtin_definitions() {
            registry.register(module, parse_module(&raw).unwrap());
        }
        Backend::new(
            bus.clone(),
            store,
            Arc::new(registry),
            Arc::new(MetricsRegistry::new()),
        )
        .start()
        .unwrap();
        bus
    }

    fn loaded_state(bus: &Arc<MemoryBus>) -> ClientState {
        let mut state = ClientState::new("incidents");
        let _ = bus; // records come from the seed fixture directly
        state.replace_records(
            seed::seed_records()
                .into_iter()
                .find(|(module, _)| *module == "incidents")
                .map(|(_, values)| {
                    values
                        .into_iter()
                        .map(|v| Record::from_value(v).unwrap())
                        .collect()
                })
                .unwrap_or_default(),
        );
        state
    }

    #[tokio::test]
    async fn navigate_reaches_the_router() {
        let bus = boot();
        let mut state = ClientState::new("incidents");
        let mut router = RecordingRouter::default();
        let mut dispatcher = ActionDispatcher::new(bus, &mut state, &mut router);

        let outcome = dispatcher
            .dispatch(
                &Action::Navigate {
                    to: "/instructions".into(),
                },
                None,
            )
            .await;
        assert_eq!(outcome, DispatchOutcome::Completed);
        assert_eq!(router.routes, vec!["/instructions"]);
    }

    #[tokio::test]
    async fn modal_toggles_local_state() {
        let bus = boot();
        let mut state = ClientState::new("incidents");
        let mut router = RecordingRouter::default();
        let mut dispatcher = ActionDispatcher::new(bus, &mut state, &mut router);

        dispatcher
            .dispatch(
                &Action::Modal {
                    modal: "edit".into(),
                    close: false,
                },
                None,
            )
            .await;
        assert!(state.is_modal_open("edit"));

        let mut dispatcher = ActionDispatcher::new(boot(), &mut state, &mut router);
        dispatcher
            .dispatch(
                &Action::Modal {
                    modal: "edit".into(),
                    close: true,
                },
                None,
            )
            .await;
        assert!(!state.is_modal_open("edit"));
    }

    #[tokio::test]
    async fn show_detail_resolves_the_row_id() {
        let bus = boot();
        let mut state = loaded_state(&bus);
        let mut router = RecordingRouter::default();
        let mut dispatcher = ActionDispatcher::new(bus, &mut state, &mut router);

        let row = json!({"id": "INC-002"});
        let action: Action =
            serde_json::from_value(json!({"action": "showDetail", "id": {"$ref": "id"}})).unwrap();
        let outcome = dispatcher.dispatch(&action, Some(&row)).await;
        assert_eq!(outcome, DispatchOutcome::Completed);
        assert_eq!(state.current().unwrap().id(), "INC-002");
    }

    #[tokio::test]
    async fn show_detail_with_unknown_id_is_a_notice() {
        let bus = boot();
        let mut state = loaded_state(&bus);
        let mut router = RecordingRouter::default();
        let mut dispatcher = ActionDispatcher::new(bus, &mut state, &mut router);

        let row = json!({"id": "INC-999"});
        let action: Action =
            serde_json::from_value(json!({"action": "showDetail", "id": {"$ref": "id"}})).unwrap();
        let outcome = dispatcher.dispatch(&action, Some(&row)).await;
        assert!(matches!(outcome, DispatchOutcome::Notice(_)));
        assert!(state.current().is_none());
    }

    #[tokio::test]
    async fn publish_interpolates_payload_and_chains_then() {
        let bus = boot();
        let mut state = loaded_state(&bus);
        state.show_detail("INC-002");
        let mut router = RecordingRouter::default();

        let action: Action = serde_json::from_value(json!({
            "action": "publish",
            "topic": "commands.incidents.update",
            "payload": {"id": {"$ref": "id"}, "updates": {"status": "resolved"}},
            "then": {"action": "showEmpty"}
        }))
        .unwrap();

        let record = state.current().unwrap().to_value();
        let mut dispatcher = ActionDispatcher::new(bus.clone(), &mut state, &mut router);
        let outcome = dispatcher.dispatch(&action, Some(&record)).await;
        assert_eq!(outcome, DispatchOutcome::Completed);
        // the chained showEmpty ran
        assert!(state.current().is_none());

        // and the backend applied the command
        let data = bus.request("data.get.incidents", json!(null)).await.unwrap();
        let updated = data
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["id"] == "INC-002")
            .unwrap();
        assert_eq!(updated["status"], "resolved");
    }

    #[tokio::test]
    async fn failed_publish_is_a_notice_and_skips_then() {
        let bus = boot();
        let mut state = loaded_state(&bus);
        state.show_detail("INC-001");
        let mut router = RecordingRouter::default();

        let action: Action = serde_json::from_value(json!({
            "action": "publish",
            "topic": "commands.incidents.acknowledge",
            "payload": {"id": "INC-404"},
            "then": {"action": "showEmpty"}
        }))
        .unwrap();

        let mut dispatcher = ActionDispatcher::new(bus, &mut state, &mut router);
        let outcome = dispatcher.dispatch(&action, None).await;
        assert!(matches!(outcome, DispatchOutcome::Notice(_)));
        // then did not run
        assert!(state.current().is_some());
    }

    #[tokio::test]
    async fn transport_failure_is_a_notice_not_a_panic() {
        // a bus with no backend behind it
        let bus: Arc<MemoryBus> = Arc::new(MemoryBus::new());
        let mut state = ClientState::new("incidents");
        let mut router = RecordingRouter::default();
        let mut dispatcher = ActionDispatcher::new(bus, &mut state, &mut router);

        let action: Action = serde_json::from_value(json!({
            "action": "publish",
            "topic": "commands.incidents.acknowledge",
            "payload": {"id": "INC-001"}
        }))
        .unwrap();
        let outcome = dispatcher.dispatch(&action, None).await;
        assert!(matches!(outcome, DispatchOutcome::Notice(_)));
    }
}
