//! Client session
//!
//! Couples a transport handle to a module's client state: fetch the
//! definition once, query current records, subscribe to change
//! notifications, and merge whatever arrives. Query replies are guarded
//! by the state generation so a reply that outlives its view is
//! discarded, not applied.

use std::sync::Arc;

use serde_json::Value;

use crate::definition::parse_module;
use crate::observability::Logger;
use crate::store::Record;
use crate::transport::{topics, Envelope, Subscription, Transport};

use super::errors::{ClientError, ClientResult};
use super::state::ClientState;

/// One client's connection to a module
pub struct ClientSession {
    bus: Arc<dyn Transport>,
    /// The single-writer view state; owned here, mutated only by this
    /// session's event handling
    pub state: ClientState,
}

impl ClientSession {
    /// Opens a session for `module` over a transport handle
    pub fn new(bus: Arc<dyn Transport>, module: impl Into<String>) -> Self {
        let module = module.into();
        Self {
            bus,
            state: ClientState::new(module),
        }
    }

    /// Fetches and validates the module definition. Loaded once; the
    /// definition does not change during a session.
    pub async fn load_definition(&mut self) -> ClientResult<()> {
        let subject = topics::definitions_get(self.state.module());
        let reply = self.bus.request(&subject, Value::Null).await?;
        if let Some(error) = reply.get("error").and_then(Value::as_str) {
            return Err(ClientError::rejected(error));
        }
        let definition = parse_module(&reply)?;
        self.state.set_definition(definition);
        Ok(())
    }

    /// Queries current records and applies them unless the view moved
    /// on while the request was in flight. Returns whether the reply
    /// was applied.
    pub async fn load_records(&mut self) -> ClientResult<bool> {
        let issued_at = self.state.generation();
        let subject = topics::data_get(self.state.module());
        let reply = self.bus.request(&subject, Value::Null).await?;

        let rows = reply
            .as_array()
            .ok_or_else(|| ClientError::bad_reply("data reply is not an array"))?;
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            match Record::from_value(row.clone()) {
                Ok(record) => records.push(record),
                // one bad row must not blank the whole view
                Err(e) => Logger::warn(
                    "client.bad_record",
                    &[("module", self.state.module()), ("error", &e.to_string())],
                ),
            }
        }
        Ok(self.state.apply_records_if_current(issued_at, records))
    }

    /// Opens the change-notification subscription for this module
    pub fn subscribe_updates(&self) -> ClientResult<Subscription> {
        Ok(self
            .bus
            .subscribe(&topics::updated(self.state.module()))?)
    }

    /// Merges one change notification into state. A notification
    /// carries a full record, so this is an unconditional replace-by-id.
    /// Returns whether the payload was usable.
    pub fn apply_notification(&mut self, envelope: &Envelope) -> bool {
        match Record::from_value(envelope.payload.clone()) {
            Ok(record) => {
                self.state.apply_update(record);
                true
            }
            Err(e) => {
                Logger::warn(
                    "client.bad_notification",
                    &[("subject", &envelope.subject), ("error", &e.to_string())],
                );
                false
            }
        }
    }

    /// The transport handle, for dispatching actions
    pub fn bus(&self) -> &Arc<dyn Transport> {
        &self.bus
    }
}
