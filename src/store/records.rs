//! Record store
//!
//! Current-value storage keyed by `(module, id)`, backed by the keyed
//! storage collaborator. Writes are blind overwrites: no revision
//! compare is performed, so concurrent writers to the same id are
//! last-write-wins by design.

use std::sync::Arc;

use serde_json::Value;

use super::errors::{StoreError, StoreResult};
use super::keyed::KeyedStore;
use super::record::Record;

/// Bucket holding module definitions when persisted through the store
pub const DEFINITIONS_BUCKET: &str = "definitions";

/// Bucket name for a module's current records
pub fn module_bucket(module: &str) -> String {
    format!("{}-current", module)
}

/// Current-value record storage for all modules
#[derive(Clone)]
pub struct RecordStore {
    store: Arc<dyn KeyedStore>,
}

impl RecordStore {
    /// Creates a record store over a keyed storage collaborator
    pub fn new(store: Arc<dyn KeyedStore>) -> Self {
        Self { store }
    }

    /// The record under `(module, id)`
    pub fn get(&self, module: &str, id: &str) -> StoreResult<Record> {
        match self.store.get(&module_bucket(module), id)? {
            Some(value) => Record::from_value(value),
            None => Err(StoreError::not_found(module, id)),
        }
    }

    /// Overwrites the record under its id. Last write wins.
    pub fn put(&self, module: &str, record: &Record) -> StoreResult<()> {
        self.store
            .put(&module_bucket(module), record.id(), &record.to_value())
    }

    /// All records of a module, in store-enumeration order. An unknown
    /// module is an empty sequence, not an error.
    pub fn list_all(&self, module: &str) -> StoreResult<Vec<Record>> {
        let entries = self.store.entries(&module_bucket(module))?;
        let mut records = Vec::with_capacity(entries.len());
        for (_, value) in entries {
            records.push(Record::from_value(value)?);
        }
        Ok(records)
    }

    /// Direct access to the underlying keyed store, for collaborators
    /// that persist non-record values (definitions)
    pub fn keyed(&self) -> &Arc<dyn KeyedStore> {
        &self.store
    }

    /// Persists a raw definition value under the definitions bucket
    pub fn put_definition(&self, module: &str, definition: &Value) -> StoreResult<()> {
        self.store.put(DEFINITIONS_BUCKET, module, definition)
    }
}
