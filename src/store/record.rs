//! Record type
//!
//! A record is a flat JSON object with a required, stable string `id`.
//! Records are independently addressable and independently mutable;
//! there are no cross-record transactions. Every mutation stamps
//! `updatedAt`.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::errors::{StoreError, StoreResult};

/// Field holding the mutation timestamp
pub const UPDATED_AT: &str = "updatedAt";

/// One persisted entity
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Builds a record from a JSON value, requiring an object with a
    /// non-empty string `id`
    pub fn from_value(value: Value) -> StoreResult<Self> {
        let fields = match value {
            Value::Object(fields) => fields,
            _ => return Err(StoreError::MissingId),
        };
        match fields.get("id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => Ok(Self { fields }),
            _ => Err(StoreError::MissingId),
        }
    }

    /// The stable record id
    pub fn id(&self) -> &str {
        // construction guarantees a string id
        self.fields
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// A top-level field value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Sets one top-level field
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    /// Shallow-merges an update payload: specified top-level fields are
    /// replaced, everything else is untouched. The id is immutable; an
    /// update carrying a different id is rejected outright and nothing
    /// is applied.
    pub fn merge(&mut self, updates: &Map<String, Value>) -> StoreResult<()> {
        if let Some(attempted) = updates.get("id") {
            if attempted.as_str() != Some(self.id()) {
                return Err(StoreError::ImmutableId {
                    existing: self.id().to_string(),
                    attempted: attempted.to_string(),
                });
            }
        }
        for (key, value) in updates {
            if key == "id" {
                continue;
            }
            self.fields.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    /// Stamps `updatedAt` with an RFC 3339 timestamp
    pub fn stamp_updated_at(&mut self, now: DateTime<Utc>) {
        self.fields
            .insert(UPDATED_AT.to_string(), Value::String(now.to_rfc3339()));
    }

    /// The `updatedAt` stamp, if present
    pub fn updated_at(&self) -> Option<&str> {
        self.fields.get(UPDATED_AT).and_then(Value::as_str)
    }

    /// The record as a JSON value (always a fully materialized object)
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// Borrow the underlying fields
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}
