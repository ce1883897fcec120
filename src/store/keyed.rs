//! Keyed storage collaborator
//!
//! The backend persists current values through this trait: independent
//! JSON values under `(bucket, key)`. The store enforces no schema; the
//! command processor and definition validator are the enforcement
//! points.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use super::errors::{StoreError, StoreResult};

/// Durable keyed storage: one JSON value per `(bucket, key)`
pub trait KeyedStore: Send + Sync {
    /// The value under `(bucket, key)`, if any
    fn get(&self, bucket: &str, key: &str) -> StoreResult<Option<Value>>;

    /// Overwrite the value under `(bucket, key)`
    fn put(&self, bucket: &str, key: &str, value: &Value) -> StoreResult<()>;

    /// All keys in a bucket; order is store-enumeration order and not
    /// guaranteed stable across calls
    fn keys(&self, bucket: &str) -> StoreResult<Vec<String>>;

    /// All `(key, value)` pairs in a bucket
    fn entries(&self, bucket: &str) -> StoreResult<Vec<(String, Value)>>;
}

/// In-memory keyed store, used by tests and the in-process demo
#[derive(Debug, Default)]
pub struct MemoryKeyedStore {
    buckets: RwLock<HashMap<String, HashMap<String, Value>>>,
}

impl MemoryKeyedStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyedStore for MemoryKeyedStore {
    fn get(&self, bucket: &str, key: &str) -> StoreResult<Option<Value>> {
        let buckets = self.buckets.read().map_err(|_| StoreError::Poisoned)?;
        Ok(buckets.get(bucket).and_then(|b| b.get(key)).cloned())
    }

    fn put(&self, bucket: &str, key: &str, value: &Value) -> StoreResult<()> {
        let mut buckets = self.buckets.write().map_err(|_| StoreError::Poisoned)?;
        buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn keys(&self, bucket: &str) -> StoreResult<Vec<String>> {
        let buckets = self.buckets.read().map_err(|_| StoreError::Poisoned)?;
        Ok(buckets
            .get(bucket)
            .map(|b| b.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn entries(&self, bucket: &str) -> StoreResult<Vec<(String, Value)>> {
        let buckets = self.buckets.read().map_err(|_| StoreError::Poisoned)?;
        Ok(buckets
            .get(bucket)
            .map(|b| b.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }
}
