//! File-backed keyed store
//!
//! One directory per bucket, one `<key>.json` file per key. Writes go
//! through a temp file and rename so a crashed write never leaves a
//! half-written value under the real key.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::errors::{StoreError, StoreResult};
use super::keyed::KeyedStore;

/// Durable keyed store rooted at a data directory
#[derive(Debug)]
pub struct FileKeyedStore {
    root: PathBuf,
}

impl FileKeyedStore {
    /// Creates a store rooted at `root`; the directory is created on
    /// first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The data directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_dir(&self, bucket: &str) -> StoreResult<PathBuf> {
        validate_name(bucket)?;
        Ok(self.root.join(bucket))
    }

    fn key_path(&self, bucket: &str, key: &str) -> StoreResult<PathBuf> {
        validate_name(key)?;
        Ok(self.bucket_dir(bucket)?.join(format!("{}.json", key)))
    }
}

/// Bucket and key names become path components; anything that could
/// escape the data directory is refused.
fn validate_name(name: &str) -> StoreResult<()> {
    let reject = |reason| {
        Err(StoreError::InvalidKey {
            key: name.to_string(),
            reason,
        })
    };
    if name.is_empty() {
        return reject("empty name");
    }
    if name == "." || name == ".." {
        return reject("path traversal");
    }
    if name.contains('/') || name.contains('\\') || name.contains('\0') {
        return reject("path separator");
    }
    Ok(())
}

impl KeyedStore for FileKeyedStore {
    fn get(&self, bucket: &str, key: &str) -> StoreResult<Option<Value>> {
        let path = self.key_path(bucket, key)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(path.display().to_string(), &e)),
        };
        let value = serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(value))
    }

    fn put(&self, bucket: &str, key: &str, value: &Value) -> StoreResult<()> {
        let dir = self.bucket_dir(bucket)?;
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(dir.display().to_string(), &e))?;

        let path = self.key_path(bucket, key)?;
        let tmp = dir.join(format!("{}.json.tmp", key));
        let content = serde_json::to_string(value).map_err(|e| StoreError::Corrupt {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: e.to_string(),
        })?;
        fs::write(&tmp, content).map_err(|e| StoreError::io(tmp.display().to_string(), &e))?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::io(path.display().to_string(), &e))?;
        Ok(())
    }

    fn keys(&self, bucket: &str) -> StoreResult<Vec<String>> {
        let dir = self.bucket_dir(bucket)?;
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(dir.display().to_string(), &e)),
        };
        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(dir.display().to_string(), &e))?;
            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        Ok(keys)
    }

    fn entries(&self, bucket: &str) -> StoreResult<Vec<(String, Value)>> {
        let mut entries = Vec::new();
        for key in self.keys(bucket)? {
            if let Some(value) = self.get(bucket, &key)? {
                entries.push((key, value));
            }
        }
        Ok(entries)
    }
}
