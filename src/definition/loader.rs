//! Definition loader
//!
//! Reads module definitions from disk at startup and keeps a validated
//! in-memory registry. Definitions are immutable for the process
//! lifetime; there is no invalidation protocol.
//!
//! Files live at `<definitions_dir>/<module>.json`. A malformed file is
//! a startup failure; an absent module is only an error at request time.

use std::collections::HashMap;
use std::fs;
use std::path::{Path as FsPath, PathBuf};

use serde_json::Value;

use super::errors::{DefinitionError, DefinitionResult};
use super::types::ModuleDefinition;
use super::validator::parse_module;

/// Validated definitions indexed by module name
#[derive(Debug, Default)]
pub struct DefinitionRegistry {
    definitions: HashMap<String, ModuleDefinition>,
}

impl DefinitionRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and registers a raw definition under `module`
    pub fn register_raw(&mut self, module: &str, raw: &Value) -> DefinitionResult<()> {
        let definition = parse_module(raw)?;
        self.definitions.insert(module.to_string(), definition);
        Ok(())
    }

    /// Registers an already-validated definition
    pub fn register(&mut self, module: &str, definition: ModuleDefinition) {
        self.definitions.insert(module.to_string(), definition);
    }

    /// The definition for `module`, if registered
    pub fn get(&self, module: &str) -> Option<&ModuleDefinition> {
        self.definitions.get(module)
    }

    /// Registered module names
    pub fn modules(&self) -> Vec<&str> {
        self.definitions.keys().map(String::as_str).collect()
    }

    /// Number of registered definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Loads definition files from a directory into a registry
pub struct DefinitionLoader {
    definitions_dir: PathBuf,
}

impl DefinitionLoader {
    /// Creates a loader rooted at `definitions_dir`
    pub fn new(definitions_dir: impl Into<PathBuf>) -> Self {
        Self {
            definitions_dir: definitions_dir.into(),
        }
    }

    /// The directory this loader reads from
    pub fn definitions_dir(&self) -> &FsPath {
        &self.definitions_dir
    }

    /// Loads every `<module>.json` in the directory.
    ///
    /// A missing directory yields an empty registry; a malformed file is
    /// an error (startup must not continue with a half-loaded registry).
    pub fn load_all(&self) -> DefinitionResult<DefinitionRegistry> {
        let mut registry = DefinitionRegistry::new();
        if !self.definitions_dir.exists() {
            return Ok(registry);
        }

        let entries = fs::read_dir(&self.definitions_dir).map_err(|e| DefinitionError::Unreadable {
            file: self.definitions_dir.display().to_string(),
            message: e.to_string(),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| DefinitionError::Unreadable {
                file: self.definitions_dir.display().to_string(),
                message: e.to_string(),
            })?;
            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            let module = match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(stem) => stem.to_string(),
                None => continue,
            };
            let raw = self.read_file(&path)?;
            registry.register_raw(&module, &raw)?;
        }

        Ok(registry)
    }

    /// Loads a single module's definition file
    pub fn load_module(&self, module: &str) -> DefinitionResult<ModuleDefinition> {
        let path = self.definitions_dir.join(format!("{}.json", module));
        if !path.exists() {
            return Err(DefinitionError::not_found(module));
        }
        let raw = self.read_file(&path)?;
        parse_module(&raw)
    }

    fn read_file(&self, path: &FsPath) -> DefinitionResult<Value> {
        let content = fs::read_to_string(path).map_err(|e| DefinitionError::Unreadable {
            file: path.display().to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| DefinitionError::Unreadable {
            file: path.display().to_string(),
            message: e.to_string(),
        })
    }
}
