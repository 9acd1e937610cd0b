//! Local key-value settings registry backing the record stores.
//!
//! One JSON object file in the data directory holds every store's payload
//! under its fixed key. Write failures are logged and swallowed: the
//! in-memory state stays authoritative for the running session.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::config::Config;
use crate::constants::REGISTRY_FILE;

pub struct Registry {
    path: PathBuf,
    values: HashMap<String, Value>,
}

impl Registry {
    /// Open the registry in the application data directory.
    pub fn open_default() -> Result<Self> {
        let path = Config::data_dir()?.join(REGISTRY_FILE);
        Ok(Self::open(path))
    }

    /// Open a registry at an explicit path. A missing or unreadable file
    /// yields an empty registry.
    pub fn open(path: PathBuf) -> Self {
        let values = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(values) => values,
                Err(e) => {
                    tracing::warn!("Registry file {} is corrupt: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Self { path, values }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Store a value and persist the whole registry. Persistence failures
    /// are logged but not surfaced.
    pub fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);

        if let Err(e) = self.save() {
            tracing::warn!("Failed to persist registry key '{}': {}", key, e);
        }
    }

    fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        }

        let content =
            serde_json::to_string_pretty(&self.values).context("Failed to encode registry")?;

        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write registry: {}", self.path.display()))?;

        Ok(())
    }
}
