//! Shared key/value store for values extracted from responses.
use log::*;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};

use crate::error::Result;

/// Run-scoped variable store. Setting an existing key overwrites it.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableStore {
    values: BTreeMap<String, String>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load variables persisted by an earlier step. A missing file yields an
    /// empty store.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("no variables file at {}: starting empty", path.display());
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)?;
        let store: VariableStore = serde_json::from_str(&content)?;
        Ok(store)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!("saved {} variables to {}", self.len(), path.display());
        Ok(())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|v| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
