//! Per-user configuration storage
//!
//! Configuration is a flat JSON object persisted under a name. Callers receive
//! a [`ConfigStore`] explicitly instead of reaching for a global file, so the
//! location (or the absence of any file at all) is decided at the edge.

mod file_store;

pub use file_store::JsonFileStore;

use crate::error::Result;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Mutex;

/// Name of the config document used when none is given
pub const DEFAULT_CONFIG_NAME: &str = "master-cli";

/// Load/save capability for named config documents
pub trait ConfigStore: Send + Sync {
    /// Load the named document, creating an empty one if it does not exist yet
    fn load(&self, name: &str) -> Result<Map<String, Value>>;

    /// Replace the named document
    fn save(&self, name: &str, config: &Map<String, Value>) -> Result<()>;
}

/// In-memory store, useful for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, Map<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self, name: &str) -> Result<Map<String, Value>> {
        let mut documents = self
            .documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(documents.entry(name.to_string()).or_default().clone())
    }

    fn save(&self, name: &str, config: &Map<String, Value>) -> Result<()> {
        let mut documents = self
            .documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        documents.insert(name.to_string(), config.clone());
        Ok(())
    }
}
