//! Persistence gateway: get/set of named JSON blobs.
//!
//! The core reads through this boundary only at startup and writes through
//! the [`PersistScheduler`](super::scheduler::PersistScheduler) afterwards,
//! so implementations stay free of caching or change notification.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::types::errors::StorageError;

/// Record keys the shell persists under.
pub const KEY_SETTINGS: &str = "settings";
pub const KEY_HISTORY: &str = "history";
pub const KEY_TABS: &str = "tabs";
pub const KEY_ACTIVE_TAB_ID: &str = "activeTabId";

/// Trait defining the storage gateway interface.
pub trait StorageGateway: Send {
    fn save(&self, key: &str, value: &Value) -> Result<(), StorageError>;
    fn load(&self, key: &str) -> Result<Option<Value>, StorageError>;
}

/// In-memory gateway.
///
/// Clones share the same map, so a test can keep a handle and inspect what
/// the shell persisted.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value under `key`, if any.
    pub fn snapshot(&self, key: &str) -> Option<Value> {
        self.entries
            .lock()
            .ok()
            .and_then(|map| map.get(key).cloned())
    }

    /// Pre-seeds a record, for building startup fixtures.
    pub fn seed(&self, key: &str, value: Value) {
        if let Ok(mut map) = self.entries.lock() {
            map.insert(key.to_string(), value);
        }
    }
}

impl StorageGateway for MemoryStore {
    fn save(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        let mut map = self
            .entries
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        map.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let map = self
            .entries
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(map.get(key).cloned())
    }
}
