//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{KeyValueStore, StorageError, ValueUpdate};

/// Process-local key-value store.
///
/// Contents are lost when the store is dropped. Used by tests and anywhere
/// persistence is not wanted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn update(&self, key: &str, apply: &mut ValueUpdate<'_>) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        if let Some(value) = apply(entries.get(key).cloned())? {
            entries.insert(key.to_owned(), value);
        }
        Ok(())
    }
}
