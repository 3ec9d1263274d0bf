use async_trait::async_trait;
use ridebook_core::{BoxError, KeyValueStore};
use std::collections::HashMap;
use std::sync::RwLock;

/// Process-local key-value store. Plays the part of browser storage in
/// tests and single-process demos.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.write().insert(key.to_string(), value.to_string());
        self
    }

    /// Current raw value, bypassing the async trait. Handy in assertions.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, String>> {
        self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, String>> {
        self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, BoxError> {
        Ok(self.peek(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), BoxError> {
        self.write().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
