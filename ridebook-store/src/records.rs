use ridebook_core::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::StoreError;

/// JSON-encoded records on top of a string key-value store.
#[derive(Clone)]
pub struct JsonRecords {
    store: Arc<dyn KeyValueStore>,
}

impl JsonRecords {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.raw_get(key).await? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    pub async fn save<T: Serialize>(&self, key: &str, record: &T) -> Result<(), StoreError> {
        let text = serde_json::to_string(record)?;
        self.raw_set(key, &text).await
    }

    /// A JSON array stored under `key`; a missing key reads as empty.
    pub async fn load_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        Ok(self.load::<Vec<T>>(key).await?.unwrap_or_default())
    }

    /// Push one record onto the list under `key` and return the new length.
    /// Entries already in the list are kept as-is, even if they no longer
    /// match `T`.
    pub async fn append<T: Serialize>(&self, key: &str, record: &T) -> Result<usize, StoreError> {
        let mut list: Vec<serde_json::Value> = self.load_list(key).await?;
        list.push(serde_json::to_value(record)?);
        self.save(key, &list).await?;
        Ok(list.len())
    }

    /// Flags are stored as the strings `"true"` / `"false"`.
    pub async fn flag(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.raw_get(key).await?.as_deref() == Some("true"))
    }

    pub async fn set_flag(&self, key: &str, value: bool) -> Result<(), StoreError> {
        self.raw_set(key, if value { "true" } else { "false" }).await
    }

    async fn raw_get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.store
            .get(key)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn raw_set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.store
            .set(key, value)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}
