pub mod app_config;
pub mod memory_repo;
pub mod records;
pub mod redis_repo;

use ridebook_core::KeyValueStore;
use std::sync::Arc;

pub use app_config::{AccountRules, Config, FareRules, MappingConfig, StorageBackend};
pub use memory_repo::InMemoryStore;
pub use records::JsonRecords;
pub use redis_repo::RedisStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),
    #[error("Malformed stored record: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Storage misconfigured: {0}")]
    Misconfigured(String),
}

/// Build the key-value backend selected in `[storage]`.
pub fn open_store(config: &app_config::StorageConfig) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage");
            Ok(Arc::new(InMemoryStore::new()))
        }
        StorageBackend::Redis => {
            let url = config.redis_url.as_deref().ok_or_else(|| {
                StoreError::Misconfigured("storage.redis_url is required for the redis backend".into())
            })?;
            let store = RedisStore::new(url, &config.key_prefix)
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            tracing::info!("Using redis storage at {}", url);
            Ok(Arc::new(store))
        }
    }
}
