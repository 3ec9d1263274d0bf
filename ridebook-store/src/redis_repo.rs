use async_trait::async_trait;
use redis::AsyncCommands;
use ridebook_core::{BoxError, KeyValueStore};
use tracing::debug;

/// Redis-backed key-value store. Every key is namespaced with `key_prefix`.
#[derive(Clone)]
pub struct RedisStore {
    client: redis::Client,
    key_prefix: String,
}

impl RedisStore {
    pub fn new(connection_string: &str, key_prefix: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self {
            client,
            key_prefix: key_prefix.to_string(),
        })
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, BoxError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(self.key(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), BoxError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let full_key = self.key(key);
        conn.set::<_, _, ()>(&full_key, value).await?;
        debug!("Stored {} ({} bytes)", full_key, value.len());
        Ok(())
    }
}
