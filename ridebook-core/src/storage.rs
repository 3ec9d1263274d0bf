use async_trait::async_trait;

use crate::BoxError;

/// Keys the application reads and writes.
pub mod keys {
    pub const USER: &str = "user";
    pub const IS_LOGGED_IN: &str = "isLoggedIn";
    pub const REMEMBER_ME: &str = "rememberMe";
    pub const BOOKINGS: &str = "bookings";
}

/// String key-value storage, the system of record for accounts and bookings.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, BoxError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), BoxError>;
}
