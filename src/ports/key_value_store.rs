//! KeyValueStore port - durable string storage that survives restarts.
//!
//! Used for the session credential and the current-user snapshot.

use async_trait::async_trait;

use crate::domain::foundation::CacheError;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError>;

    /// Writes several keys as one durable operation.
    async fn set_many(&self, entries: Vec<(String, String)>) -> Result<(), CacheError>;

    /// Removes keys as one durable operation. Absent keys are ignored.
    async fn remove(&self, keys: &[&str]) -> Result<(), CacheError>;
}
