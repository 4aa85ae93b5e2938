//! File-based Key/Value Store Adapter
//!
//! Keeps all keys in one JSON object on disk. Multi-key writes land in a
//! single atomic file replace, which is what keeps the session credential
//! and current-user snapshot from tearing across a crash.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use super::write_atomically;
use crate::domain::foundation::CacheError;
use crate::ports::KeyValueStore;

#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Create a store backed by the JSON file at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<BTreeMap<String, String>, CacheError> {
        if !fs::try_exists(&self.path).await? {
            return Ok(BTreeMap::new());
        }
        let json = fs::read_to_string(&self.path).await?;
        serde_json::from_str(&json)
            .map_err(|e| CacheError::Corrupt(format!("{}: {}", self.path.display(), e)))
    }

    async fn store(&self, entries: &BTreeMap<String, String>) -> Result<(), CacheError> {
        let json = serde_json::to_vec_pretty(entries)?;
        write_atomically(&self.path, &json).await
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        self.set_many(vec![(key.to_string(), value)]).await
    }

    async fn set_many(&self, new_entries: Vec<(String, String)>) -> Result<(), CacheError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        entries.extend(new_entries);
        self.store(&entries).await
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), CacheError> {
        let _guard = self.lock.lock().await;
        // A corrupt file is replaced rather than left blocking sign-out.
        let mut entries = self.load().await.unwrap_or_default();
        for key in keys {
            entries.remove(*key);
        }
        self.store(&entries).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        {
            let store = FileKeyValueStore::new(&path);
            store
                .set_many(vec![
                    ("token".to_string(), "abc".to_string()),
                    ("user".to_string(), "{}".to_string()),
                ])
                .await
                .unwrap();
        }

        let reopened = FileKeyValueStore::new(&path);
        assert_eq!(reopened.get("token").await.unwrap(), Some("abc".to_string()));
        assert_eq!(reopened.get("user").await.unwrap(), Some("{}".to_string()));
    }

    #[tokio::test]
    async fn remove_clears_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("kv.json"));
        store.set("token", "abc".to_string()).await.unwrap();
        store.remove(&["token"]).await.unwrap();
        assert_eq!(store.get("token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn remove_recovers_from_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kv.json");
        fs::write(&path, "garbage").await.unwrap();

        let store = FileKeyValueStore::new(&path);
        assert!(matches!(store.get("token").await, Err(CacheError::Corrupt(_))));
        store.remove(&["token"]).await.unwrap();
        assert_eq!(store.get("token").await.unwrap(), None);
    }
}
