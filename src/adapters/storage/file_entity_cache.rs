//! File-based Entity Cache Adapter
//!
//! Stores one entity kind as a JSON array in `<base>/<kind>.json`.
//! Every write rewrites the table through a temp file and a rename, so a
//! crash mid-write leaves either the old table or the new one on disk.
//! Reads report a corrupt table; writes discard it and start over.

use async_trait::async_trait;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::warn;

use super::write_atomically;
use super::in_memory_entity_cache::upsert;
use crate::domain::foundation::{CacheError, Entity};
use crate::ports::EntityCache;

/// File-backed cache for one entity kind
#[derive(Debug)]
pub struct FileEntityCache<E: Entity> {
    path: PathBuf,
    lock: RwLock<()>,
    _kind: PhantomData<fn() -> E>,
}

impl<E: Entity> FileEntityCache<E> {
    /// Create a cache whose table lives under `base_path`
    ///
    /// # Example
    /// ```ignore
    /// let theses: FileEntityCache<Thesis> = FileEntityCache::new("./data/cache");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            path: base_path.as_ref().join(format!("{}.json", E::KIND)),
            lock: RwLock::new(()),
            _kind: PhantomData,
        }
    }

    /// Path of the backing table file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<E>, CacheError> {
        if !fs::try_exists(&self.path).await? {
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&self.path).await?;
        serde_json::from_str(&json).map_err(|e| {
            CacheError::Corrupt(format!("{}: {}", self.path.display(), e))
        })
    }

    /// Current table for a read-modify-write. A corrupt table is dropped.
    async fn load_for_write(&self) -> Result<Vec<E>, CacheError> {
        match self.load().await {
            Err(CacheError::Corrupt(reason)) => {
                warn!(kind = E::KIND, %reason, "discarding corrupt cache table");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    async fn store(&self, records: &[E]) -> Result<(), CacheError> {
        let json = serde_json::to_vec(records)?;
        write_atomically(&self.path, &json).await
    }
}

#[async_trait]
impl<E: Entity> EntityCache<E> for FileEntityCache<E> {
    async fn get(&self, id: &E::Id) -> Result<Option<E>, CacheError> {
        let _guard = self.lock.read().await;
        Ok(self.load().await?.into_iter().find(|r| r.id() == id))
    }

    async fn get_all(&self) -> Result<Vec<E>, CacheError> {
        let _guard = self.lock.read().await;
        self.load().await
    }

    async fn put(&self, entity: &E) -> Result<(), CacheError> {
        let _guard = self.lock.write().await;
        let mut records = self.load_for_write().await?;
        upsert(&mut records, entity);
        self.store(&records).await
    }

    async fn put_many(&self, entities: &[E]) -> Result<(), CacheError> {
        let _guard = self.lock.write().await;
        let mut records = self.load_for_write().await?;
        for entity in entities {
            upsert(&mut records, entity);
        }
        self.store(&records).await
    }

    async fn replace_all(&self, entities: &[E]) -> Result<(), CacheError> {
        let _guard = self.lock.write().await;
        self.store(entities).await
    }

    async fn delete(&self, id: &E::Id) -> Result<(), CacheError> {
        let _guard = self.lock.write().await;
        let mut records = self.load_for_write().await?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Ok(());
        }
        self.store(&records).await
    }
}
