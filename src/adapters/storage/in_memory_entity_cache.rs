//! In-Memory Entity Cache Adapter
//!
//! Keeps one entity kind in a vector guarded by a read/write lock.
//! Useful for testing and for sessions that must not touch disk.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{CacheError, Entity};
use crate::ports::EntityCache;

/// In-memory cache for one entity kind.
#[derive(Debug, Clone)]
pub struct InMemoryEntityCache<E: Entity> {
    records: Arc<RwLock<Vec<E>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl<E: Entity> InMemoryEntityCache<E> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            fail_reads: Arc::new(AtomicBool::new(false)),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a cache pre-populated with `records`
    pub fn with_records(records: Vec<E>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            ..Self::new()
        }
    }

    /// Make every read fail with `CacheError::Corrupt` (error-path testing)
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every write fail with `CacheError::Io` (error-path testing)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Get the number of cached records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Snapshot of every record, bypassing failure injection
    pub async fn snapshot(&self) -> Vec<E> {
        self.records.read().await.clone()
    }

    fn check_read(&self) -> Result<(), CacheError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CacheError::Corrupt(format!("{} cache unreadable", E::KIND)));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), CacheError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::Io(format!("{} cache read-only", E::KIND)));
        }
        Ok(())
    }
}

impl<E: Entity> Default for InMemoryEntityCache<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Replaces the record with the same id in place, or appends it.
pub(super) fn upsert<E: Entity>(records: &mut Vec<E>, entity: &E) {
    match records.iter_mut().find(|r| r.id() == entity.id()) {
        Some(slot) => *slot = entity.clone(),
        None => records.push(entity.clone()),
    }
}

#[async_trait]
impl<E: Entity> EntityCache<E> for InMemoryEntityCache<E> {
    async fn get(&self, id: &E::Id) -> Result<Option<E>, CacheError> {
        self.check_read()?;
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<E>, CacheError> {
        self.check_read()?;
        Ok(self.records.read().await.clone())
    }

    async fn put(&self, entity: &E) -> Result<(), CacheError> {
        self.check_write()?;
        let mut records = self.records.write().await;
        upsert(&mut records, entity);
        Ok(())
    }

    async fn put_many(&self, entities: &[E]) -> Result<(), CacheError> {
        self.check_write()?;
        let mut records = self.records.write().await;
        for entity in entities {
            upsert(&mut records, entity);
        }
        Ok(())
    }

    async fn replace_all(&self, entities: &[E]) -> Result<(), CacheError> {
        self.check_write()?;
        *self.records.write().await = entities.to_vec();
        Ok(())
    }

    async fn delete(&self, id: &E::Id) -> Result<(), CacheError> {
        self.check_write()?;
        self.records.write().await.retain(|r| r.id() != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ThesisId, Timestamp, UserId};
    use crate::domain::thesis::{Thesis, ThesisStatus};

    fn thesis(id: &str, title: &str) -> Thesis {
        Thesis {
            id: ThesisId::new(id).unwrap(),
            title: title.to_string(),
            abstract_text: String::new(),
            owner_id: UserId::new("s-1").unwrap(),
            advisor_id: None,
            status: ThesisStatus::Draft,
            document_url: None,
            submitted_at: None,
            updated_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn put_then_get() {
        let cache = InMemoryEntityCache::new();
        cache.put(&thesis("t1", "First")).await.unwrap();

        let loaded = cache.get(&ThesisId::new("t1").unwrap()).await.unwrap();
        assert_eq!(loaded.unwrap().title, "First");
    }

    #[tokio::test]
    async fn put_replaces_wholesale_and_keeps_position() {
        let cache = InMemoryEntityCache::with_records(vec![thesis("t1", "A"), thesis("t2", "B")]);
        cache.put(&thesis("t1", "A revised")).await.unwrap();

        let all = cache.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "A revised");
        assert_eq!(all[1].title, "B");
    }

    #[tokio::test]
    async fn put_many_upserts() {
        let cache = InMemoryEntityCache::with_records(vec![thesis("t1", "A")]);
        cache
            .put_many(&[thesis("t1", "A2"), thesis("t3", "C")])
            .await
            .unwrap();

        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn replace_all_drops_records_missing_from_the_new_table() {
        let cache = InMemoryEntityCache::with_records(vec![thesis("t1", "A"), thesis("t2", "B")]);
        cache
            .replace_all(&[thesis("t2", "B2"), thesis("t3", "C")])
            .await
            .unwrap();

        let titles: Vec<_> = cache.snapshot().await.into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["B2", "C"]);
    }

    #[tokio::test]
    async fn delete_absent_is_ok() {
        let cache: InMemoryEntityCache<Thesis> = InMemoryEntityCache::new();
        assert!(cache.delete(&ThesisId::new("nope").unwrap()).await.is_ok());
    }

    #[tokio::test]
    async fn injected_failures() {
        let cache = InMemoryEntityCache::with_records(vec![thesis("t1", "A")]);
        cache.set_fail_reads(true);
        cache.set_fail_writes(true);

        assert!(matches!(cache.get_all().await, Err(CacheError::Corrupt(_))));
        assert!(matches!(
            cache.put(&thesis("t2", "B")).await,
            Err(CacheError::Io(_))
        ));
        assert_eq!(cache.snapshot().await.len(), 1);
    }
}
