//! Generic entity synchronizer.
//!
//! Binds the offline-first orchestrator to one entity's cache and remote
//! source, and implements the write flows shared by every entity:
//!
//! - create: remote first, cache populated only from the response
//! - update: remote first, cached copy replaced by the response
//! - delete: remote first, cached copy removed only after success
//!
//! A failed remote write never touches the cache.

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::application::fetch_stream::FetchStream;
use crate::application::orchestrator::{FetchSource, OfflineFirst};
use crate::domain::foundation::{
    CacheError, Entity, EntityFilter, FetchResult, RemoteError, SyncError,
};
use crate::ports::{EntityCache, RemoteSource};

pub struct EntitySync<E: Entity> {
    cache: Arc<dyn EntityCache<E>>,
    remote: Arc<dyn RemoteSource<E>>,
    orchestrator: OfflineFirst,
}

impl<E: Entity> Clone for EntitySync<E> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            remote: Arc::clone(&self.remote),
            orchestrator: self.orchestrator.clone(),
        }
    }
}

impl<E: Entity> EntitySync<E> {
    pub fn new(
        cache: Arc<dyn EntityCache<E>>,
        remote: Arc<dyn RemoteSource<E>>,
        orchestrator: OfflineFirst,
    ) -> Self {
        Self {
            cache,
            remote,
            orchestrator,
        }
    }

    /// Cache-then-network list read, narrowed by `filter`.
    ///
    /// The filter is applied to every `Success`, whether it came from the
    /// cache or the remote. An empty cache counts as nothing cached.
    pub fn observe_list<F>(&self, filter: F) -> BoxStream<'static, FetchResult<Vec<E>>>
    where
        F: EntityFilter<E> + 'static,
    {
        let source = ListSource {
            cache: Arc::clone(&self.cache),
            remote: Arc::clone(&self.remote),
        };
        self.orchestrator
            .fetch(source)
            .map(move |result| result.map(|all| filter.apply(all)))
            .boxed()
    }

    /// Cache-then-network read of one record.
    pub fn observe_one(&self, id: E::Id) -> FetchStream<E> {
        self.orchestrator.fetch(RecordSource {
            id,
            cache: Arc::clone(&self.cache),
            remote: Arc::clone(&self.remote),
        })
    }

    pub fn create(&self, draft: E::Draft) -> FetchStream<E> {
        let this = self.clone();
        self.orchestrator.mutate(move || async move {
            let created = this.remote.create(&draft).await?;
            debug!(kind = E::KIND, id = %created.id(), "created remotely");
            this.remember(&created).await;
            Ok(created)
        })
    }

    pub fn update(&self, id: E::Id, patch: E::Patch) -> FetchStream<E> {
        let this = self.clone();
        self.orchestrator.mutate(move || async move {
            let updated = this.remote.update(&id, &patch).await?;
            this.remember(&updated).await;
            Ok(updated)
        })
    }

    /// Update whose payload is derived from the current remote record.
    ///
    /// If the record cannot be read, no update is sent.
    pub fn revise<P>(&self, id: E::Id, build_patch: P) -> FetchStream<E>
    where
        P: FnOnce(&E) -> E::Patch + Send + 'static,
    {
        let this = self.clone();
        self.orchestrator.mutate(move || async move {
            let current = this.remote.fetch_by_id(&id).await?;
            let patch = build_patch(&current);
            let updated = this.remote.update(&id, &patch).await?;
            this.remember(&updated).await;
            Ok(updated)
        })
    }

    pub fn delete(&self, id: E::Id) -> FetchStream<()> {
        let this = self.clone();
        self.orchestrator.mutate(move || async move {
            this.remote.delete(&id).await?;
            if let Err(e) = this.cache.delete(&id).await {
                warn!(kind = E::KIND, id = %id, error = %e, "deleted remotely but cached copy remains");
            }
            Ok(())
        })
    }

    pub fn orchestrator(&self) -> &OfflineFirst {
        &self.orchestrator
    }

    pub(crate) fn cache(&self) -> &Arc<dyn EntityCache<E>> {
        &self.cache
    }

    pub(crate) fn remote(&self) -> &Arc<dyn RemoteSource<E>> {
        &self.remote
    }

    /// Caches a remote write result. Local persistence is best-effort.
    pub(crate) async fn remember(&self, entity: &E) {
        if let Err(e) = self.cache.put(entity).await {
            warn!(kind = E::KIND, id = %entity.id(), error = %e, "failed to cache remote write result");
        }
    }
}

/// Whole-table read. A remote list replaces the cached table.
struct ListSource<E: Entity> {
    cache: Arc<dyn EntityCache<E>>,
    remote: Arc<dyn RemoteSource<E>>,
}

#[async_trait]
impl<E: Entity> FetchSource<Vec<E>> for ListSource<E> {
    async fn read_local(&self) -> Result<Option<Vec<E>>, CacheError> {
        let all = self.cache.get_all().await?;
        Ok((!all.is_empty()).then_some(all))
    }

    async fn read_remote(&self) -> Result<Vec<E>, RemoteError> {
        self.remote.fetch().await
    }

    async fn write_local(&self, value: &Vec<E>) -> Result<(), CacheError> {
        self.cache.replace_all(value).await
    }
}

/// Single-record read.
pub(crate) struct RecordSource<E: Entity> {
    pub(crate) id: E::Id,
    pub(crate) cache: Arc<dyn EntityCache<E>>,
    pub(crate) remote: Arc<dyn RemoteSource<E>>,
}

#[async_trait]
impl<E: Entity> FetchSource<E> for RecordSource<E> {
    async fn read_local(&self) -> Result<Option<E>, CacheError> {
        self.cache.get(&self.id).await
    }

    async fn read_remote(&self) -> Result<E, RemoteError> {
        self.remote.fetch_by_id(&self.id).await
    }

    async fn write_local(&self, value: &E) -> Result<(), CacheError> {
        self.cache.put(value).await
    }
}

/// Turns a validation outcome into an early-failing stream.
pub(crate) fn rejected<T: Send + 'static>(error: impl Into<SyncError>) -> FetchStream<T> {
    FetchStream::failed(error.into())
}
