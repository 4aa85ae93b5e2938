//! Offline-first fetch orchestrator.
//!
//! One algorithm for every cached read in the client:
//!
//! 1. Emit `Loading`.
//! 2. Read the local cache; emit `Success(cached)` if present. Local read
//!    failures count as "nothing cached".
//! 3. Offline: emit `Error(NoConnection)` only if nothing was cached.
//! 4. Online: read the remote. On success write it to the cache
//!    (best-effort) and emit `Success(fresh)`. On failure emit `Error` only
//!    if nothing was cached; otherwise the cached value stands.
//!
//! `Error` is therefore emitted at most once, last, and never after data.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

use super::connectivity::ConnectivityObserver;
use super::fetch_stream::{Emitter, FetchStream};
use crate::domain::foundation::{CacheError, FetchResult, RemoteError, SyncError};

/// The three operations the orchestrator composes for one read.
#[async_trait]
pub trait FetchSource<T>: Send + Sync + 'static {
    /// Cached value, or `None` if nothing usable is cached.
    async fn read_local(&self) -> Result<Option<T>, CacheError>;

    async fn read_remote(&self) -> Result<T, RemoteError>;

    /// Persists a fresh remote value.
    async fn write_local(&self, value: &T) -> Result<(), CacheError>;
}

/// Runs fetches and single-shot writes as [`FetchStream`]s.
#[derive(Clone)]
pub struct OfflineFirst {
    connectivity: Arc<ConnectivityObserver>,
}

impl OfflineFirst {
    pub fn new(connectivity: Arc<ConnectivityObserver>) -> Self {
        Self { connectivity }
    }

    pub fn connectivity(&self) -> &Arc<ConnectivityObserver> {
        &self.connectivity
    }

    /// Cache-then-network read of `source`.
    pub fn fetch<T, S>(&self, source: S) -> FetchStream<T>
    where
        T: Send + Sync + 'static,
        S: FetchSource<T>,
    {
        let connectivity = Arc::clone(&self.connectivity);
        FetchStream::spawn(move |emitter| run_fetch(connectivity, source, emitter))
    }

    /// Single-shot remote operation: `Loading`, then one `Success` or `Error`.
    ///
    /// Offline, the operation is not attempted and `Error(NoConnection)` is
    /// emitted instead.
    pub fn mutate<T, F, Fut>(&self, operation: F) -> FetchStream<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, SyncError>> + Send + 'static,
    {
        let connectivity = Arc::clone(&self.connectivity);
        FetchStream::spawn(move |emitter| async move {
            if !emitter.emit(FetchResult::Loading).await {
                return;
            }
            if !connectivity.is_online().await {
                emitter.emit(FetchResult::Error(SyncError::NoConnection)).await;
                return;
            }
            let result = match operation().await {
                Ok(value) => FetchResult::Success(value),
                Err(err) => FetchResult::Error(err),
            };
            emitter.emit(result).await;
        })
    }
}

async fn run_fetch<T, S>(connectivity: Arc<ConnectivityObserver>, source: S, emitter: Emitter<T>)
where
    T: Send + Sync + 'static,
    S: FetchSource<T>,
{
    if !emitter.emit(FetchResult::Loading).await {
        return;
    }

    let cached = match source.read_local().await {
        Ok(cached) => cached,
        Err(err) => {
            debug!(error = %err, "local read failed, treating cache as empty");
            None
        }
    };
    let has_cached = cached.is_some();
    if let Some(value) = cached {
        if !emitter.emit(FetchResult::Success(value)).await {
            return;
        }
    }

    if !connectivity.is_online().await {
        if !has_cached {
            emitter.emit(FetchResult::Error(SyncError::NoConnection)).await;
        }
        return;
    }

    match source.read_remote().await {
        Ok(fresh) => {
            if emitter.is_cancelled() {
                debug!("fetch cancelled before remote result was delivered, skipping cache write");
                return;
            }
            if let Err(err) = source.write_local(&fresh).await {
                warn!(error = %err, "failed to cache remote result");
            }
            emitter.emit(FetchResult::Success(fresh)).await;
        }
        Err(err) if has_cached => {
            debug!(error = %err, "remote refresh failed, keeping cached data");
        }
        Err(err) => {
            emitter.emit(FetchResult::Error(err.into())).await;
        }
    }
}
