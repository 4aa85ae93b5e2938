//! User synchronizer.
//!
//! Besides the usual list/detail reads, covers the signed-in user's own
//! profile. Fresh profile data also refreshes the session's current user,
//! but only if the session that started the work is still the active one.

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use std::sync::Arc;
use tracing::debug;

use super::entity_sync::{rejected, EntitySync, RecordSource};
use crate::application::fetch_stream::FetchStream;
use crate::application::orchestrator::FetchSource;
use crate::application::session::SessionStore;
use crate::domain::foundation::{CacheError, FetchResult, RemoteError, SyncError, UserId};
use crate::domain::session::SessionEpoch;
use crate::domain::user::{NewUser, User, UserFilter, UserPatch};

#[derive(Clone)]
pub struct UserSynchronizer {
    entities: EntitySync<User>,
    session: Arc<SessionStore>,
}

impl UserSynchronizer {
    pub fn new(entities: EntitySync<User>, session: Arc<SessionStore>) -> Self {
        Self { entities, session }
    }

    pub fn observe(&self, filter: UserFilter) -> BoxStream<'static, FetchResult<Vec<User>>> {
        self.entities.observe_list(filter)
    }

    pub fn observe_user(&self, id: UserId) -> FetchStream<User> {
        self.entities.observe_one(id)
    }

    /// The signed-in user's own record, cache first.
    pub fn observe_profile(&self) -> FetchStream<User> {
        let session = Arc::clone(&self.session);
        let entities = self.entities.clone();
        FetchStream::spawn(move |emitter| async move {
            let Some((user, epoch)) = session.signed_in_user().await else {
                if emitter.emit(FetchResult::Loading).await {
                    emitter.emit(FetchResult::Error(SyncError::NotAuthenticated)).await;
                }
                return;
            };
            let source = ProfileSource {
                record: RecordSource {
                    id: user.id,
                    cache: Arc::clone(entities.cache()),
                    remote: Arc::clone(entities.remote()),
                },
                session,
                epoch,
            };
            let mut inner = entities.orchestrator().fetch(source);
            while let Some(result) = inner.next().await {
                if !emitter.emit(result).await {
                    return;
                }
            }
        })
    }

    /// Updates the signed-in user's own profile.
    pub fn update_profile(&self, patch: UserPatch) -> FetchStream<User> {
        if let Err(e) = patch.validate() {
            return rejected(e);
        }
        let session = Arc::clone(&self.session);
        let entities = self.entities.clone();
        let orchestrator = entities.orchestrator().clone();
        orchestrator.mutate(move || async move {
            let (user, epoch) = session
                .signed_in_user()
                .await
                .ok_or(SyncError::NotAuthenticated)?;
            let updated = entities.remote().update(&user.id, &patch).await?;
            entities.remember(&updated).await;
            refresh_session_user(&session, epoch, &updated).await;
            Ok(updated)
        })
    }

    /// Admin account creation.
    pub fn create(&self, draft: NewUser) -> FetchStream<User> {
        self.entities.create(draft)
    }

    pub fn delete(&self, id: UserId) -> FetchStream<()> {
        self.entities.delete(id)
    }
}

async fn refresh_session_user(session: &SessionStore, epoch: SessionEpoch, user: &User) {
    match session.replace_user_if(epoch, user.clone()).await {
        Ok(true) => {}
        Ok(false) => debug!(epoch = %epoch, "session changed while profile was in flight, not refreshing it"),
        Err(e) => debug!(error = %e, "failed to persist refreshed session user"),
    }
}

/// Own-profile read that also refreshes the session user.
struct ProfileSource {
    record: RecordSource<User>,
    session: Arc<SessionStore>,
    epoch: SessionEpoch,
}

#[async_trait]
impl FetchSource<User> for ProfileSource {
    async fn read_local(&self) -> Result<Option<User>, CacheError> {
        self.record.read_local().await
    }

    async fn read_remote(&self) -> Result<User, RemoteError> {
        self.record.read_remote().await
    }

    async fn write_local(&self, value: &User) -> Result<(), CacheError> {
        self.record.write_local(value).await?;
        refresh_session_user(&self.session, self.epoch, value).await;
        Ok(())
    }
}
