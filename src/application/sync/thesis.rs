//! Thesis synchronizer.

use futures::stream::{BoxStream, StreamExt};
use std::sync::Arc;

use super::entity_sync::{rejected, EntitySync};
use crate::application::fetch_stream::FetchStream;
use crate::application::session::SessionStore;
use crate::domain::foundation::{FetchResult, SyncError, ThesisId};
use crate::domain::thesis::{NewThesis, Thesis, ThesisFilter, ThesisPatch, ThesisStatus};
use crate::domain::user::Role;

#[derive(Clone)]
pub struct ThesisSynchronizer {
    entities: EntitySync<Thesis>,
    session: Arc<SessionStore>,
}

impl ThesisSynchronizer {
    pub fn new(entities: EntitySync<Thesis>, session: Arc<SessionStore>) -> Self {
        Self { entities, session }
    }

    pub fn observe(&self, filter: ThesisFilter) -> BoxStream<'static, FetchResult<Vec<Thesis>>> {
        self.entities.observe_list(filter)
    }

    /// Theses relevant to the signed-in user: owned for students, advised
    /// for advisors, everything for admins.
    pub fn observe_mine(&self) -> BoxStream<'static, FetchResult<Vec<Thesis>>> {
        let Some(user) = self.session.current_user_snapshot() else {
            return rejected(SyncError::NotAuthenticated).boxed();
        };
        let filter = match user.role {
            Role::Student => ThesisFilter::owned_by(user.id),
            Role::Advisor => ThesisFilter::advised_by(user.id),
            Role::Admin => ThesisFilter::all(),
        };
        self.observe(filter)
    }

    pub fn observe_thesis(&self, id: ThesisId) -> FetchStream<Thesis> {
        self.entities.observe_one(id)
    }

    pub fn create(&self, draft: NewThesis) -> FetchStream<Thesis> {
        if let Err(e) = draft.validate() {
            return rejected(e);
        }
        self.entities.create(draft)
    }

    pub fn update(&self, id: ThesisId, patch: ThesisPatch) -> FetchStream<Thesis> {
        if let Err(e) = patch.validate() {
            return rejected(e);
        }
        self.entities.update(id, patch)
    }

    pub fn update_status(&self, id: ThesisId, status: ThesisStatus) -> FetchStream<Thesis> {
        self.entities.update(id, ThesisPatch::status(status))
    }

    pub fn delete(&self, id: ThesisId) -> FetchStream<()> {
        self.entities.delete(id)
    }
}
