//! Feedback synchronizer.
//!
//! Annotations travel inside their feedback record, so the record and its
//! annotations are cached by a single `put` and can never be orphaned.

use futures::stream::BoxStream;

use super::entity_sync::{rejected, EntitySync};
use crate::application::fetch_stream::FetchStream;
use crate::domain::feedback::{Feedback, FeedbackFilter, FeedbackPatch, NewFeedback};
use crate::domain::foundation::{FeedbackId, FetchResult, ThesisId, ValidationError};

#[derive(Clone)]
pub struct FeedbackSynchronizer {
    entities: EntitySync<Feedback>,
}

impl FeedbackSynchronizer {
    pub fn new(entities: EntitySync<Feedback>) -> Self {
        Self { entities }
    }

    pub fn observe(&self, filter: FeedbackFilter) -> BoxStream<'static, FetchResult<Vec<Feedback>>> {
        self.entities.observe_list(filter)
    }

    pub fn observe_for_thesis(&self, thesis_id: ThesisId) -> BoxStream<'static, FetchResult<Vec<Feedback>>> {
        self.observe(FeedbackFilter::for_thesis(thesis_id))
    }

    pub fn observe_feedback(&self, id: FeedbackId) -> FetchStream<Feedback> {
        self.entities.observe_one(id)
    }

    /// Creates feedback together with its inline annotations.
    pub fn create(&self, draft: NewFeedback) -> FetchStream<Feedback> {
        if let Err(e) = draft.validate() {
            return rejected(e);
        }
        self.entities.create(draft)
    }

    /// Replaces the remarks, keeping thesis and advisor linkage.
    ///
    /// The linkage is read from the remote record first; if that read fails
    /// the update is not sent.
    pub fn update_remarks(&self, id: FeedbackId, remarks: impl Into<String>) -> FetchStream<Feedback> {
        let remarks = remarks.into();
        if remarks.trim().is_empty() {
            return rejected(ValidationError::empty_field("remarks"));
        }
        self.entities
            .revise(id, move |current| FeedbackPatch::remarks_for(current, remarks))
    }

    pub fn delete(&self, id: FeedbackId) -> FetchStream<()> {
        self.entities.delete(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::network::ManualNetwork;
    use crate::adapters::storage::InMemoryEntityCache;
    use crate::application::sync::test_support::{orchestrator, ScriptedRemote};
    use crate::domain::feedback::{Annotation, NewAnnotation};
    use crate::domain::foundation::{AnnotationId, RemoteError, SyncError, Timestamp, UserId};
    use futures::StreamExt;
    use std::sync::Arc;

    fn feedback(id: &str, thesis: &str, remarks: &str) -> Feedback {
        Feedback {
            id: FeedbackId::new(id).unwrap(),
            thesis_id: ThesisId::new(thesis).unwrap(),
            advisor_id: UserId::new("adv").unwrap(),
            remarks: remarks.to_string(),
            annotations: vec![],
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        }
    }

    fn build(draft: &NewFeedback) -> Feedback {
        Feedback {
            thesis_id: draft.thesis_id.clone(),
            advisor_id: draft.advisor_id.clone(),
            remarks: draft.remarks.clone(),
            annotations: draft
                .annotations
                .iter()
                .enumerate()
                .map(|(i, a)| Annotation {
                    id: AnnotationId::new(format!("a-{}", i)).unwrap(),
                    page: a.page,
                    excerpt: a.excerpt.clone(),
                    comment: a.comment.clone(),
                })
                .collect(),
            ..feedback("f-new", "t-1", "")
        }
    }

    fn apply(current: &Feedback, patch: &FeedbackPatch) -> Feedback {
        Feedback {
            thesis_id: patch.thesis_id.clone(),
            advisor_id: patch.advisor_id.clone(),
            remarks: patch.remarks.clone(),
            ..current.clone()
        }
    }

    fn fixture(
        cached: Vec<Feedback>,
        remote: Vec<Feedback>,
    ) -> (FeedbackSynchronizer, Arc<InMemoryEntityCache<Feedback>>, Arc<ScriptedRemote<Feedback>>) {
        let network = Arc::new(ManualNetwork::new(true));
        let cache = Arc::new(InMemoryEntityCache::with_records(cached));
        let remote = Arc::new(ScriptedRemote::new(remote, build, apply));
        let entities: EntitySync<Feedback> = EntitySync::new(cache.clone(), remote.clone(), orchestrator(&network));
        (FeedbackSynchronizer::new(entities), cache, remote)
    }

    #[tokio::test]
    async fn update_remarks_keeps_linkage() {
        let current = feedback("f-1", "t-9", "old");
        let (sync, cache, remote) = fixture(vec![current.clone()], vec![current]);

        let emitted: Vec<_> = sync
            .update_remarks(FeedbackId::new("f-1").unwrap(), "new")
            .collect()
            .await;

        let updated = emitted.last().and_then(|r| r.success()).cloned().unwrap();
        assert_eq!(updated.remarks, "new");
        assert_eq!(updated.thesis_id, ThesisId::new("t-9").unwrap());
        assert_eq!(remote.calls(), vec!["fetch_by_id", "update"]);
        assert_eq!(cache.snapshot().await, vec![updated]);
    }

    #[tokio::test]
    async fn failed_linkage_read_aborts_update() {
        let current = feedback("f-1", "t-9", "old");
        let (sync, cache, remote) = fixture(vec![current.clone()], vec![current.clone()]);
        remote.fail_fetch_by_id(RemoteError::network("timeout"));

        let emitted: Vec<_> = sync
            .update_remarks(FeedbackId::new("f-1").unwrap(), "new")
            .collect()
            .await;

        assert_eq!(
            emitted.last(),
            Some(&FetchResult::Error(SyncError::Remote(RemoteError::network("timeout"))))
        );
        assert_eq!(remote.calls(), vec!["fetch_by_id"]);
        assert_eq!(cache.snapshot().await, vec![current]);
    }

    #[tokio::test]
    async fn annotations_are_cached_with_their_feedback() {
        let (sync, cache, _remote) = fixture(vec![], vec![]);
        let draft = NewFeedback {
            thesis_id: ThesisId::new("t-1").unwrap(),
            advisor_id: UserId::new("adv").unwrap(),
            remarks: "See notes".to_string(),
            annotations: vec![
                NewAnnotation {
                    page: 3,
                    excerpt: "teh".to_string(),
                    comment: "typo".to_string(),
                },
                NewAnnotation {
                    page: 7,
                    excerpt: String::new(),
                    comment: "cite this".to_string(),
                },
            ],
        };

        let emitted: Vec<_> = sync.create(draft).collect().await;

        assert!(emitted.last().unwrap().is_success());
        let cached = cache.snapshot().await;
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].annotations.len(), 2);
    }

    #[tokio::test]
    async fn observe_for_thesis_filters_cached_and_remote() {
        let (sync, cache, _remote) = fixture(
            vec![feedback("f-1", "t-1", "a")],
            vec![
                feedback("f-1", "t-1", "a"),
                feedback("f-2", "t-1", "b"),
                feedback("f-3", "t-2", "c"),
            ],
        );

        let emitted: Vec<_> = sync
            .observe_for_thesis(ThesisId::new("t-1").unwrap())
            .collect()
            .await;

        let counts: Vec<usize> = emitted
            .iter()
            .filter_map(|r| r.success().map(Vec::len))
            .collect();
        assert_eq!(counts, vec![1, 2]);
        assert_eq!(cache.len().await, 3);
    }

    #[tokio::test]
    async fn blank_remarks_are_rejected() {
        let (sync, _cache, remote) = fixture(vec![], vec![]);

        let emitted: Vec<_> = sync
            .update_remarks(FeedbackId::new("f-1").unwrap(), " ")
            .collect()
            .await;

        assert!(emitted.last().unwrap().is_error());
        assert!(remote.calls().is_empty());
    }
}
