//! Advisor feedback with its inline annotations.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    AnnotationId, Entity, FeedbackId, ThesisId, Timestamp, UserId, ValidationError,
};

/// A remark pinned to a passage of the manuscript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub page: u32,
    #[serde(default)]
    pub excerpt: String,
    pub comment: String,
}

/// Feedback on one thesis by one advisor.
///
/// The annotations are child records; they are always cached together with
/// their parent in a single write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: FeedbackId,
    pub thesis_id: ThesisId,
    pub advisor_id: UserId,
    pub remarks: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Annotation as sent on create; the API assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAnnotation {
    pub page: u32,
    pub excerpt: String,
    pub comment: String,
}

/// Create payload for feedback together with its annotations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFeedback {
    pub thesis_id: ThesisId,
    pub advisor_id: UserId,
    pub remarks: String,
    pub annotations: Vec<NewAnnotation>,
}

impl NewFeedback {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.remarks.trim().is_empty() && self.annotations.is_empty() {
            return Err(ValidationError::empty_field("remarks"));
        }
        if let Some(bad) = self.annotations.iter().find(|a| a.page == 0) {
            return Err(ValidationError::invalid_format(
                "annotations.page",
                format!("pages start at 1, got {} for '{}'", bad.page, bad.comment),
            ));
        }
        Ok(())
    }
}

/// Update payload. The API replaces the record, so linkage travels with
/// every update even when only the remarks change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackPatch {
    pub thesis_id: ThesisId,
    pub advisor_id: UserId,
    pub remarks: String,
}

impl FeedbackPatch {
    /// Builds a remarks-only update that preserves `current`'s linkage.
    pub fn remarks_for(current: &Feedback, remarks: impl Into<String>) -> Self {
        Self {
            thesis_id: current.thesis_id.clone(),
            advisor_id: current.advisor_id.clone(),
            remarks: remarks.into(),
        }
    }
}

impl Entity for Feedback {
    type Id = FeedbackId;
    type Draft = NewFeedback;
    type Patch = FeedbackPatch;

    const KIND: &'static str = "feedback";
    const RESOURCE: &'static str = "feedback";

    fn id(&self) -> &FeedbackId {
        &self.id
    }
}
