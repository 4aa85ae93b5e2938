//! Client-side feedback list filter.

use super::Feedback;
use crate::domain::foundation::{EntityFilter, ThesisId, UserId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackFilter {
    pub thesis: Option<ThesisId>,
    pub advisor: Option<UserId>,
}

impl FeedbackFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_thesis(thesis: ThesisId) -> Self {
        Self {
            thesis: Some(thesis),
            advisor: None,
        }
    }

    pub fn by_advisor(advisor: UserId) -> Self {
        Self {
            thesis: None,
            advisor: Some(advisor),
        }
    }
}

impl EntityFilter<Feedback> for FeedbackFilter {
    fn matches(&self, feedback: &Feedback) -> bool {
        self.thesis
            .as_ref()
            .map_or(true, |thesis| &feedback.thesis_id == thesis)
            && self
                .advisor
                .as_ref()
                .map_or(true, |advisor| &feedback.advisor_id == advisor)
    }
}
