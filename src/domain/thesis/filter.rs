//! Client-side thesis list filter.

use super::{Thesis, ThesisStatus};
use crate::domain::foundation::{text_matches, EntityFilter, UserId};

/// Narrows a thesis list by owner, advisor, status and free text.
///
/// All set criteria must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThesisFilter {
    pub owner: Option<UserId>,
    pub advisor: Option<UserId>,
    pub status: Option<ThesisStatus>,
    pub query: Option<String>,
}

impl ThesisFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn owned_by(owner: UserId) -> Self {
        Self {
            owner: Some(owner),
            ..Default::default()
        }
    }

    pub fn advised_by(advisor: UserId) -> Self {
        Self {
            advisor: Some(advisor),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: ThesisStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

impl EntityFilter<Thesis> for ThesisFilter {
    fn matches(&self, thesis: &Thesis) -> bool {
        if let Some(owner) = &self.owner {
            if !thesis.is_owned_by(owner) {
                return false;
            }
        }
        if let Some(advisor) = &self.advisor {
            if !thesis.is_advised_by(advisor) {
                return false;
            }
        }
        if matches!(self.status, Some(status) if status != thesis.status) {
            return false;
        }
        match &self.query {
            Some(query) => text_matches(query, &[&thesis.title, &thesis.abstract_text]),
            None => true,
        }
    }
}
