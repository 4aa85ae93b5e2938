//! Thesis submission record.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Entity, ThesisId, Timestamp, UserId, ValidationError};

/// Review lifecycle of a thesis as reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThesisStatus {
    Draft,
    Submitted,
    UnderReview,
    RevisionRequested,
    Approved,
    Rejected,
}

impl ThesisStatus {
    /// Approved and rejected theses accept no further review.
    pub fn is_final(&self) -> bool {
        matches!(self, ThesisStatus::Approved | ThesisStatus::Rejected)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thesis {
    pub id: ThesisId,
    pub title: String,
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    pub owner_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisor_id: Option<UserId>,
    pub status: ThesisStatus,
    /// Remote location of the uploaded manuscript.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

impl Thesis {
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
    }

    pub fn is_advised_by(&self, user_id: &UserId) -> bool {
        self.advisor_id.as_ref() == Some(user_id)
    }
}

/// Create payload. The owner is taken from the credential server-side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewThesis {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisor_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
}

impl NewThesis {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        Ok(())
    }
}

/// Partial update. Unset fields are left unchanged by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ThesisPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisor_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ThesisStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
}

impl ThesisPatch {
    /// Patch that only moves the thesis to `status`.
    pub fn status(status: ThesisStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if matches!(&self.title, Some(title) if title.trim().is_empty()) {
            return Err(ValidationError::empty_field("title"));
        }
        Ok(())
    }
}

impl Entity for Thesis {
    type Id = ThesisId;
    type Draft = NewThesis;
    type Patch = ThesisPatch;

    const KIND: &'static str = "thesis";
    const RESOURCE: &'static str = "theses";

    fn id(&self) -> &ThesisId {
        &self.id
    }
}
