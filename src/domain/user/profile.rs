//! User account as cached by the client.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Entity, UserId, ValidationError};

/// Role of an account in the review workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Advisor,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Student => "student",
            Role::Advisor => "advisor",
            Role::Admin => "admin",
        };
        write!(f, "{}", s)
    }
}

/// A user account. Also the snapshot stored as the session's current user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_number: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Advisors and admins may leave feedback on theses.
    pub fn can_review(&self) -> bool {
        matches!(self.role, Role::Advisor | Role::Admin)
    }
}

/// Payload for an admin creating an account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUser {
    pub email: String,
    pub full_name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// Partial profile update. Unset fields are left unchanged by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_number: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.department.is_none() && self.student_number.is_none()
    }

    /// Rejects patches that would blank out the display name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::invalid_format("patch", "no fields to update"));
        }
        if matches!(&self.full_name, Some(name) if name.trim().is_empty()) {
            return Err(ValidationError::empty_field("full_name"));
        }
        Ok(())
    }
}

impl Entity for User {
    type Id = UserId;
    type Draft = NewUser;
    type Patch = UserPatch;

    const KIND: &'static str = "user";
    const RESOURCE: &'static str = "users";

    fn id(&self) -> &UserId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_api_shape() {
        let json = r#"{"id":"u-1","email":"a@uni.edu","full_name":"Ada","role":"advisor"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::Advisor);
        assert!(user.department.is_none());
        assert!(user.can_review());
        assert!(!user.is_admin());
    }

    #[test]
    fn empty_patch_is_rejected() {
        assert!(UserPatch::default().validate().is_err());
    }

    #[test]
    fn blank_name_is_rejected() {
        let patch = UserPatch {
            full_name: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            patch.validate(),
            Err(ValidationError::empty_field("full_name"))
        );
    }

    #[test]
    fn patch_skips_unset_fields() {
        let patch = UserPatch {
            department: Some("Physics".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&patch).unwrap(),
            r#"{"department":"Physics"}"#
        );
    }
}
