//! Client-side user list filter.

use super::{Role, User};
use crate::domain::foundation::{text_matches, EntityFilter};

/// Narrows a user list by role and free-text over name and email.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub query: Option<String>,
}

impl UserFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

impl EntityFilter<User> for UserFilter {
    fn matches(&self, user: &User) -> bool {
        if matches!(self.role, Some(role) if role != user.role) {
            return false;
        }
        match &self.query {
            Some(query) => text_matches(query, &[&user.full_name, &user.email]),
            None => true,
        }
    }
}
