//! Credential and sign-in payload value objects.

use secrecy::{ExposeSecret, Secret};
use std::fmt;

use crate::domain::foundation::ValidationError;
use crate::domain::user::{Role, User};

/// Opaque bearer token issued by the API on sign-in.
///
/// Debug output is redacted; the raw value is only exposed to the transport.
#[derive(Clone)]
pub struct Credential(Secret<String>);

impl Credential {
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ValidationError::empty_field("token"));
        }
        Ok(Self(Secret::new(token)))
    }

    /// Raw token for the `Authorization` header and durable storage.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// Monotonic counter bumped on every session transition.
///
/// Work that started under one epoch must not mutate the session once the
/// epoch has moved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SessionEpoch(u64);

impl SessionEpoch {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a successful login or registration returns.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthGrant {
    pub credential: Credential,
    pub user: User,
}

/// Email + password sign-in.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: Secret<String>,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Secret::new(password.into()),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(&self.email)?;
        if self.password.expose_secret().is_empty() {
            return Err(ValidationError::empty_field("password"));
        }
        Ok(())
    }
}

/// Self-service account creation.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub password: Secret<String>,
    pub student_number: Option<String>,
}

impl Registration {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(&self.email)?;
        if self.full_name.trim().is_empty() {
            return Err(ValidationError::empty_field("full_name"));
        }
        if self.password.expose_secret().len() < 8 {
            return Err(ValidationError::invalid_format(
                "password",
                "must be at least 8 characters",
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::empty_field("email"));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ValidationError::invalid_format("email", "missing @ or domain")),
    }
}
