//! Sign-in endpoints over the authenticated transport.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::AuthenticatedTransport;
use crate::domain::foundation::RemoteError;
use crate::domain::session::{AuthGrant, Credential, LoginRequest, Registration};
use crate::domain::user::{Role, User};
use crate::ports::AuthRemote;

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    email: &'a str,
    full_name: &'a str,
    role: Role,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    student_number: Option<&'a str>,
}

#[derive(Serialize)]
struct ResetBody<'a> {
    email: &'a str,
}

/// `{ "token": "...", "user": { ... } }`
#[derive(Deserialize)]
struct AuthResponse {
    token: String,
    user: User,
}

impl AuthResponse {
    fn into_grant(self) -> Result<AuthGrant, RemoteError> {
        let credential = Credential::new(self.token)
            .map_err(|e| RemoteError::server(200, format!("sign-in response without token: {}", e)))?;
        Ok(AuthGrant {
            credential,
            user: self.user,
        })
    }
}

pub struct HttpAuthRemote {
    transport: Arc<AuthenticatedTransport>,
}

impl HttpAuthRemote {
    pub fn new(transport: Arc<AuthenticatedTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl AuthRemote for HttpAuthRemote {
    async fn login(&self, request: &LoginRequest) -> Result<AuthGrant, RemoteError> {
        let body = LoginBody {
            email: request.email.trim(),
            password: request.password.expose_secret(),
        };
        let response: AuthResponse = self.transport.post("auth/login", &body).await?;
        response.into_grant()
    }

    async fn register(&self, registration: &Registration) -> Result<AuthGrant, RemoteError> {
        let body = RegisterBody {
            email: registration.email.trim(),
            full_name: registration.full_name.trim(),
            role: registration.role,
            password: registration.password.expose_secret(),
            student_number: registration.student_number.as_deref(),
        };
        let response: AuthResponse = self.transport.post("auth/register", &body).await?;
        response.into_grant()
    }

    async fn logout(&self) -> Result<(), RemoteError> {
        self.transport.post_unit("auth/logout", None::<&()>).await
    }

    async fn reset_password(&self, email: &str) -> Result<(), RemoteError> {
        self.transport
            .post_unit("auth/reset-password", Some(&ResetBody { email }))
            .await
    }
}
