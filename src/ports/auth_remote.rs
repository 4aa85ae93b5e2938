//! AuthRemote port - sign-in endpoints of the API.
//!
//! Login, registration and password reset are sent without a credential.
//! Logout is sent with the current one.

use async_trait::async_trait;

use crate::domain::foundation::RemoteError;
use crate::domain::session::{AuthGrant, LoginRequest, Registration};

#[async_trait]
pub trait AuthRemote: Send + Sync {
    /// Exchanges email + password for a credential and the user record.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the email/password pair is rejected
    async fn login(&self, request: &LoginRequest) -> Result<AuthGrant, RemoteError>;

    /// Creates an account and signs it in.
    async fn register(&self, registration: &Registration) -> Result<AuthGrant, RemoteError>;

    /// Revokes the current credential server-side.
    async fn logout(&self) -> Result<(), RemoteError>;

    /// Asks the server to send a password reset email.
    async fn reset_password(&self, email: &str) -> Result<(), RemoteError>;
}
