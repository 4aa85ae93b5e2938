//! Sign-in flows: login, registration, logout and password reset.

use futures::stream::BoxStream;
use std::sync::Arc;
use tracing::{info, warn};

use super::{SessionStore, UnauthorizedBroadcaster};
use crate::application::fetch_stream::FetchStream;
use crate::application::orchestrator::OfflineFirst;
use crate::domain::foundation::{FetchResult, SyncError};
use crate::domain::session::{
    validate_email, AuthGrant, LoginRequest, Registration, UnauthorizedEvent,
};
use crate::domain::user::User;
use crate::ports::AuthRemote;

#[derive(Clone)]
pub struct AuthService {
    remote: Arc<dyn AuthRemote>,
    session: Arc<SessionStore>,
    broadcaster: Arc<UnauthorizedBroadcaster>,
    orchestrator: OfflineFirst,
}

impl AuthService {
    pub fn new(
        remote: Arc<dyn AuthRemote>,
        session: Arc<SessionStore>,
        broadcaster: Arc<UnauthorizedBroadcaster>,
        orchestrator: OfflineFirst,
    ) -> Self {
        Self {
            remote,
            session,
            broadcaster,
            orchestrator,
        }
    }

    /// Signs in. On success credential and user are stored together.
    pub fn login(&self, request: LoginRequest) -> FetchStream<User> {
        let this = self.clone();
        self.orchestrator.mutate(move || async move {
            request.validate()?;
            let grant = this.remote.login(&request).await?;
            this.start_session(grant).await
        })
    }

    /// Creates an account and signs it in.
    pub fn register(&self, registration: Registration) -> FetchStream<User> {
        let this = self.clone();
        self.orchestrator.mutate(move || async move {
            registration.validate()?;
            let grant = this.remote.register(&registration).await?;
            this.start_session(grant).await
        })
    }

    /// Signs out.
    ///
    /// The server is told when reachable, but the local session is cleared
    /// regardless of connectivity or the server's answer. The clear runs to
    /// completion even if the returned stream is dropped.
    pub fn logout(&self) -> FetchStream<()> {
        let remote = Arc::clone(&self.remote);
        let session = Arc::clone(&self.session);
        let connectivity = Arc::clone(self.orchestrator.connectivity());

        FetchStream::spawn(move |emitter| async move {
            emitter.emit(FetchResult::Loading).await;
            let clearing = Arc::clone(&session);
            let signing_out = tokio::spawn(async move {
                if connectivity.is_online().await {
                    if let Err(e) = remote.logout().await {
                        warn!(error = %e, "remote logout failed, clearing local session anyway");
                    }
                }
                clearing.clear().await;
            });
            if let Err(e) = signing_out.await {
                warn!(error = %e, "logout task failed");
                session.clear().await;
            }
            emitter.emit(FetchResult::Success(())).await;
        })
    }

    /// Asks the server to email a password reset link.
    pub fn reset_password(&self, email: impl Into<String>) -> FetchStream<()> {
        let remote = Arc::clone(&self.remote);
        let email = email.into();
        self.orchestrator.mutate(move || async move {
            validate_email(&email)?;
            remote.reset_password(email.trim()).await?;
            info!("password reset requested");
            Ok(())
        })
    }

    /// Live, restartable sequence of the signed-in user (`None` when signed out).
    pub fn current_user(&self) -> BoxStream<'static, Option<User>> {
        self.session.current_user()
    }

    pub fn subscribe_unauthorized(&self) -> BoxStream<'static, UnauthorizedEvent> {
        self.broadcaster.subscribe()
    }

    /// Loads a session persisted by an earlier run.
    pub async fn restore(&self) -> Result<Option<User>, SyncError> {
        Ok(self.session.restore().await?)
    }

    async fn start_session(&self, grant: AuthGrant) -> Result<User, SyncError> {
        let user = grant.user.clone();
        self.broadcaster.discard_pending();
        self.session.establish(grant).await?;
        Ok(user)
    }
}
