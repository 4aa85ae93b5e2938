//! Session store.
//!
//! Holds the (Credential, CurrentUser) pair in memory, mirrors it to a
//! durable [`KeyValueStore`], and publishes the current user on a watch
//! channel. Every transition bumps the [`SessionEpoch`].
//!
//! All mutations are serialized by one write lock, held across the durable
//! write, so a clear can never interleave with a half-finished establish.

use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::{info, warn};

use crate::domain::foundation::CacheError;
use crate::domain::session::{AuthGrant, Credential, SessionEpoch};
use crate::domain::user::User;
use crate::ports::{ActiveCredential, KeyValueStore};

pub(crate) const CREDENTIAL_KEY: &str = "session.credential";
pub(crate) const USER_KEY: &str = "session.user";

#[derive(Default)]
struct SessionState {
    credential: Option<Credential>,
    user: Option<User>,
    epoch: SessionEpoch,
}

pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    state: RwLock<SessionState>,
    user_tx: watch::Sender<Option<User>>,
}

impl SessionStore {
    /// Creates an empty (signed-out) store. Call [`restore`](Self::restore)
    /// to load a persisted session.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (user_tx, _) = watch::channel(None);
        Self {
            store,
            state: RwLock::new(SessionState::default()),
            user_tx,
        }
    }

    /// Loads the persisted session.
    ///
    /// If only one half of the pair is readable the pair is torn and both
    /// keys are removed.
    pub async fn restore(&self) -> Result<Option<User>, CacheError> {
        let mut state = self.state.write().await;

        let token = self.store.get(CREDENTIAL_KEY).await?;
        let user = match self.store.get(USER_KEY).await? {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(error = %e, "stored session user is unreadable");
                    None
                }
            },
            None => None,
        };
        let credential = token.and_then(|token| Credential::new(token).ok());

        state.epoch = state.epoch.next();
        match (credential, user) {
            (Some(credential), Some(user)) => {
                info!(user_id = %user.id, epoch = %state.epoch, "session restored");
                state.credential = Some(credential);
                state.user = Some(user.clone());
                self.user_tx.send_replace(Some(user.clone()));
                Ok(Some(user))
            }
            (None, None) => Ok(None),
            _ => {
                warn!("persisted session is incomplete, discarding it");
                state.credential = None;
                state.user = None;
                self.user_tx.send_replace(None);
                self.store.remove(&[CREDENTIAL_KEY, USER_KEY]).await?;
                Ok(None)
            }
        }
    }

    /// Writes credential and user together.
    ///
    /// Nothing changes in memory unless the durable write succeeded.
    pub async fn establish(&self, grant: AuthGrant) -> Result<SessionEpoch, CacheError> {
        let mut state = self.state.write().await;

        let user_json = serde_json::to_string(&grant.user)?;
        self.store
            .set_many(vec![
                (CREDENTIAL_KEY.to_string(), grant.credential.expose().to_string()),
                (USER_KEY.to_string(), user_json),
            ])
            .await?;

        state.epoch = state.epoch.next();
        state.credential = Some(grant.credential);
        state.user = Some(grant.user.clone());
        info!(user_id = %grant.user.id, epoch = %state.epoch, "session established");
        self.user_tx.send_replace(Some(grant.user));
        Ok(state.epoch)
    }

    /// Signs out locally. Always succeeds in memory; a failed durable
    /// removal is logged.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        self.clear_locked(&mut state).await;
    }

    /// Clears the session only if it is still at `epoch`.
    ///
    /// Returns `false` when the session already moved on (signed out, or
    /// signed in again), so a stale rejection cannot end a fresh session.
    pub async fn invalidate_if_current(&self, epoch: SessionEpoch) -> bool {
        let mut state = self.state.write().await;
        if state.epoch != epoch || state.credential.is_none() {
            return false;
        }
        self.clear_locked(&mut state).await;
        true
    }

    /// Replaces the current user if the session is still at `epoch`.
    pub async fn replace_user_if(&self, epoch: SessionEpoch, user: User) -> Result<bool, CacheError> {
        let mut state = self.state.write().await;
        if state.epoch != epoch || state.credential.is_none() {
            return Ok(false);
        }

        let user_json = serde_json::to_string(&user)?;
        self.store.set(USER_KEY, user_json).await?;

        state.user = Some(user.clone());
        self.user_tx.send_replace(Some(user));
        Ok(true)
    }

    pub async fn active_credential(&self) -> Option<ActiveCredential> {
        let state = self.state.read().await;
        state.credential.clone().map(|credential| ActiveCredential {
            credential,
            epoch: state.epoch,
        })
    }

    pub async fn epoch(&self) -> SessionEpoch {
        self.state.read().await.epoch
    }

    /// Current user together with the epoch it belongs to.
    pub async fn signed_in_user(&self) -> Option<(User, SessionEpoch)> {
        let state = self.state.read().await;
        state.user.clone().map(|user| (user, state.epoch))
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.credential.is_some()
    }

    pub fn current_user_snapshot(&self) -> Option<User> {
        self.user_tx.borrow().clone()
    }

    /// Live sequence of the current user, starting with the present value.
    ///
    /// Each call starts a fresh stream. Rapid changes may be coalesced to
    /// the latest value.
    pub fn current_user(&self) -> BoxStream<'static, Option<User>> {
        let receiver = self.user_tx.subscribe();
        stream::unfold((receiver, true), |(mut receiver, first)| async move {
            if !first && receiver.changed().await.is_err() {
                return None;
            }
            let user = receiver.borrow_and_update().clone();
            Some((user, (receiver, false)))
        })
        .boxed()
    }

    async fn clear_locked(&self, state: &mut SessionState) {
        let was_signed_in = state.credential.is_some();
        state.epoch = state.epoch.next();
        state.credential = None;
        state.user = None;
        self.user_tx.send_replace(None);

        if let Err(e) = self.store.remove(&[CREDENTIAL_KEY, USER_KEY]).await {
            warn!(error = %e, "failed to remove persisted session");
        }
        if was_signed_in {
            info!(epoch = %state.epoch, "session cleared");
        }
    }
}
