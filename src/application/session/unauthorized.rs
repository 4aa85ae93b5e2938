//! Unauthorized-event broadcaster.
//!
//! Process-wide signal fired when the API rejects the session credential.
//! The session is cleared before subscribers are notified. The most recent
//! event is also held for the next subscriber to attach, so a surface
//! created right as the event fires still sees it; that subscriber consumes
//! it and later subscribers do not.

use futures::stream::{self, BoxStream, StreamExt};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info};

use super::SessionStore;
use crate::domain::session::{SessionEpoch, UnauthorizedEvent};
use crate::ports::{ActiveCredential, SessionGuard};

const EVENT_BUFFER: usize = 8;

struct Channel {
    sender: broadcast::Sender<UnauthorizedEvent>,
    pending: Option<UnauthorizedEvent>,
}

pub struct UnauthorizedBroadcaster {
    session: Arc<SessionStore>,
    channel: Mutex<Channel>,
}

impl UnauthorizedBroadcaster {
    pub fn new(session: Arc<SessionStore>) -> Self {
        let (sender, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            session,
            channel: Mutex::new(Channel {
                sender,
                pending: None,
            }),
        }
    }

    /// Clears the session and notifies subscribers, if the session is still
    /// at `epoch`.
    ///
    /// Returns `true` for the call that invalidated the session. Later calls
    /// for the same epoch return `false` and notify no one.
    pub async fn broadcast(&self, epoch: SessionEpoch) -> bool {
        if !self.session.invalidate_if_current(epoch).await {
            debug!(epoch = %epoch, "ignoring rejection of a stale session");
            return false;
        }

        let mut channel = self.lock();
        channel.pending = Some(UnauthorizedEvent);
        let delivered = channel.sender.send(UnauthorizedEvent).unwrap_or(0);
        info!(epoch = %epoch, subscribers = delivered, "session rejected by server");
        true
    }

    /// Subscribes to future events. A pending, unconsumed event is delivered
    /// first.
    pub fn subscribe(&self) -> BoxStream<'static, UnauthorizedEvent> {
        let (receiver, pending) = {
            let mut channel = self.lock();
            (channel.sender.subscribe(), channel.pending.take())
        };

        stream::unfold((receiver, pending), |(mut receiver, pending)| async move {
            if let Some(event) = pending {
                return Some((event, (receiver, None)));
            }
            match receiver.recv().await {
                Ok(event) => Some((event, (receiver, None))),
                // Events carry no payload, so any number missed collapse to one.
                Err(RecvError::Lagged(_)) => Some((UnauthorizedEvent, (receiver, None))),
                Err(RecvError::Closed) => None,
            }
        })
        .boxed()
    }

    /// Drops the held event. Called when a new session is established so a
    /// later subscriber is not sent back to sign-in.
    pub fn discard_pending(&self) {
        self.lock().pending = None;
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().sender.receiver_count()
    }

    fn lock(&self) -> MutexGuard<'_, Channel> {
        self.channel.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// [`SessionGuard`] backed by the session store and broadcaster.
pub struct SessionGate {
    session: Arc<SessionStore>,
    broadcaster: Arc<UnauthorizedBroadcaster>,
}

impl SessionGate {
    pub fn new(session: Arc<SessionStore>, broadcaster: Arc<UnauthorizedBroadcaster>) -> Self {
        Self {
            session,
            broadcaster,
        }
    }
}

#[async_trait::async_trait]
impl SessionGuard for SessionGate {
    async fn active_credential(&self) -> Option<ActiveCredential> {
        self.session.active_credential().await
    }

    async fn report_unauthorized(&self, epoch: SessionEpoch) -> bool {
        self.broadcaster.broadcast(epoch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryKeyValueStore;
    use crate::domain::foundation::UserId;
    use crate::domain::session::{AuthGrant, Credential};
    use crate::domain::user::{Role, User};
    use std::time::Duration;

    fn grant() -> AuthGrant {
        AuthGrant {
            credential: Credential::new("token").unwrap(),
            user: User {
                id: UserId::new("u-1").unwrap(),
                email: "ada@uni.edu".to_string(),
                full_name: "Ada".to_string(),
                role: Role::Advisor,
                department: None,
                student_number: None,
            },
        }
    }

    async fn signed_in() -> (Arc<SessionStore>, UnauthorizedBroadcaster, SessionEpoch) {
        let session = Arc::new(SessionStore::new(Arc::new(InMemoryKeyValueStore::new())));
        let epoch = session.establish(grant()).await.unwrap();
        let broadcaster = UnauthorizedBroadcaster::new(Arc::clone(&session));
        (session, broadcaster, epoch)
    }

    #[tokio::test]
    async fn broadcast_clears_session_before_returning() {
        let (session, broadcaster, epoch) = signed_in().await;

        assert!(broadcaster.broadcast(epoch).await);

        assert!(!session.is_authenticated().await);
        assert_eq!(session.current_user_snapshot(), None);
    }

    #[tokio::test]
    async fn late_subscriber_sees_last_event_once() {
        let (_session, broadcaster, epoch) = signed_in().await;
        broadcaster.broadcast(epoch).await;

        let mut first = broadcaster.subscribe();
        assert_eq!(first.next().await, Some(UnauthorizedEvent));

        let mut second = broadcaster.subscribe();
        let nothing = tokio::time::timeout(Duration::from_millis(50), second.next()).await;
        assert!(nothing.is_err());
    }

    #[tokio::test]
    async fn all_current_subscribers_are_notified() {
        let (_session, broadcaster, epoch) = signed_in().await;
        let mut a = broadcaster.subscribe();
        let mut b = broadcaster.subscribe();

        broadcaster.broadcast(epoch).await;

        assert_eq!(a.next().await, Some(UnauthorizedEvent));
        assert_eq!(b.next().await, Some(UnauthorizedEvent));
    }

    #[tokio::test]
    async fn repeated_rejections_of_one_epoch_broadcast_once() {
        let (_session, broadcaster, epoch) = signed_in().await;
        let mut events = broadcaster.subscribe();

        assert!(broadcaster.broadcast(epoch).await);
        assert!(!broadcaster.broadcast(epoch).await);

        assert_eq!(events.next().await, Some(UnauthorizedEvent));
        let extra = tokio::time::timeout(Duration::from_millis(50), events.next()).await;
        assert!(extra.is_err());
    }

    #[tokio::test]
    async fn discarded_event_is_not_replayed() {
        let (_session, broadcaster, epoch) = signed_in().await;
        broadcaster.broadcast(epoch).await;
        broadcaster.discard_pending();

        let mut events = broadcaster.subscribe();
        let nothing = tokio::time::timeout(Duration::from_millis(50), events.next()).await;
        assert!(nothing.is_err());
    }

    #[tokio::test]
    async fn gate_exposes_credential_with_epoch() {
        let (session, broadcaster, epoch) = signed_in().await;
        let gate = SessionGate::new(Arc::clone(&session), Arc::new(broadcaster));

        let active = gate.active_credential().await.unwrap();
        assert_eq!(active.epoch, epoch);
        assert_eq!(active.credential.expose(), "token");

        assert!(gate.report_unauthorized(epoch).await);
        assert!(gate.active_credential().await.is_none());
    }
}
