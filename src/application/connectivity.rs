//! Connectivity observer.
//!
//! Wraps the platform [`NetworkMonitor`] with a deduplicated change stream.
//! However many streams are live, exactly one platform listener is
//! registered; it is released when the last stream is dropped.

use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::debug;

use crate::ports::{ListenerHandle, NetworkMonitor};

const CHANGE_BUFFER: usize = 16;

struct Registration {
    sender: broadcast::Sender<bool>,
    subscribers: usize,
    _listener: ListenerHandle,
}

type SharedRegistration = Arc<Mutex<Option<Registration>>>;

fn lock(shared: &SharedRegistration) -> MutexGuard<'_, Option<Registration>> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Process-wide view of network reachability.
pub struct ConnectivityObserver {
    monitor: Arc<dyn NetworkMonitor>,
    registration: SharedRegistration,
}

impl ConnectivityObserver {
    pub fn new(monitor: Arc<dyn NetworkMonitor>) -> Self {
        Self {
            monitor,
            registration: Arc::new(Mutex::new(None)),
        }
    }

    /// Instantaneous reachability, recomputed on every call.
    pub async fn is_online(&self) -> bool {
        self.monitor.is_reachable().await
    }

    /// Lazy, infinite stream of reachability.
    ///
    /// Starts with the current state, then yields changes. Never yields the
    /// same value twice in a row. Each call starts a fresh stream.
    pub fn changes(&self) -> ConnectivityChanges {
        let receiver = self.attach();
        let guard = SubscriberGuard {
            registration: Arc::clone(&self.registration),
        };

        let state = ChangeState {
            receiver,
            monitor: Some(Arc::clone(&self.monitor)),
            last: None,
        };
        let inner = stream::unfold(state, |mut state| async move {
            if let Some(monitor) = state.monitor.take() {
                let online = monitor.is_reachable().await;
                state.last = Some(online);
                return Some((online, state));
            }
            loop {
                match state.receiver.recv().await {
                    Ok(online) if state.last == Some(online) => continue,
                    Ok(online) => {
                        state.last = Some(online);
                        return Some((online, state));
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "connectivity stream lagged");
                        continue;
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        })
        .boxed();

        ConnectivityChanges {
            inner,
            _guard: guard,
        }
    }

    /// Number of live change streams (zero means no platform listener).
    pub fn subscriber_count(&self) -> usize {
        lock(&self.registration)
            .as_ref()
            .map_or(0, |registration| registration.subscribers)
    }

    fn attach(&self) -> broadcast::Receiver<bool> {
        let mut registration = lock(&self.registration);
        if let Some(active) = registration.as_mut() {
            active.subscribers += 1;
            return active.sender.subscribe();
        }

        let (sender, receiver) = broadcast::channel(CHANGE_BUFFER);
        let callback_sender = sender.clone();
        let listener = self.monitor.register(Arc::new(move |online| {
            // No receivers just means every stream is mid-teardown.
            let _ = callback_sender.send(online);
        }));
        debug!("registered platform connectivity listener");

        *registration = Some(Registration {
            sender,
            subscribers: 1,
            _listener: listener,
        });
        receiver
    }
}

struct ChangeState {
    receiver: broadcast::Receiver<bool>,
    monitor: Option<Arc<dyn NetworkMonitor>>,
    last: Option<bool>,
}

struct SubscriberGuard {
    registration: SharedRegistration,
}

impl Drop for SubscriberGuard {
    fn drop(&mut self) {
        let released = {
            let mut registration = lock(&self.registration);
            match registration.as_mut() {
                Some(active) if active.subscribers > 1 => {
                    active.subscribers -= 1;
                    None
                }
                _ => registration.take(),
            }
        };
        if released.is_some() {
            debug!("released platform connectivity listener");
        }
    }
}

/// Stream returned by [`ConnectivityObserver::changes`].
pub struct ConnectivityChanges {
    inner: BoxStream<'static, bool>,
    _guard: SubscriberGuard,
}

impl Stream for ConnectivityChanges {
    type Item = bool;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<bool>> {
        self.get_mut().inner.as_mut().poll_next(cx)
    }
}
