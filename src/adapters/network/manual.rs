//! Manually driven network monitor.
//!
//! Reachability is whatever the owner last set. Useful for tests and for
//! hosts that push reachability in from their own platform hooks.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::ports::{ListenerHandle, NetworkMonitor, ReachabilityCallback};

type Listeners = Arc<Mutex<HashMap<u64, ReachabilityCallback>>>;

fn lock(listeners: &Listeners) -> MutexGuard<'_, HashMap<u64, ReachabilityCallback>> {
    listeners.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct ManualNetwork {
    reachable: AtomicBool,
    listeners: Listeners,
    next_id: AtomicU64,
}

impl ManualNetwork {
    pub fn new(reachable: bool) -> Self {
        Self {
            reachable: AtomicBool::new(reachable),
            listeners: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Sets reachability and notifies every registered listener.
    ///
    /// Listeners are notified even when the value did not change.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
        let callbacks: Vec<ReachabilityCallback> = lock(&self.listeners).values().cloned().collect();
        for callback in callbacks {
            callback(reachable);
        }
    }

    /// Number of currently registered platform listeners.
    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }
}

impl Default for ManualNetwork {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl NetworkMonitor for ManualNetwork {
    async fn is_reachable(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }

    fn register(&self, callback: ReachabilityCallback) -> ListenerHandle {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        lock(&self.listeners).insert(id, callback);

        let listeners = Arc::clone(&self.listeners);
        ListenerHandle::new(move || {
            lock(&listeners).remove(&id);
        })
    }
}
