//! NetworkMonitor port - the platform's reachability API.
//!
//! The core never polls the platform directly; it asks for the current state
//! and registers at most one listener at a time through this port.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Invoked by the platform with the new reachability on every change.
pub type ReachabilityCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Live listener registration. Dropping it deregisters the listener.
pub struct ListenerHandle {
    deregister: Option<Box<dyn FnOnce() + Send>>,
}

impl ListenerHandle {
    pub fn new(deregister: impl FnOnce() + Send + 'static) -> Self {
        Self {
            deregister: Some(Box::new(deregister)),
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        if let Some(deregister) = self.deregister.take() {
            deregister();
        }
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("active", &self.deregister.is_some())
            .finish()
    }
}

#[async_trait]
pub trait NetworkMonitor: Send + Sync {
    /// Instantaneous reachability.
    async fn is_reachable(&self) -> bool;

    /// Registers a platform listener; it stays live until the handle drops.
    fn register(&self, callback: ReachabilityCallback) -> ListenerHandle;
}
