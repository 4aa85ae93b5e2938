//! Application layer - the sync core.
//!
//! Coordinates the ports: the offline-first orchestrator, connectivity,
//! session management and the per-entity synchronizers.

pub mod connectivity;
mod fetch_stream;
pub mod orchestrator;
pub mod session;
pub mod sync;

pub use connectivity::{ConnectivityChanges, ConnectivityObserver};
pub use fetch_stream::FetchStream;
pub use orchestrator::{FetchSource, OfflineFirst};
pub use session::{AuthService, SessionGate, SessionStore, UnauthorizedBroadcaster};
pub use sync::{EntitySync, FeedbackSynchronizer, ThesisSynchronizer, UserSynchronizer};
