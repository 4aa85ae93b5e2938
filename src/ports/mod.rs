//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the sync core and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `EntityCache` - Local copy of one entity kind
//! - `KeyValueStore` - Durable session persistence
//!
//! ## Remote Ports
//!
//! - `RemoteSource` - Authoritative API for one entity kind
//! - `AuthRemote` - Login, registration, logout, password reset
//! - `SessionGuard` - Credential lookup and rejection reporting for the transport
//!
//! ## Platform Ports
//!
//! - `NetworkMonitor` - Reachability query and change listener

mod auth_remote;
mod entity_cache;
mod key_value_store;
mod network_monitor;
mod remote_source;
mod session_guard;

pub use auth_remote::AuthRemote;
pub use entity_cache::EntityCache;
pub use key_value_store::KeyValueStore;
pub use network_monitor::{ListenerHandle, NetworkMonitor, ReachabilityCallback};
pub use remote_source::RemoteSource;
pub use session_guard::{ActiveCredential, SessionGuard};
