//! Session management.
//!
//! - **SessionStore** - The durable (Credential, CurrentUser) pair
//! - **UnauthorizedBroadcaster** - Rejection signal with last-event replay
//! - **SessionGate** - What the transport sees of the two above
//! - **AuthService** - Login, registration, logout, password reset

mod auth_service;
mod session_store;
mod unauthorized;

pub use auth_service::AuthService;
pub use session_store::SessionStore;
pub use unauthorized::{SessionGate, UnauthorizedBroadcaster};
