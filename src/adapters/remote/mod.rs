//! API adapters.
//!
//! - **AuthenticatedTransport** - reqwest client with credential injection
//!   and rejection reporting
//! - **HttpRemoteSource** - Generic REST source for any [`Entity`](crate::domain::foundation::Entity)
//! - **HttpAuthRemote** - Login, registration, logout, password reset

mod http_auth;
mod http_source;
mod transport;

pub use http_auth::HttpAuthRemote;
pub use http_source::HttpRemoteSource;
pub use transport::{AuthenticatedTransport, TransportConfig};
