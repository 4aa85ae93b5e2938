//! Authentication session vocabulary.
//!
//! A session is the pair (Credential, current User). Both are present or
//! both are absent; there is no refreshing state in between.

mod credential;
mod events;

pub(crate) use credential::validate_email;
pub use credential::{AuthGrant, Credential, LoginRequest, Registration, SessionEpoch};
pub use events::UnauthorizedEvent;
