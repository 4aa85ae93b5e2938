//! Session events.

/// Signal that the API rejected the session's credential.
///
/// Carries no payload; by the time a subscriber sees it the session has
/// already been cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct UnauthorizedEvent;
