//! SessionGuard port - what the authenticated transport needs from the
//! session: the credential to attach, and somewhere to report rejection.

use async_trait::async_trait;

use crate::domain::session::{Credential, SessionEpoch};

/// Credential together with the session epoch it was read under.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveCredential {
    pub credential: Credential,
    pub epoch: SessionEpoch,
}

#[async_trait]
pub trait SessionGuard: Send + Sync {
    /// Returns the credential to attach, or `None` when signed out.
    async fn active_credential(&self) -> Option<ActiveCredential>;

    /// Reports that the API rejected a credential read under `epoch`.
    ///
    /// The session is cleared before this returns. Returns `true` only for
    /// the report that actually invalidated the session; later reports for
    /// the same stale epoch return `false` and broadcast nothing.
    async fn report_unauthorized(&self, epoch: SessionEpoch) -> bool;
}
