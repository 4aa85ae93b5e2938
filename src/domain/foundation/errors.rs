//! Error types for the sync core.
//!
//! Every error here is `Clone + PartialEq` because it travels inside
//! [`FetchResult::Error`](super::FetchResult) to any number of observers.

use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Classified failure of a remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The API rejected the credential (or there was none to send).
    #[error("Not authorized")]
    Unauthorized,

    #[error("Resource not found")]
    NotFound,

    /// Non-success response other than 401/404, or an undecodable body.
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),
}

impl RemoteError {
    /// Creates a server error with a status and message.
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Creates a network error with a message.
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkUnreachable(message.into())
    }

    /// Returns true if this error indicates the user should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, RemoteError::Unauthorized)
    }

    /// Returns true if a caller-initiated retry may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            RemoteError::NetworkUnreachable(_) => true,
            RemoteError::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Failure of the local cache or the durable key/value store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Corrupt cache data: {0}")]
    Corrupt(String),
}

impl From<std::io::Error> for CacheError {
    fn from(err: std::io::Error) -> Self {
        CacheError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

/// The cause carried by `FetchResult::Error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Offline and nothing cached to show.
    #[error("no connection and no cached data")]
    NoConnection,

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    /// An operation needed the signed-in user but the session is empty.
    #[error("not signed in")]
    NotAuthenticated,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl SyncError {
    /// Returns the remote classification, if this error came from the API.
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            SyncError::Remote(err) => Some(err),
            _ => None,
        }
    }
}
