//! The four-state result every orchestrated operation emits.

use super::SyncError;

/// State of one orchestrated operation as seen by its observer.
///
/// `Idle` is only ever a UI-side default; producers start with `Loading`.
/// `Success` may be emitted twice (cache, then remote). `Error` is terminal
/// and only emitted when no data was produced.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult<T> {
    Idle,
    Loading,
    Success(T),
    Error(SyncError),
}

impl<T> FetchResult<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchResult::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FetchResult::Error(_))
    }

    /// Borrows the data, if any.
    pub fn success(&self) -> Option<&T> {
        match self {
            FetchResult::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Borrows the failure cause, if any.
    pub fn error(&self) -> Option<&SyncError> {
        match self {
            FetchResult::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn into_success(self) -> Option<T> {
        match self {
            FetchResult::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Transforms the data of a `Success`, leaving other states untouched.
    pub fn map<U, F>(self, f: F) -> FetchResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            FetchResult::Idle => FetchResult::Idle,
            FetchResult::Loading => FetchResult::Loading,
            FetchResult::Success(value) => FetchResult::Success(f(value)),
            FetchResult::Error(err) => FetchResult::Error(err),
        }
    }
}

impl<T> Default for FetchResult<T> {
    fn default() -> Self {
        FetchResult::Idle
    }
}
