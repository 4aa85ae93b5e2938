//! Traits shared by every server-owned record the client caches.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::hash::Hash;

/// A server-owned record that is cached locally and kept in sync.
///
/// The associated payload types describe what the remote endpoint accepts:
/// `Draft` on create and `Patch` on update.
pub trait Entity: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Id: Clone
        + Eq
        + Hash
        + fmt::Display
        + fmt::Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;
    type Draft: Serialize + Send + Sync + 'static;
    type Patch: Serialize + Send + Sync + 'static;

    /// Short name used in log lines and cache file names.
    const KIND: &'static str;

    /// REST collection path relative to the API base URL.
    const RESOURCE: &'static str;

    fn id(&self) -> &Self::Id;
}

/// Client-side predicate over cached or fetched entities.
///
/// Filters are pure: applying one twice yields the same list as once.
pub trait EntityFilter<E>: Send + Sync {
    fn matches(&self, entity: &E) -> bool;

    /// Keeps the entities that match, preserving order.
    fn apply(&self, entities: Vec<E>) -> Vec<E> {
        entities.into_iter().filter(|e| self.matches(e)).collect()
    }
}

/// Case-insensitive substring match of `query` against any of `fields`.
///
/// A blank query matches everything.
pub fn text_matches(query: &str, fields: &[&str]) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_matches_everything() {
        assert!(text_matches("", &["anything"]));
        assert!(text_matches("   ", &[]));
    }

    #[test]
    fn query_is_case_insensitive() {
        assert!(text_matches("GRAPH", &["Spectral graph theory"]));
        assert!(!text_matches("compiler", &["Spectral graph theory", "Jane"]));
    }
}
