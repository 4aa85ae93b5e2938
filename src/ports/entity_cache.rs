//! EntityCache port - local persistence of server-owned records.
//!
//! One cache per entity kind. Implementations must tolerate concurrent
//! readers and apply writes one at a time per kind.

use async_trait::async_trait;

use crate::domain::foundation::{CacheError, Entity};

/// Port for the local copy of one entity kind.
///
/// Implementations must ensure:
/// - A read observes every write that completed before it
/// - `put` replaces the whole record for its id (children included)
/// - `put_many` and `replace_all` are each applied as a single write: all
///   or nothing
#[async_trait]
pub trait EntityCache<E: Entity>: Send + Sync {
    /// Returns the cached record, or `None` if absent.
    async fn get(&self, id: &E::Id) -> Result<Option<E>, CacheError>;

    /// Returns every cached record in insertion order.
    async fn get_all(&self) -> Result<Vec<E>, CacheError>;

    /// Inserts or wholesale replaces one record.
    async fn put(&self, entity: &E) -> Result<(), CacheError>;

    /// Inserts or replaces several records atomically.
    async fn put_many(&self, entities: &[E]) -> Result<(), CacheError>;

    /// Swaps the whole table for `entities`, dropping every record not in it.
    async fn replace_all(&self, entities: &[E]) -> Result<(), CacheError>;

    /// Removes a record. Removing an absent id is not an error.
    async fn delete(&self, id: &E::Id) -> Result<(), CacheError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::thesis::Thesis;

    #[test]
    fn entity_cache_is_object_safe() {
        fn _accepts_dyn(_cache: &dyn EntityCache<Thesis>) {}
    }
}
