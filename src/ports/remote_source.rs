//! RemoteSource port - the authoritative API for one entity kind.

use async_trait::async_trait;

use crate::domain::foundation::{Entity, RemoteError};

/// Port for reading and writing one entity kind on the server.
///
/// # Contract
///
/// Every failure is classified as a [`RemoteError`]. Implementations make a
/// single attempt per call; retries are the caller's decision.
#[async_trait]
pub trait RemoteSource<E: Entity>: Send + Sync {
    /// Lists every record visible to the current credential.
    async fn fetch(&self) -> Result<Vec<E>, RemoteError>;

    /// Reads one record.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the id does not exist
    async fn fetch_by_id(&self, id: &E::Id) -> Result<E, RemoteError>;

    /// Creates a record and returns it as stored by the server.
    async fn create(&self, draft: &E::Draft) -> Result<E, RemoteError>;

    /// Updates a record and returns it as stored by the server.
    async fn update(&self, id: &E::Id, patch: &E::Patch) -> Result<E, RemoteError>;

    async fn delete(&self, id: &E::Id) -> Result<(), RemoteError>;
}
