//! REST entity source over the authenticated transport.
//!
//! `GET /{resource}`, `GET /{resource}/{id}`, `POST /{resource}`,
//! `PATCH /{resource}/{id}`, `DELETE /{resource}/{id}`.

use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;

use super::AuthenticatedTransport;
use crate::domain::foundation::{Entity, RemoteError};
use crate::ports::RemoteSource;

pub struct HttpRemoteSource<E: Entity> {
    transport: Arc<AuthenticatedTransport>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> HttpRemoteSource<E> {
    pub fn new(transport: Arc<AuthenticatedTransport>) -> Self {
        Self {
            transport,
            _entity: PhantomData,
        }
    }

    fn item_path(id: &E::Id) -> String {
        format!("{}/{}", E::RESOURCE, id)
    }
}

#[async_trait]
impl<E: Entity> RemoteSource<E> for HttpRemoteSource<E> {
    async fn fetch(&self) -> Result<Vec<E>, RemoteError> {
        self.transport.get(E::RESOURCE).await
    }

    async fn fetch_by_id(&self, id: &E::Id) -> Result<E, RemoteError> {
        self.transport.get(&Self::item_path(id)).await
    }

    async fn create(&self, draft: &E::Draft) -> Result<E, RemoteError> {
        self.transport.post(E::RESOURCE, draft).await
    }

    async fn update(&self, id: &E::Id, patch: &E::Patch) -> Result<E, RemoteError> {
        self.transport.patch(&Self::item_path(id), patch).await
    }

    async fn delete(&self, id: &E::Id) -> Result<(), RemoteError> {
        self.transport.delete(&Self::item_path(id)).await
    }
}
