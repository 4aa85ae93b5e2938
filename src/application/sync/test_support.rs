//! Scripted remote source shared by the synchronizer tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::adapters::network::ManualNetwork;
use crate::application::connectivity::ConnectivityObserver;
use crate::application::orchestrator::OfflineFirst;
use crate::domain::foundation::{Entity, RemoteError};
use crate::ports::RemoteSource;

pub(crate) struct ScriptedRemote<E: Entity> {
    records: Mutex<Vec<E>>,
    failure: Mutex<Option<RemoteError>>,
    fetch_by_id_failure: Mutex<Option<RemoteError>>,
    calls: Mutex<Vec<&'static str>>,
    build: fn(&E::Draft) -> E,
    apply: fn(&E, &E::Patch) -> E,
}

impl<E: Entity> ScriptedRemote<E> {
    pub(crate) fn new(records: Vec<E>, build: fn(&E::Draft) -> E, apply: fn(&E, &E::Patch) -> E) -> Self {
        Self {
            records: Mutex::new(records),
            failure: Mutex::new(None),
            fetch_by_id_failure: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            build,
            apply,
        }
    }

    /// Every call fails with `error`.
    pub(crate) fn fail_with(&self, error: RemoteError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub(crate) fn fail_fetch_by_id(&self, error: RemoteError) {
        *self.fetch_by_id_failure.lock().unwrap() = Some(error);
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn records(&self) -> Vec<E> {
        self.records.lock().unwrap().clone()
    }

    fn enter(&self, call: &'static str) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn find(&self, id: &E::Id) -> Result<E, RemoteError> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|record| record.id() == id)
            .cloned()
            .ok_or(RemoteError::NotFound)
    }
}

#[async_trait]
impl<E: Entity> RemoteSource<E> for ScriptedRemote<E> {
    async fn fetch(&self) -> Result<Vec<E>, RemoteError> {
        self.enter("fetch")?;
        Ok(self.records())
    }

    async fn fetch_by_id(&self, id: &E::Id) -> Result<E, RemoteError> {
        self.enter("fetch_by_id")?;
        if let Some(error) = self.fetch_by_id_failure.lock().unwrap().clone() {
            return Err(error);
        }
        self.find(id)
    }

    async fn create(&self, draft: &E::Draft) -> Result<E, RemoteError> {
        self.enter("create")?;
        let created = (self.build)(draft);
        self.records.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &E::Id, patch: &E::Patch) -> Result<E, RemoteError> {
        self.enter("update")?;
        let updated = (self.apply)(&self.find(id)?, patch);
        let mut records = self.records.lock().unwrap();
        records.retain(|record| record.id() != id);
        records.push(updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: &E::Id) -> Result<(), RemoteError> {
        self.enter("delete")?;
        self.find(id)?;
        self.records.lock().unwrap().retain(|record| record.id() != id);
        Ok(())
    }
}

pub(crate) fn orchestrator(network: &Arc<ManualNetwork>) -> OfflineFirst {
    OfflineFirst::new(Arc::new(ConnectivityObserver::new(network.clone())))
}
