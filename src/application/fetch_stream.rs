//! Ordered stream of `FetchResult` values produced by one background task.

use futures::Stream;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::foundation::{FetchResult, SyncError};

/// Room for every emission of one operation, so the producer never waits.
const EMISSION_BUFFER: usize = 4;

/// Emissions of one orchestrated operation, in order.
///
/// The producing task runs on the Tokio worker pool. Dropping the stream
/// cancels it: the task is aborted at its next suspension point and any
/// pending local write is skipped.
pub struct FetchStream<T> {
    receiver: mpsc::Receiver<FetchResult<T>>,
    task: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> FetchStream<T> {
    /// Spawns `producer` with an emitter bound to the returned stream.
    ///
    /// Must be called from within a Tokio runtime.
    pub(crate) fn spawn<F, Fut>(producer: F) -> Self
    where
        F: FnOnce(Emitter<T>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel(EMISSION_BUFFER);
        let task = tokio::spawn(producer(Emitter { sender }));
        Self {
            receiver,
            task: Some(task),
        }
    }

    /// `Loading` followed by `Error(error)`, for operations rejected before
    /// they start. Both states are buffered up front; no task is spawned.
    pub(crate) fn failed(error: SyncError) -> Self {
        let (sender, receiver) = mpsc::channel(EMISSION_BUFFER);
        for result in [FetchResult::Loading, FetchResult::Error(error)] {
            if sender.try_send(result).is_err() {
                break;
            }
        }
        Self {
            receiver,
            task: None,
        }
    }
}

impl<T> Stream for FetchStream<T> {
    type Item = FetchResult<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}

impl<T> Drop for FetchStream<T> {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

/// Producer half handed to the task behind a [`FetchStream`].
pub(crate) struct Emitter<T> {
    sender: mpsc::Sender<FetchResult<T>>,
}

impl<T> Emitter<T> {
    /// Emits one state. Returns `false` once the observer has gone away.
    pub(crate) async fn emit(&self, result: FetchResult<T>) -> bool {
        self.sender.send(result).await.is_ok()
    }

    /// True once the observer dropped the stream.
    pub(crate) fn is_cancelled(&self) -> bool {
        self.sender.is_closed()
    }
}
