//! Single owning task for the process store.
//!
//! The store itself is a plain synchronous value. When frames arrive from
//! more than one task (or thread), [`spawn_store`] moves the store onto a
//! dedicated tokio task and hands back a cloneable [`StoreHandle`]. Every
//! frame, event and query sent through a handle is queued on one bounded
//! channel and applied strictly in order, one at a time.

use std::sync::Arc;

use miru_protocol::config_models::BusConfig;
use miru_protocol::ipc::Event;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};
use tracing::debug;

use crate::bus::error::{BusError, BusResult};
use crate::bus::plugin::BusPlugin;
use crate::store::{Callback, ProcessStore, Snapshot, SubscriptionId};

/// Messages processed by the owning task.
enum BusMessage {
    Frame(String),
    Event(Event),
    Snapshot(oneshot::Sender<Snapshot>),
    Subscribe(Callback, oneshot::Sender<SubscriptionId>),
    Unsubscribe(SubscriptionId, oneshot::Sender<bool>),
    Shutdown,
}

/// Cloneable handle to a store running on its owning task.
#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::Sender<BusMessage>,
    watch_rx: watch::Receiver<Snapshot>,
}

/// Move `store` onto its own task.
///
/// # Arguments
///
/// * `store` - The store to own; existing subscribers keep working
/// * `config` - Bus settings (channel capacity)
///
/// # Returns
///
/// A handle for talking to the task, and the task's join handle. The task
/// ends after [`StoreHandle::shutdown`] or once every handle is dropped, and
/// yields the store back.
///
/// Must be called from within a tokio runtime.
pub fn spawn_store(
    mut store: ProcessStore,
    config: &BusConfig,
) -> (StoreHandle, JoinHandle<ProcessStore>) {
    let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
    let (watch_tx, watch_rx) = watch::channel(store.snapshot());

    let watch_id = store.subscribe(move |snapshot| {
        watch_tx.send_replace(Arc::clone(snapshot));
        Ok(())
    });

    let task = tokio::spawn(run(store, rx, watch_id));
    (StoreHandle { tx, watch_rx }, task)
}

async fn run(
    mut store: ProcessStore,
    mut rx: mpsc::Receiver<BusMessage>,
    watch_id: SubscriptionId,
) -> ProcessStore {
    let plugin = BusPlugin::new();

    while let Some(message) = rx.recv().await {
        match message {
            BusMessage::Frame(raw) => {
                plugin.handle_frame(&mut store, &raw);
            }
            BusMessage::Event(event) => {
                plugin.handle_event(&mut store, event);
            }
            BusMessage::Snapshot(reply) => {
                let _ = reply.send(store.snapshot());
            }
            BusMessage::Subscribe(callback, reply) => {
                let _ = reply.send(store.subscribe_boxed(callback));
            }
            BusMessage::Unsubscribe(id, reply) => {
                let _ = reply.send(store.unsubscribe(id));
            }
            BusMessage::Shutdown => break,
        }
    }

    debug!(revision = store.revision(), "process store task stopped");
    store.unsubscribe(watch_id);
    store
}

impl StoreHandle {
    /// Queue a raw wire frame for decoding and application.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Disconnected`] if the task has stopped. Malformed
    /// frames are not an error here; the task logs and drops them.
    pub async fn deliver(&self, raw: impl Into<String>) -> BusResult<()> {
        self.send(BusMessage::Frame(raw.into())).await
    }

    /// Queue an already decoded event.
    pub async fn dispatch(&self, event: Event) -> BusResult<()> {
        self.send(BusMessage::Event(event)).await
    }

    /// Fetch the current snapshot.
    ///
    /// The reply is ordered after every frame queued before this call.
    pub async fn snapshot(&self) -> BusResult<Snapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(BusMessage::Snapshot(reply_tx)).await?;
        reply_rx.await.map_err(|_| BusError::Disconnected)
    }

    /// Register a callback on the owning task.
    ///
    /// The callback runs on the store's task, after each successful mutation.
    pub async fn subscribe<F>(&self, callback: F) -> BusResult<SubscriptionId>
    where
        F: FnMut(&Snapshot) -> anyhow::Result<()> + Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(BusMessage::Subscribe(Box::new(callback), reply_tx))
            .await?;
        reply_rx.await.map_err(|_| BusError::Disconnected)
    }

    /// Remove a callback registered through [`StoreHandle::subscribe`].
    pub async fn unsubscribe(&self, id: SubscriptionId) -> BusResult<bool> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(BusMessage::Unsubscribe(id, reply_tx)).await?;
        reply_rx.await.map_err(|_| BusError::Disconnected)
    }

    /// Receiver that always holds the latest snapshot.
    ///
    /// Intermediate snapshots may be skipped if the receiver falls behind;
    /// use [`StoreHandle::subscribe`] to see every mutation.
    pub fn watch(&self) -> watch::Receiver<Snapshot> {
        self.watch_rx.clone()
    }

    /// Ask the task to stop after the messages already queued.
    pub async fn shutdown(&self) -> BusResult<()> {
        self.send(BusMessage::Shutdown).await
    }

    async fn send(&self, message: BusMessage) -> BusResult<()> {
        self.tx
            .send(message)
            .await
            .map_err(|_| BusError::Disconnected)
    }
}

/// Forward every frame of a transport stream to the store, in order.
///
/// # Returns
///
/// The number of frames forwarded once the stream ends.
///
/// # Errors
///
/// Returns [`BusError::Disconnected`] if the task stops mid-stream.
pub async fn pump<S>(handle: &StoreHandle, frames: S) -> BusResult<usize>
where
    S: Stream<Item = String>,
{
    let mut frames = std::pin::pin!(frames);
    let mut forwarded = 0;

    while let Some(frame) = frames.next().await {
        handle.deliver(frame).await?;
        forwarded += 1;
    }

    debug!(forwarded, "bus transport stream ended");
    Ok(forwarded)
}
