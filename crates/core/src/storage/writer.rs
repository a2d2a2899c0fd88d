use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

use super::traits::KeyValueStore;

enum WriteCommand {
    Snapshot(Value),
    Flush(oneshot::Sender<()>),
}

/// Fire-and-forget persistence for one namespace.
///
/// Every mutation hands over a full snapshot with [`schedule`](Self::schedule)
/// and returns immediately. A single background task writes snapshots in the
/// order they were scheduled, so the document on disk always ends up as the
/// latest in-memory state. Write failures are logged and dropped; the
/// in-memory state stays authoritative for the rest of the process.
pub struct SnapshotWriter {
    key: String,
    tx: Option<mpsc::UnboundedSender<WriteCommand>>,
}

impl SnapshotWriter {
    /// Start the writer task for `key`. Must be called from inside a tokio
    /// runtime; outside of one, persistence is disabled and logged.
    pub fn spawn(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                error!(key = %key, error = %e, "No async runtime, snapshots will not be persisted");
                return Self { key, tx: None };
            }
        };

        let (tx, mut rx) = mpsc::unbounded_channel::<WriteCommand>();
        let task_key = key.clone();
        handle.spawn(async move {
            while let Some(cmd) = rx.recv().await {
                match cmd {
                    WriteCommand::Snapshot(value) => {
                        match store.write(&task_key, value).await {
                            Ok(()) => debug!(key = %task_key, store = store.name(), "Snapshot persisted"),
                            Err(e) => error!(
                                key = %task_key,
                                store = store.name(),
                                error = %e,
                                "Failed to persist snapshot"
                            ),
                        }
                    }
                    WriteCommand::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
        });

        Self { key, tx: Some(tx) }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Queue a full snapshot for writing. Never blocks, never fails.
    pub fn schedule<T: Serialize + ?Sized>(&self, snapshot: &T) {
        let Some(tx) = &self.tx else {
            return;
        };
        let value = match serde_json::to_value(snapshot) {
            Ok(value) => value,
            Err(e) => {
                error!(key = %self.key, error = %e, "Failed to serialize snapshot");
                return;
            }
        };
        if tx.send(WriteCommand::Snapshot(value)).is_err() {
            error!(key = %self.key, "Snapshot writer stopped, dropping snapshot");
        }
    }

    /// Wait until every snapshot scheduled before this call has been handed
    /// to the store (successfully or not).
    pub async fn flush(&self) {
        let Some(tx) = &self.tx else {
            return;
        };
        let (done_tx, done_rx) = oneshot::channel();
        if tx.send(WriteCommand::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }
}
