//! Long-lived in-memory state owned by the [`Companion`](crate::Companion).
//!
//! Each manager hydrates from its namespace once, then mutates in memory
//! and hands a full snapshot to its [`SnapshotWriter`] after every change.

pub mod collection;
pub mod decks;
pub mod filters;

use serde::de::DeserializeOwned;
use tracing::{error, info, warn};

use crate::storage::traits::KeyValueStore;

/// Read and parse the document stored under `key`.
///
/// A missing document, a read failure or a document that does not parse
/// all yield `T::default()`; the last two are logged.
async fn hydrate<T: DeserializeOwned + Default>(store: &dyn KeyValueStore, key: &str) -> T {
    match store.read(key).await {
        Ok(Some(value)) => match serde_json::from_value::<T>(value) {
            Ok(doc) => {
                info!(key, store = store.name(), "Hydrated");
                doc
            }
            Err(e) => {
                warn!(key, error = %e, "Stored document is unreadable, starting empty");
                T::default()
            }
        },
        Ok(None) => {
            info!(key, store = store.name(), "No stored document, starting empty");
            T::default()
        }
        Err(e) => {
            error!(key, store = store.name(), error = %e, "Failed to read stored document, starting empty");
            T::default()
        }
    }
}
