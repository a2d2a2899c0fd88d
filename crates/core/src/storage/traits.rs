use async_trait::async_trait;
use serde_json::Value;

use crate::errors::CoreError;

/// Durable key → JSON document store.
///
/// The managers only ever read one document per namespace at start-up and
/// overwrite it wholesale afterwards, so implementations need no
/// transactions, no atomic multi-key writes and no partial updates.
/// Swapping the backing medium (files, a mobile key-value store, a browser
/// storage shim) means implementing this trait and nothing else.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Human-readable name of this store (for logs).
    fn name(&self) -> &str;

    /// Read the document stored under `key`. `Ok(None)` if never written.
    async fn read(&self, key: &str) -> Result<Option<Value>, CoreError>;

    /// Replace the document stored under `key`.
    async fn write(&self, key: &str, value: Value) -> Result<(), CoreError>;
}
