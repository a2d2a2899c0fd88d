use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::traits::KeyValueStore;
use crate::errors::CoreError;

/// In-process store. Used when no data directory is configured, and by tests.
///
/// `set_failing(true)` makes every read and write fail, which is how the
/// "persistence failure is logged and ignored" path gets exercised.
#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, Value>>,
    failing: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with documents, e.g. to simulate a previous session.
    pub fn with_documents(documents: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            documents: Mutex::new(documents.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Synchronous peek used by tests and diagnostics.
    pub fn get(&self, key: &str) -> Option<Value> {
        let docs = self.documents.lock().unwrap_or_else(|e| e.into_inner());
        docs.get(key).cloned()
    }

    fn check_available(&self) -> Result<(), CoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CoreError::Storage("memory store is set to fail".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn read(&self, key: &str) -> Result<Option<Value>, CoreError> {
        self.check_available()?;
        Ok(self.get(key))
    }

    async fn write(&self, key: &str, value: Value) -> Result<(), CoreError> {
        self.check_available()?;
        let mut docs = self.documents.lock().unwrap_or_else(|e| e.into_inner());
        docs.insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
