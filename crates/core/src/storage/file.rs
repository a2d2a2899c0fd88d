use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};

use super::traits::KeyValueStore;
use crate::errors::CoreError;

/// Stores each key as a pretty-printed JSON file inside one directory.
///
/// Flow for a write: Value → JSON text → `<file>.tmp` → rename over `<file>`.
/// The rename keeps a crash mid-write from leaving a truncated document.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Characters outside `[A-Za-z0-9_-]` become `_`,
    /// so `@swudb/decks` maps to `_swudb_decks.json`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn read(&self, key: &str) -> Result<Option<Value>, CoreError> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let value = serde_json::from_slice(&bytes).map_err(|e| {
            CoreError::Deserialization(format!("Failed to parse {}: {e}", path.display()))
        })?;
        Ok(Some(value))
    }

    async fn write(&self, key: &str, value: Value) -> Result<(), CoreError> {
        let path = self.path_for(key);
        let text = serde_json::to_vec_pretty(&value)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize {key}: {e}")))?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, text).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}
