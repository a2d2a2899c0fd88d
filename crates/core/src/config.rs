use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::format::DeckFormat;

/// Start-up configuration for [`Companion`](crate::Companion).
///
/// Missing fields fall back to their defaults, so a host app can ship a
/// partial JSON config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompanionConfig {
    /// Base URL of the SWUDB REST API (no trailing slash needed).
    pub api_base_url: String,

    /// Base URL that relative card image paths are resolved against.
    pub image_base_url: String,

    /// Per-request timeout for catalog calls, in seconds.
    pub request_timeout_secs: u64,

    /// Directory holding one JSON document per namespace.
    /// `None` keeps everything in memory for the lifetime of the process.
    pub data_dir: Option<PathBuf>,

    /// Serve the catalog from the bundled dataset only.
    pub offline: bool,

    pub deck_format: DeckFormat,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://swudb.com/api".to_string(),
            image_base_url: "https://swudb.com".to_string(),
            request_timeout_secs: 10,
            data_dir: None,
            offline: false,
            deck_format: DeckFormat::default(),
        }
    }
}

impl CompanionConfig {
    /// Offline, in-memory configuration.
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }
}
