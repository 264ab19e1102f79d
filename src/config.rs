use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::executor::DEFAULT_PAGE_SIZE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings for a [`SearchService`](crate::service::SearchService) and its
/// Elasticsearch backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the Elasticsearch node
    pub backend_url: String,
    /// Hits requested per page
    pub page_size: usize,
    /// How long the backend keeps a scroll cursor alive between pages
    pub scroll_keepalive: String,
    /// Document field holding the app key
    pub app_key_field: String,
    pub request_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:9200".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            scroll_keepalive: "1m".to_string(),
            app_key_field: "appkey".to_string(),
            request_timeout_secs: 60,
        }
    }
}

impl ServiceConfig {
    /// Loads a JSON config file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = url.into();
        self
    }

    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }
}
