//! Configuration loading and management

use crate::catalog::CatalogService;
use crate::core::error::ConfigError;
use crate::core::service::ToyStore;
use crate::storage::LocalToyStore;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Which adapter backs the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-process store, optionally persisted to a JSON file
    #[default]
    Local,
    /// HTTP backend exposing the `toy` resource
    Remote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Collection URL, e.g. `http://localhost:3030/api/toy/`
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3030/api/toy/".to_string(),
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// JSON file to persist to; memory-only when absent
    pub path: Option<PathBuf>,

    /// Random toys generated when the store starts empty
    pub seed_count: usize,

    /// Artificial delay per operation
    pub latency_ms: u64,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            path: None,
            seed_count: 12,
            latency_ms: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Quiet window before a filter edit is committed
    pub filter_debounce_ms: u64,
    pub chat_reply_delay_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            filter_debounce_ms: 300,
            chat_reply_delay_ms: 1000,
        }
    }
}

/// Complete catalog configuration
///
/// ```yaml
/// backend: remote
/// remote:
///   base_url: http://localhost:3030/api/toy/
///   timeout_ms: 5000
/// ui:
///   filter_debounce_ms: 300
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub backend: BackendKind,
    pub remote: RemoteConfig,
    pub local: LocalConfig,
    pub ui: UiConfig,
}

impl CatalogConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path))?;
        let config: Self = serde_yaml::from_str(&content).map_err(|err| {
            ConfigError::ParseError {
                file: Some(path.to_string()),
                message: err.to_string(),
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|err| ConfigError::ParseError {
                file: None,
                message: err.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot work
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == BackendKind::Remote {
            let is_http = url::Url::parse(self.remote.base_url.trim())
                .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.has_host());
            if !is_http {
                return Err(ConfigError::InvalidValue {
                    field: "remote.base_url".to_string(),
                    value: self.remote.base_url.clone(),
                    message: "must be an http(s) URL".to_string(),
                });
            }
            if self.remote.timeout_ms == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "remote.timeout_ms".to_string(),
                    value: "0".to_string(),
                    message: "must be positive".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn filter_debounce(&self) -> Duration {
        Duration::from_millis(self.ui.filter_debounce_ms)
    }

    pub fn chat_reply_delay(&self) -> Duration {
        Duration::from_millis(self.ui.chat_reply_delay_ms)
    }

    /// Construct the configured adapter. An empty local store is seeded
    /// with `local.seed_count` random toys.
    pub fn build_store(&self) -> Result<Arc<dyn ToyStore>> {
        self.validate()?;
        match self.backend {
            BackendKind::Local => {
                let store = match &self.local.path {
                    Some(path) => LocalToyStore::open(path)?,
                    None => LocalToyStore::new(),
                }
                .with_latency(Duration::from_millis(self.local.latency_ms));

                let seeded = store.seed_if_empty(
                    (0..self.local.seed_count).map(|_| CatalogService::random_toy()),
                )?;
                tracing::info!(seeded, path = ?self.local.path, "Local toy store ready");
                Ok(Arc::new(store))
            }
            BackendKind::Remote => self.build_remote(),
        }
    }

    #[cfg(feature = "remote")]
    fn build_remote(&self) -> Result<Arc<dyn ToyStore>> {
        let store = crate::storage::HttpToyStore::new(
            self.remote.base_url.trim(),
            Duration::from_millis(self.remote.timeout_ms),
        )?;
        tracing::info!(base_url = store.base_url(), "Remote toy store ready");
        Ok(Arc::new(store))
    }

    #[cfg(not(feature = "remote"))]
    fn build_remote(&self) -> Result<Arc<dyn ToyStore>> {
        Err(ConfigError::InvalidValue {
            field: "backend".to_string(),
            value: "remote".to_string(),
            message: "built without the `remote` feature".to_string(),
        }
        .into())
    }
}
