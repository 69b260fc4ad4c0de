//! Local persisted implementation of `ToyStore`
//!
//! Stands in for the remote service during development and in tests. Toys
//! live in an insertion-ordered map; when a file path is configured the whole
//! collection is rewritten as JSON after every mutation and loaded on open.

use crate::core::error::{CatalogError, CatalogResult, TransportError, ValidationError};
use crate::core::filter::FilterBy;
use crate::core::service::ToyStore;
use crate::core::toy::{Toy, ToyId};
use crate::core::util::make_id;
use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use thiserror::Error;

/// Failures of the backing file or the in-process lock
#[derive(Debug, Error)]
pub enum LocalStorageError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt catalog file {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode catalog: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to acquire {0} lock")]
    Poisoned(&'static str),
}

impl From<LocalStorageError> for CatalogError {
    fn from(err: LocalStorageError) -> Self {
        CatalogError::Transport(TransportError::new("local", err.to_string()))
    }
}

/// Local toy store
///
/// Clones share the same collection (Arc pattern).
#[derive(Debug, Clone)]
pub struct LocalToyStore {
    toys: Arc<RwLock<IndexMap<ToyId, Toy>>>,
    path: Option<PathBuf>,
    latency: Duration,
}

impl LocalToyStore {
    /// Create an empty, memory-only store
    pub fn new() -> Self {
        Self {
            toys: Arc::new(RwLock::new(IndexMap::new())),
            path: None,
            latency: Duration::ZERO,
        }
    }

    /// Open a file-backed store. A missing file starts an empty catalog;
    /// the file is created on the first mutation.
    pub fn open(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut toys = IndexMap::new();

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|source| {
                LocalStorageError::Read {
                    path: path.clone(),
                    source,
                }
            })?;
            if !content.trim().is_empty() {
                let stored: Vec<Toy> =
                    serde_json::from_str(&content).map_err(|source| LocalStorageError::Decode {
                        path: path.clone(),
                        source,
                    })?;
                for mut toy in stored {
                    let id = toy.id.clone().unwrap_or_else(|| ToyId::new(make_id()));
                    toy.id = Some(id.clone());
                    toys.insert(id, toy);
                }
            }
        }

        tracing::debug!(path = %path.display(), count = toys.len(), "Opened local toy store");

        Ok(Self {
            toys: Arc::new(RwLock::new(toys)),
            path: Some(path),
            latency: Duration::ZERO,
        })
    }

    /// Delay every operation, mimicking a network round trip
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> CatalogResult<usize> {
        let toys = self
            .toys
            .read()
            .map_err(|_| LocalStorageError::Poisoned("read"))?;
        Ok(toys.len())
    }

    pub fn is_empty(&self) -> CatalogResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Insert `toys` (as new records) only when the catalog is empty.
    /// Returns how many were inserted.
    pub fn seed_if_empty(&self, toys: impl IntoIterator<Item = Toy>) -> CatalogResult<usize> {
        let mut stored = self
            .toys
            .write()
            .map_err(|_| LocalStorageError::Poisoned("write"))?;
        if !stored.is_empty() {
            return Ok(0);
        }
        let mut staged = IndexMap::new();
        for toy in toys {
            let (id, toy) = Self::assign_identity(toy);
            staged.insert(id, toy);
        }
        self.write_through(&mut stored, staged)?;
        tracing::info!(count = stored.len(), "Seeded local toy store");
        Ok(stored.len())
    }

    fn assign_identity(mut toy: Toy) -> (ToyId, Toy) {
        let id = ToyId::new(make_id());
        toy.id = Some(id.clone());
        toy.created_at.get_or_insert_with(Utc::now);
        (id, toy)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Persist `staged` and only then make it the live collection, so a
    /// failed write leaves memory and file in agreement.
    fn write_through(
        &self,
        live: &mut IndexMap<ToyId, Toy>,
        staged: IndexMap<ToyId, Toy>,
    ) -> Result<(), LocalStorageError> {
        self.persist(&staged)?;
        *live = staged;
        Ok(())
    }

    fn persist(&self, toys: &IndexMap<ToyId, Toy>) -> Result<(), LocalStorageError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let all: Vec<&Toy> = toys.values().collect();
        let content = serde_json::to_string_pretty(&all)?;

        // Write-then-rename so a crash never leaves a truncated catalog
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(|source| LocalStorageError::Write {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, path).map_err(|source| LocalStorageError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(())
    }
}

impl Default for LocalToyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToyStore for LocalToyStore {
    async fn query(&self, filter: &FilterBy) -> CatalogResult<Vec<Toy>> {
        self.simulate_latency().await;
        let toys = self
            .toys
            .read()
            .map_err(|_| LocalStorageError::Poisoned("read"))?;

        let result = filter.apply(toys.values().cloned());
        tracing::debug!(total = toys.len(), matched = result.len(), "Local query");
        Ok(result)
    }

    async fn get(&self, id: &ToyId) -> CatalogResult<Toy> {
        self.simulate_latency().await;
        let toys = self
            .toys
            .read()
            .map_err(|_| LocalStorageError::Poisoned("read"))?;

        toys.get(id)
            .cloned()
            .ok_or_else(|| CatalogError::toy_not_found(id.as_str()))
    }

    async fn create(&self, toy: Toy) -> CatalogResult<Toy> {
        self.simulate_latency().await;
        let mut toys = self
            .toys
            .write()
            .map_err(|_| LocalStorageError::Poisoned("write"))?;

        let (id, toy) = Self::assign_identity(toy);
        let mut staged = toys.clone();
        staged.insert(id.clone(), toy.clone());
        self.write_through(&mut toys, staged)?;

        tracing::debug!(toy_id = %id, "Created toy");
        Ok(toy)
    }

    async fn update(&self, mut toy: Toy) -> CatalogResult<Toy> {
        self.simulate_latency().await;
        let id = toy.id.clone().ok_or_else(|| ValidationError::MissingArgument {
            argument: "_id".to_string(),
        })?;

        let mut toys = self
            .toys
            .write()
            .map_err(|_| LocalStorageError::Poisoned("write"))?;

        let mut staged = toys.clone();
        let existing = staged
            .get_mut(&id)
            .ok_or_else(|| CatalogError::toy_not_found(id.as_str()))?;
        toy.created_at = existing.created_at.or(toy.created_at);
        *existing = toy.clone();
        self.write_through(&mut toys, staged)?;

        tracing::debug!(toy_id = %id, "Updated toy");
        Ok(toy)
    }

    async fn delete(&self, id: &ToyId) -> CatalogResult<()> {
        self.simulate_latency().await;
        let mut toys = self
            .toys
            .write()
            .map_err(|_| LocalStorageError::Poisoned("write"))?;

        let mut staged = toys.clone();
        staged
            .shift_remove(id)
            .ok_or_else(|| CatalogError::toy_not_found(id.as_str()))?;
        self.write_through(&mut toys, staged)?;

        tracing::debug!(toy_id = %id, "Deleted toy");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}
