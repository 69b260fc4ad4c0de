//! # Mister Toy
//!
//! Client-side core of a toy-shop catalog: browse, filter, sort, create,
//! edit and delete toys kept by a pluggable backend.
//!
//! ## Features
//!
//! - **Pluggable Storage**: one `ToyStore` contract, a local (optionally file-backed) store and an HTTP store
//! - **Debounced Filtering**: filter edits are committed once typing pauses
//! - **Stale-Result Protection**: only the newest reload ever reaches the list
//! - **Optimistic Deletes**: toys vanish immediately and come back if the backend refuses
//! - **Configuration-Based**: pick and tune the backend from YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mister_toy::prelude::*;
//!
//! let config = CatalogConfig::from_yaml_str("backend: local")?;
//! let engine = Arc::new(CatalogEngine::new(CatalogService::new(config.build_store()?)));
//! engine.reload().await?;
//!
//! let editor = FilterEditor::spawn(engine.clone(), config.filter_debounce());
//! editor.update(|filter| filter.txt = "bear".to_string());
//!
//! let first = engine.toys()[0].id.clone().unwrap();
//! engine.dispatch(Command::DeleteToy(first)).await?;
//! ```

pub mod branches;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod core;
pub mod dashboard;
pub mod engine;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{CatalogError, CatalogResult, ConfigError, TransportError, ValidationError},
        events::{Notification, NotificationBus, NotificationLevel},
        filter::{FilterBy, SortBy, SortDir},
        query::ToyQuery,
        service::ToyStore,
        toy::{Label, Toy, ToyId},
        validation::ToyValidation,
    };

    // === Catalog & Engine ===
    pub use crate::catalog::CatalogService;
    pub use crate::engine::{
        CatalogEngine, CatalogSnapshot, Command, DebounceState, FilterEditor, Outcome,
    };

    // === Storage ===
    pub use crate::storage::LocalToyStore;
    #[cfg(feature = "remote")]
    pub use crate::storage::HttpToyStore;

    // === Config ===
    pub use crate::config::{BackendKind, CatalogConfig};

    // === Extras ===
    pub use crate::branches::Branch;
    pub use crate::chat::{ChatMessage, ChatSession};
    pub use crate::dashboard::DashboardStats;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use std::sync::Arc;
}
