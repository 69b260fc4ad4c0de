//! Persistence adapter trait for the `toy` resource

use crate::core::error::CatalogResult;
use crate::core::filter::FilterBy;
use crate::core::toy::{Toy, ToyId};
use async_trait::async_trait;

/// Uniform CRUD surface shared by the local mock and the remote HTTP service
///
/// Every method may fail with [`CatalogError::NotFound`] when it targets an
/// unknown id, or with [`CatalogError::Transport`] on network/storage
/// failure. Implementations never retry.
///
/// [`CatalogError::NotFound`]: crate::core::error::CatalogError::NotFound
/// [`CatalogError::Transport`]: crate::core::error::CatalogError::Transport
#[async_trait]
pub trait ToyStore: Send + Sync {
    /// Every toy matching `filter`, already filtered and sorted
    async fn query(&self, filter: &FilterBy) -> CatalogResult<Vec<Toy>>;

    /// Get a toy by ID
    async fn get(&self, id: &ToyId) -> CatalogResult<Toy>;

    /// Persist a new toy. The store assigns the final id and fills
    /// `created_at` when absent.
    async fn create(&self, toy: Toy) -> CatalogResult<Toy>;

    /// Replace an existing toy; `toy.id` must be set and known
    async fn update(&self, toy: Toy) -> CatalogResult<Toy>;

    /// Permanently remove a toy
    async fn delete(&self, id: &ToyId) -> CatalogResult<()>;

    /// Short adapter name used in logs and transport errors
    fn backend_name(&self) -> &'static str;
}
