//! Catalog service: domain wrapper around a `ToyStore`
//!
//! Normalizes filters before they reach the adapter, validates toys before
//! saving, and builds empty/random toys for forms and demo data.

use crate::core::error::CatalogResult;
use crate::core::filter::FilterBy;
use crate::core::service::ToyStore;
use crate::core::toy::{Label, Toy, ToyId};
use crate::core::util::{make_lorem, random_int_inclusive};
use crate::core::validation::ToyValidation;
use chrono::Utc;
use std::sync::Arc;

/// Display palette for toy cards (styling only)
pub const TOY_COLORS: [&str; 12] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A", "#98D8C8", "#F7DC6F", "#BB8FCE", "#85C1E2",
    "#F8B88B", "#AED6F1", "#A9DFBF", "#F9E79F",
];

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn ToyStore>,
    validation: Arc<ToyValidation>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn ToyStore>) -> Self {
        Self {
            store,
            validation: Arc::new(ToyValidation::catalog_rules()),
        }
    }

    /// Replace the save-time validation rules
    pub fn with_validation(mut self, validation: ToyValidation) -> Self {
        self.validation = Arc::new(validation);
        self
    }

    pub fn store(&self) -> &Arc<dyn ToyStore> {
        &self.store
    }

    /// Query the adapter. Surrounding whitespace in `txt` is not part of
    /// the search.
    pub async fn query(&self, filter: &FilterBy) -> CatalogResult<Vec<Toy>> {
        let normalized = Self::normalize(filter);
        tracing::debug!(
            backend = self.store.backend_name(),
            txt = %normalized.txt,
            labels = normalized.labels.len(),
            in_stock = ?normalized.in_stock,
            sort_by = %normalized.sort_by,
            sort_dir = normalized.sort_dir.as_str(),
            "Querying toys"
        );
        self.store.query(&normalized).await
    }

    pub async fn get_by_id(&self, id: &ToyId) -> CatalogResult<Toy> {
        self.store.get(id).await
    }

    /// Validate, then create (no id yet) or update (id present)
    pub async fn save(&self, toy: Toy) -> CatalogResult<Toy> {
        self.validation.validate(&toy)?;
        if toy.is_persisted() {
            self.store.update(toy).await
        } else {
            self.store.create(toy).await
        }
    }

    pub async fn remove(&self, id: &ToyId) -> CatalogResult<()> {
        self.store.delete(id).await
    }

    /// Blank form values
    pub fn empty_toy() -> Toy {
        Toy::default()
    }

    /// Demo toy: three lorem words, price 100–900, one random label,
    /// 50% in stock, stamped now. No id; the store assigns it.
    pub fn random_toy() -> Toy {
        let label_idx = random_int_inclusive(0, Label::ALL.len() as i64 - 1) as usize;
        let label = Label::ALL.get(label_idx).copied().unwrap_or(Label::Art);
        Toy {
            id: None,
            name: make_lorem(3),
            price: Some(random_int_inclusive(100, 900) as f64),
            in_stock: random_int_inclusive(0, 1) == 1,
            img_url: None,
            labels: [label].into_iter().collect(),
            created_at: Some(Utc::now()),
        }
    }

    pub fn default_filter() -> FilterBy {
        FilterBy::default()
    }

    /// Random palette colour
    pub fn toy_color() -> &'static str {
        let idx = random_int_inclusive(0, TOY_COLORS.len() as i64 - 1) as usize;
        TOY_COLORS.get(idx).copied().unwrap_or(TOY_COLORS[0])
    }

    /// The label vocabulary, in display order
    pub fn labels() -> &'static [Label] {
        &Label::ALL
    }

    fn normalize(filter: &FilterBy) -> FilterBy {
        let mut normalized = filter.clone();
        let trimmed = normalized.txt.trim();
        if trimmed.len() != normalized.txt.len() {
            normalized.txt = trimmed.to_string();
        }
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::CatalogError;
    use crate::storage::LocalToyStore;

    fn service() -> CatalogService {
        CatalogService::new(Arc::new(LocalToyStore::new()))
    }

    #[test]
    fn test_random_toy_shape() {
        for _ in 0..50 {
            let toy = CatalogService::random_toy();
            assert!(toy.id.is_none());
            assert_eq!(toy.name.split(' ').count(), 3);
            let price = toy.price.unwrap();
            assert!((100.0..=900.0).contains(&price));
            assert_eq!(toy.labels.len(), 1);
            assert!(toy.created_at.is_some());
        }
    }

    #[test]
    fn test_empty_toy_and_default_filter() {
        let toy = CatalogService::empty_toy();
        assert_eq!(toy.name, "");
        assert_eq!(toy.price, None);
        assert!(!toy.in_stock);
        assert!(toy.labels.is_empty());
        assert_eq!(CatalogService::default_filter(), FilterBy::default());
    }

    #[test]
    fn test_toy_color_comes_from_palette() {
        for _ in 0..30 {
            assert!(TOY_COLORS.contains(&CatalogService::toy_color()));
        }
        assert_eq!(CatalogService::labels().len(), 8);
    }

    #[tokio::test]
    async fn test_save_creates_then_updates() {
        let catalog = service();
        let created = catalog.save(Toy::new("Teddy", 50.0)).await.unwrap();
        assert!(created.is_persisted());

        let mut edited = created.clone();
        edited.price = Some(75.0);
        let updated = catalog.save(edited).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.price, Some(75.0));

        let all = catalog.query(&FilterBy::default()).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_save_rejects_invalid_toy_before_store() {
        let catalog = service();
        let err = catalog.save(Toy::new("X", 50.0)).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert!(catalog.query(&FilterBy::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_trims_search_text() {
        let catalog = service();
        catalog.save(Toy::new("Teddy bear", 50.0)).await.unwrap();
        let found = catalog
            .query(&FilterBy::default().with_txt("  bear  "))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_random_toys_are_saveable() {
        let catalog = service();
        for _ in 0..10 {
            catalog.save(CatalogService::random_toy()).await.unwrap();
        }
        assert_eq!(catalog.query(&FilterBy::default()).await.unwrap().len(), 10);
    }
}
