//! Macro-generated test suite for `ToyStore` contract validation.
//!
//! The `toy_store_tests!` macro generates a test module that validates any
//! `ToyStore` implementation against the full contract: CRUD, filtering,
//! sorting, error mapping and concurrent access.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use mister_toy::storage::LocalToyStore;
//!
//! toy_store_tests!(LocalToyStore::new());
//! ```
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_create_assigns_id` - create returns the toy with a fresh id
//! - `test_get_nonexistent` - unknown id is `NotFound`
//! - `test_query_empty` - empty store returns empty vec
//! - `test_update_existing` - changed fields persist
//! - `test_update_nonexistent` - unknown id is `NotFound`
//! - `test_delete_existing` - delete then get is `NotFound`
//! - `test_delete_nonexistent` - unknown id is `NotFound`
//!
//! ## Query
//! - `test_query_default_sorts_by_name` - case-insensitive name order
//! - `test_query_txt_is_case_insensitive`
//! - `test_query_labels_match_any`
//! - `test_query_in_stock_tristate`
//! - `test_query_sort_price_desc`
//! - `test_query_sort_created_at`
//! - `test_query_combined_predicates`
//!
//! ## Edge Cases
//! - `test_concurrent_creates` - parallel creates from spawned tasks

/// Generate a full `ToyStore` conformance test suite.
///
/// `$factory` must be an expression that evaluates to an empty store
/// implementing `ToyStore + Clone + 'static`. It is re-evaluated for each
/// test to ensure isolation and may contain `.await`.
macro_rules! toy_store_tests {
    ($factory:expr) => {
        mod toy_store_contract_tests {
            use super::*;
            use mister_toy::core::error::CatalogError;
            use mister_toy::core::filter::{FilterBy, SortBy, SortDir};
            use mister_toy::core::service::ToyStore;
            use mister_toy::core::toy::{Label, Toy, ToyId};

            async fn seeded<S: ToyStore>(store: &S) -> Vec<Toy> {
                let mut created = Vec::new();
                for toy in sample_catalog() {
                    created.push(store.create(toy).await.unwrap());
                }
                created
            }

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_create_assigns_id() {
                let store = $factory;
                let toy = sample_toy("Teddy Bear", 120.0, true, &[Label::Baby]);

                let created = store.create(toy).await.unwrap();
                let id = created.id.clone().expect("created toy should have an id");
                assert_eq!(created.name, "Teddy Bear");
                assert_eq!(created.price, Some(120.0));
                assert!(created.in_stock);
                assert!(created.labels.contains(&Label::Baby));
                assert!(created.created_at.is_some(), "createdAt should be stamped");

                let fetched = store.get(&id).await.unwrap();
                assert_eq!(fetched, created);
            }

            #[tokio::test]
            async fn test_create_ignores_client_id() {
                let store = $factory;
                let mut toy = sample_toy("Kite", 60.0, true, &[]);
                toy.id = Some(ToyId::new("client-chosen"));

                let created = store.create(toy).await.unwrap();
                assert_ne!(created.id, Some(ToyId::new("client-chosen")));
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let store = $factory;
                let err = store.get(&ToyId::new("no-such-toy")).await.unwrap_err();
                assert!(err.is_not_found(), "expected NotFound, got {:?}", err);
            }

            #[tokio::test]
            async fn test_query_empty() {
                let store = $factory;
                let all = store.query(&FilterBy::default()).await.unwrap();
                assert!(all.is_empty(), "Query on empty store should return empty vec");
            }

            #[tokio::test]
            async fn test_update_existing() {
                let store = $factory;
                let created = store
                    .create(sample_toy("Kite", 60.0, true, &[Label::Outdoor]))
                    .await
                    .unwrap();

                let mut edited = created.clone();
                edited.name = "Stunt Kite".to_string();
                edited.price = Some(75.0);
                edited.in_stock = false;
                let updated = store.update(edited).await.unwrap();
                assert_eq!(updated.id, created.id);
                assert_eq!(updated.name, "Stunt Kite");

                let id = created.id.clone().unwrap();
                let fetched = store.get(&id).await.unwrap();
                assert_eq!(fetched.name, "Stunt Kite");
                assert_eq!(fetched.price, Some(75.0));
                assert!(!fetched.in_stock);
                assert_eq!(fetched.created_at, created.created_at);
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let store = $factory;
                let mut ghost = sample_toy("Ghost", 10.0, true, &[]);
                ghost.id = Some(ToyId::new("no-such-toy"));

                let err = store.update(ghost).await.unwrap_err();
                assert!(err.is_not_found(), "expected NotFound, got {:?}", err);
            }

            #[tokio::test]
            async fn test_delete_existing() {
                let store = $factory;
                let created = seeded(&store).await;
                let id = created[0].id.clone().unwrap();

                store.delete(&id).await.unwrap();
                assert!(store.get(&id).await.unwrap_err().is_not_found());
                assert_count(&store.query(&FilterBy::default()).await.unwrap(), 4);
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let store = $factory;
                let err = store.delete(&ToyId::new("no-such-toy")).await.unwrap_err();
                assert!(matches!(err, CatalogError::NotFound { .. }));
            }

            // ==================================================================
            // Query
            // ==================================================================

            #[tokio::test]
            async fn test_query_default_sorts_by_name() {
                let store = $factory;
                seeded(&store).await;
                let all = store.query(&FilterBy::default()).await.unwrap();
                assert_names(
                    &all,
                    &["bear puzzle", "Jigsaw", "Kite", "Race Car", "Teddy Bear"],
                );
            }

            #[tokio::test]
            async fn test_query_txt_is_case_insensitive() {
                let store = $factory;
                seeded(&store).await;
                let found = store
                    .query(&FilterBy::default().with_txt("BEAR"))
                    .await
                    .unwrap();
                assert_names(&found, &["bear puzzle", "Teddy Bear"]);
            }

            #[tokio::test]
            async fn test_query_labels_match_any() {
                let store = $factory;
                seeded(&store).await;

                let puzzles = store
                    .query(&FilterBy::default().with_labels([Label::Puzzle]))
                    .await
                    .unwrap();
                assert_names(&puzzles, &["bear puzzle", "Jigsaw"]);

                let either = store
                    .query(&FilterBy::default().with_labels([Label::Puzzle, Label::Outdoor]))
                    .await
                    .unwrap();
                assert_names(&either, &["bear puzzle", "Jigsaw", "Kite"]);
            }

            #[tokio::test]
            async fn test_query_in_stock_tristate() {
                let store = $factory;
                seeded(&store).await;

                let available = store
                    .query(&FilterBy::default().with_in_stock(Some(true)))
                    .await
                    .unwrap();
                assert_names(&available, &["Jigsaw", "Kite", "Teddy Bear"]);

                let sold_out = store
                    .query(&FilterBy::default().with_in_stock(Some(false)))
                    .await
                    .unwrap();
                assert_names(&sold_out, &["bear puzzle", "Race Car"]);

                let all = store
                    .query(&FilterBy::default().with_in_stock(None))
                    .await
                    .unwrap();
                assert_count(&all, 5);
            }

            #[tokio::test]
            async fn test_query_sort_price_desc() {
                let store = $factory;
                seeded(&store).await;
                let sorted = store
                    .query(&FilterBy::default().with_sort(SortBy::Price, SortDir::Desc))
                    .await
                    .unwrap();
                assert_names(
                    &sorted,
                    &["Race Car", "bear puzzle", "Teddy Bear", "Jigsaw", "Kite"],
                );
            }

            #[tokio::test]
            async fn test_query_sort_created_at() {
                let store = $factory;
                seeded(&store).await;
                let sorted = store
                    .query(&FilterBy::default().with_sort(SortBy::CreatedAt, SortDir::Asc))
                    .await
                    .unwrap();
                assert_names(
                    &sorted,
                    &["Race Car", "Kite", "Teddy Bear", "bear puzzle", "Jigsaw"],
                );
            }

            #[tokio::test]
            async fn test_query_combined_predicates() {
                let store = $factory;
                seeded(&store).await;
                let filter = FilterBy::default()
                    .with_txt("bear")
                    .with_in_stock(Some(true))
                    .with_labels([Label::Doll, Label::Puzzle]);
                let found = store.query(&filter).await.unwrap();
                assert_names(&found, &["Teddy Bear"]);
            }

            // ==================================================================
            // Edge case - Concurrent access
            // ==================================================================

            #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
            async fn test_concurrent_creates() {
                let store = $factory;
                let s1 = store.clone();
                let s2 = store.clone();

                let h1 = tokio::spawn(async move {
                    s1.create(sample_toy("Concurrent A", 10.0, true, &[])).await
                });
                let h2 = tokio::spawn(async move {
                    s2.create(sample_toy("Concurrent B", 20.0, true, &[])).await
                });

                let (r1, r2) = tokio::time::timeout(std::time::Duration::from_secs(30), async {
                    tokio::try_join!(h1, h2).unwrap()
                })
                .await
                .expect("Concurrent creates timed out after 30s");

                let a = r1.unwrap();
                let b = r2.unwrap();
                assert_ne!(a.id, b.id);

                let all = store.query(&FilterBy::default()).await.unwrap();
                assert_names(&all, &["Concurrent A", "Concurrent B"]);
            }
        }
    };
}
