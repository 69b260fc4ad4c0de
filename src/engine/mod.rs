//! Catalog state container
//!
//! `CatalogEngine` owns the committed filter and the rendered toy list. It
//! serializes every mutation through [`Command`]s and publishes a fresh
//! [`CatalogSnapshot`] on a `watch` channel after each one.
//!
//! Reloads are tagged with a generation number. Only the result of the most
//! recently issued reload is ever applied, so a slow response to an older
//! filter can never overwrite a newer one.

pub mod debounce;
pub mod editor;
pub mod optimistic;

pub use debounce::{DebounceState, FilterDebouncer};
pub use editor::FilterEditor;
pub use optimistic::{OptimisticRemoval, PendingRemovals};

use crate::catalog::CatalogService;
use crate::core::error::CatalogResult;
use crate::core::events::{Notification, NotificationBus};
use crate::core::filter::{FilterBy, SortBy};
use crate::core::toy::{Toy, ToyId};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// What observers see
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogSnapshot {
    /// Last successfully committed filter
    pub filter: FilterBy,
    /// Toys as the adapter returned them for `filter`, minus optimistic removals
    pub toys: Vec<Toy>,
    /// A reload is in flight
    pub is_loading: bool,
}

/// Mutations accepted by the engine
#[derive(Debug, Clone)]
pub enum Command {
    /// Commit a new filter and reload under it
    SetFilter(FilterBy),
    /// Reload under the committed filter
    Reload,
    /// Sort-column click
    ToggleSort(SortBy),
    /// Optimistically remove a toy
    DeleteToy(ToyId),
    /// Create or update a toy
    SaveToy(Toy),
}

/// Result of a dispatched command
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A reload was applied with this many toys
    Loaded { count: usize },
    /// A reload resolved after a newer one was issued and was dropped
    Discarded,
    Deleted(ToyId),
    Saved(Toy),
    /// Nothing to do (e.g. deleting a toy that is not listed)
    Noop,
}

struct EngineState {
    filter: FilterBy,
    toys: Vec<Toy>,
    /// Latest issued reload
    generation: u64,
    loading: bool,
    /// Deletes awaiting the backend
    deleting: HashSet<ToyId>,
    /// Optimistic removals from the current `toys`, dropped when a reload
    /// replaces the list
    removals: PendingRemovals,
}

pub struct CatalogEngine {
    catalog: CatalogService,
    state: Mutex<EngineState>,
    snapshot: watch::Sender<CatalogSnapshot>,
    notifications: NotificationBus,
}

impl CatalogEngine {
    pub fn new(catalog: CatalogService) -> Self {
        Self::with_filter(catalog, FilterBy::default())
    }

    /// Start with `filter` as the committed filter. Nothing is loaded until
    /// the first [`reload`](Self::reload).
    pub fn with_filter(catalog: CatalogService, filter: FilterBy) -> Self {
        let (snapshot, _) = watch::channel(CatalogSnapshot {
            filter: filter.clone(),
            toys: Vec::new(),
            is_loading: false,
        });
        Self {
            catalog,
            state: Mutex::new(EngineState {
                filter,
                toys: Vec::new(),
                generation: 0,
                loading: false,
                deleting: HashSet::new(),
                removals: PendingRemovals::new(),
            }),
            snapshot,
            notifications: NotificationBus::default(),
        }
    }

    /// Publish user notifications on a shared bus
    pub fn with_notifications(mut self, notifications: NotificationBus) -> Self {
        self.notifications = notifications;
        self
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    pub fn notifications(&self) -> &NotificationBus {
        &self.notifications
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn filter(&self) -> FilterBy {
        self.lock_state().filter.clone()
    }

    pub fn toys(&self) -> Vec<Toy> {
        self.lock_state().toys.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CatalogSnapshot> {
        self.snapshot.subscribe()
    }

    /// Snapshot stream; yields the current value first
    pub fn subscribe_stream(&self) -> WatchStream<CatalogSnapshot> {
        WatchStream::new(self.snapshot.subscribe())
    }

    pub async fn dispatch(&self, command: Command) -> CatalogResult<Outcome> {
        match command {
            Command::SetFilter(filter) => self.set_filter(filter).await,
            Command::Reload => self.reload().await,
            Command::ToggleSort(field) => self.toggle_sort(field).await,
            Command::DeleteToy(id) => self.delete_toy(&id).await,
            Command::SaveToy(toy) => self.save_toy(toy).await,
        }
    }

    /// Commit `filter` and reload under it. On failure the committed
    /// filter stays what it was.
    pub async fn set_filter(&self, filter: FilterBy) -> CatalogResult<Outcome> {
        self.load(filter).await
    }

    pub async fn reload(&self) -> CatalogResult<Outcome> {
        let filter = self.filter();
        self.load(filter).await
    }

    pub async fn toggle_sort(&self, field: SortBy) -> CatalogResult<Outcome> {
        let mut filter = self.filter();
        filter.toggle_sort(field);
        self.load(filter).await
    }

    /// Remove the toy from the list right away, then ask the adapter.
    /// If the adapter fails the toy goes back where it was.
    pub async fn delete_toy(&self, id: &ToyId) -> CatalogResult<Outcome> {
        {
            let mut state = self.lock_state();
            if state.deleting.contains(id) {
                tracing::debug!(toy_id = %id, "Delete already in flight");
                return Ok(Outcome::Noop);
            }
            let EngineState { toys, removals, .. } = &mut *state;
            if removals.apply(toys, id).is_none() {
                tracing::debug!(toy_id = %id, "Delete of unlisted toy ignored");
                return Ok(Outcome::Noop);
            }
            state.deleting.insert(id.clone());
            self.publish(&state);
        }

        let result = self.catalog.remove(id).await;

        let mut state = self.lock_state();
        state.deleting.remove(id);
        match result {
            Ok(()) => {
                state.removals.commit(id);
                // A reload applied meanwhile may have listed the toy again
                let before = state.toys.len();
                state.toys.retain(|toy| toy.id.as_ref() != Some(id));
                if state.toys.len() != before {
                    self.publish(&state);
                }
                drop(state);
                tracing::info!(toy_id = %id, "Toy removed");
                self.notify(Notification::success("Toy removed"));
                Ok(Outcome::Deleted(id.clone()))
            }
            Err(err) => {
                // A reload applied meanwhile already reflects the backend
                let EngineState { toys, removals, .. } = &mut *state;
                if removals.undo(toys, id) {
                    self.publish(&state);
                }
                drop(state);
                tracing::warn!(toy_id = %id, error = %err, "Delete failed, toy restored");
                self.notify(Notification::error("Cannot remove toy", &err));
                Err(err)
            }
        }
    }

    /// Create or update through the catalog. Updated toys are replaced in
    /// place; created toys are appended.
    pub async fn save_toy(&self, toy: Toy) -> CatalogResult<Outcome> {
        let is_update = toy.is_persisted();
        match self.catalog.save(toy).await {
            Ok(saved) => {
                {
                    let mut state = self.lock_state();
                    let position = state
                        .toys
                        .iter()
                        .position(|listed| saved.id.is_some() && listed.id == saved.id);
                    match position {
                        Some(idx) => state.toys[idx] = saved.clone(),
                        None if !is_update => state.toys.push(saved.clone()),
                        None => {}
                    }
                    self.publish(&state);
                }
                let verb = if is_update { "updated" } else { "added" };
                tracing::info!(toy_id = ?saved.id, name = %saved.name, "Toy {}", verb);
                self.notify(Notification::success(format!(
                    "Toy {} (name: {})",
                    verb, saved.name
                )));
                Ok(Outcome::Saved(saved))
            }
            Err(err) => {
                let action = if is_update { "update" } else { "add" };
                tracing::warn!(error = %err, "Cannot {} toy", action);
                self.notify(Notification::error(format!("Cannot {} toy", action), &err));
                Err(err)
            }
        }
    }

    async fn load(&self, filter: FilterBy) -> CatalogResult<Outcome> {
        let generation = {
            let mut state = self.lock_state();
            state.generation += 1;
            state.loading = true;
            self.publish(&state);
            state.generation
        };

        let result = self.catalog.query(&filter).await;

        let mut state = self.lock_state();
        if generation != state.generation {
            match &result {
                Ok(toys) => tracing::debug!(
                    generation,
                    latest = state.generation,
                    count = toys.len(),
                    "Discarding stale reload"
                ),
                Err(err) => tracing::warn!(
                    generation,
                    latest = state.generation,
                    error = %err,
                    "Stale reload failed"
                ),
            }
            return Ok(Outcome::Discarded);
        }

        state.loading = false;
        match result {
            Ok(toys) => {
                let count = toys.len();
                state.filter = filter;
                state.toys = toys;
                state.removals.clear();
                self.publish(&state);
                tracing::debug!(generation, count, "Reload applied");
                Ok(Outcome::Loaded { count })
            }
            Err(err) => {
                self.publish(&state);
                drop(state);
                tracing::warn!(generation, error = %err, "Cannot load toys");
                self.notify(Notification::error("Cannot load toys", &err));
                Err(err)
            }
        }
    }

    fn publish(&self, state: &EngineState) {
        self.snapshot.send_replace(CatalogSnapshot {
            filter: state.filter.clone(),
            toys: state.toys.clone(),
            is_loading: state.loading,
        });
    }

    fn notify(&self, notification: Notification) {
        let delivered = self.notifications.publish(notification);
        if delivered == 0 {
            tracing::trace!("Notification published with no subscribers");
        }
    }

    // State is consistent between statements, so a poisoned lock is still usable
    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
