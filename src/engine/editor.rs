//! Debounced filter form driver
//!
//! Edits land in the draft immediately and are committed to the engine
//! once no further edit arrives for the quiet window. When the engine's
//! committed filter changes for another reason, the draft follows it
//! straight away.

use super::debounce::{DebounceState, FilterDebouncer};
use super::{CatalogEngine, CatalogSnapshot, Outcome};
use crate::core::filter::FilterBy;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

struct Shared {
    debouncer: Mutex<FilterDebouncer>,
    wake: Notify,
    draft: watch::Sender<FilterBy>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, FilterDebouncer> {
        self.debouncer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Handle to the background task. Dropping it stops the task.
pub struct FilterEditor {
    shared: Arc<Shared>,
    task: JoinHandle<()>,
}

impl FilterEditor {
    /// Spawn the driver on the current runtime, starting from the engine's
    /// committed filter
    pub fn spawn(engine: Arc<CatalogEngine>, quiet: Duration) -> Self {
        let committed = engine.filter();
        let (draft, _) = watch::channel(committed.clone());
        let shared = Arc::new(Shared {
            debouncer: Mutex::new(FilterDebouncer::new(committed, quiet)),
            wake: Notify::new(),
            draft,
        });
        let snapshots = engine.subscribe();
        let task = tokio::spawn(run(engine, snapshots, Arc::clone(&shared)));
        Self { shared, task }
    }

    /// Replace the draft
    pub fn edit(&self, draft: FilterBy) {
        self.shared.lock().edit(draft.clone(), Instant::now());
        self.shared.draft.send_replace(draft);
        self.shared.wake.notify_one();
    }

    /// Modify the current draft in place
    pub fn update(&self, change: impl FnOnce(&mut FilterBy)) {
        let mut draft = self.draft();
        change(&mut draft);
        self.edit(draft);
    }

    pub fn draft(&self) -> FilterBy {
        self.shared.lock().draft().clone()
    }

    pub fn state(&self) -> DebounceState {
        self.shared.lock().state()
    }

    /// Draft changes, including resyncs after external commits
    pub fn subscribe_draft(&self) -> watch::Receiver<FilterBy> {
        self.shared.draft.subscribe()
    }
}

impl Drop for FilterEditor {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    engine: Arc<CatalogEngine>,
    mut snapshots: watch::Receiver<CatalogSnapshot>,
    shared: Arc<Shared>,
) {
    loop {
        let deadline = shared.lock().deadline();
        tokio::select! {
            _ = shared.wake.notified() => {}
            _ = sleep_until(deadline) => {
                let next = shared.lock().poll(Instant::now());
                if let Some(filter) = next {
                    commit(&engine, &shared, filter).await;
                }
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let committed = snapshots.borrow_and_update().filter.clone();
                let resynced = shared.lock().external_change(committed.clone());
                if resynced {
                    tracing::debug!(txt = %committed.txt, "Filter draft resynced");
                    shared.draft.send_replace(committed);
                }
            }
        }
    }
}

async fn commit(engine: &CatalogEngine, shared: &Shared, filter: FilterBy) {
    tracing::debug!(txt = %filter.txt, "Committing filter");
    let result = engine.set_filter(filter.clone()).await;
    let mut debouncer = shared.lock();
    match result {
        Ok(Outcome::Loaded { .. }) => debouncer.commit_succeeded(filter),
        Ok(_) => debouncer.commit_discarded(),
        // The engine already notified the user
        Err(_) => debouncer.commit_failed(),
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
