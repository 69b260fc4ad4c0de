//! Debounced filter commit state machine
//!
//! ```text
//!          edit                 quiet window elapsed          success
//! Idle ──────────▶ Pending ───────────────────────▶ Committing ───────▶ Idle
//!   ▲                 │ ▲ edit (deadline moves)          │
//!   │                 └─┘                                │ failure
//!   │  external change (any state)                       ▼
//!   └──────────────────────────────────────────── CommitFailed
//! ```
//!
//! The machine holds no timers. Callers pass the current time in, which
//! keeps ordering deterministic and lets tests drive it with a paused clock.

use crate::core::filter::FilterBy;
use std::time::Duration;
use tokio::time::Instant;

/// Where the debouncer is in its commit cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// Draft equals the committed filter, or nothing is scheduled
    Idle,
    /// Draft differs; commit when `deadline` passes without further edits
    Pending { deadline: Instant },
    /// Draft handed out for commit, result not yet known
    Committing,
    /// Last commit failed; the draft is kept, the committed filter unchanged
    CommitFailed,
}

#[derive(Debug, Clone)]
pub struct FilterDebouncer {
    committed: FilterBy,
    draft: FilterBy,
    state: DebounceState,
    quiet: Duration,
}

impl FilterDebouncer {
    pub fn new(committed: FilterBy, quiet: Duration) -> Self {
        Self {
            draft: committed.clone(),
            committed,
            state: DebounceState::Idle,
            quiet,
        }
    }

    /// What the filter form shows
    pub fn draft(&self) -> &FilterBy {
        &self.draft
    }

    /// Last filter known to be committed to the engine
    pub fn committed(&self) -> &FilterBy {
        &self.committed
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Record a user edit. The draft changes immediately; the commit is
    /// pushed back to `now + quiet`.
    pub fn edit(&mut self, draft: FilterBy, now: Instant) {
        self.draft = draft;
        self.state = DebounceState::Pending {
            deadline: now + self.quiet,
        };
    }

    /// When the next commit is due, if one is scheduled
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            DebounceState::Pending { deadline } => Some(deadline),
            _ => None,
        }
    }

    /// Take the draft for commit once the quiet window has elapsed.
    ///
    /// A draft that ended up equal to the committed filter is settled
    /// without a commit.
    pub fn poll(&mut self, now: Instant) -> Option<FilterBy> {
        match self.state {
            DebounceState::Pending { deadline } if now >= deadline => {
                if self.draft == self.committed {
                    self.state = DebounceState::Idle;
                    None
                } else {
                    self.state = DebounceState::Committing;
                    Some(self.draft.clone())
                }
            }
            _ => None,
        }
    }

    /// The engine accepted `filter`. Edits made meanwhile stay pending.
    pub fn commit_succeeded(&mut self, filter: FilterBy) {
        self.committed = filter;
        if self.state == DebounceState::Committing {
            self.state = DebounceState::Idle;
        }
    }

    /// The commit failed; keep the draft so the user can retry by editing
    pub fn commit_failed(&mut self) {
        if self.state == DebounceState::Committing {
            self.state = DebounceState::CommitFailed;
        }
    }

    /// The commit was superseded by a newer reload before it resolved
    pub fn commit_discarded(&mut self) {
        if self.state == DebounceState::Committing {
            self.state = DebounceState::Idle;
        }
    }

    /// The committed filter changed from outside (e.g. a sort-column click).
    /// Resynchronizes the draft immediately, dropping any pending edit.
    /// Returns `false` when `committed` is the filter already known.
    pub fn external_change(&mut self, committed: FilterBy) -> bool {
        if committed == self.committed {
            return false;
        }
        self.draft = committed.clone();
        self.committed = committed;
        self.state = DebounceState::Idle;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::{SortBy, SortDir};

    const QUIET: Duration = Duration::from_millis(300);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_rapid_edits_collapse_into_one_commit() {
        let start = Instant::now();
        let mut debouncer = FilterDebouncer::new(FilterBy::default(), QUIET);

        let mut commits = Vec::new();
        for (i, txt) in ["b", "be", "bea", "bear", "bears"].iter().enumerate() {
            let now = start + ms(50 * i as u64);
            debouncer.edit(FilterBy::default().with_txt(*txt), now);
            assert_eq!(debouncer.draft().txt, *txt);
            commits.extend(debouncer.poll(now));
        }
        assert!(commits.is_empty());

        // Quiet window is measured from the last edit (t = 200ms)
        assert!(debouncer.poll(start + ms(450)).is_none());
        commits.extend(debouncer.poll(start + ms(500)));
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].txt, "bears");
        assert_eq!(debouncer.state(), DebounceState::Committing);
        assert!(debouncer.poll(start + ms(900)).is_none());
    }

    #[test]
    fn test_success_commits_draft() {
        let start = Instant::now();
        let mut debouncer = FilterDebouncer::new(FilterBy::default(), QUIET);
        debouncer.edit(FilterBy::default().with_txt("car"), start);
        let filter = debouncer.poll(start + QUIET).unwrap();

        debouncer.commit_succeeded(filter.clone());
        assert_eq!(debouncer.state(), DebounceState::Idle);
        assert_eq!(debouncer.committed(), &filter);
    }

    #[test]
    fn test_failure_keeps_draft_and_committed() {
        let start = Instant::now();
        let mut debouncer = FilterDebouncer::new(FilterBy::default(), QUIET);
        debouncer.edit(FilterBy::default().with_txt("car"), start);
        debouncer.poll(start + QUIET).unwrap();

        debouncer.commit_failed();
        assert_eq!(debouncer.state(), DebounceState::CommitFailed);
        assert_eq!(debouncer.draft().txt, "car");
        assert_eq!(debouncer.committed(), &FilterBy::default());

        // Editing again schedules a fresh commit
        debouncer.edit(FilterBy::default().with_txt("cars"), start + ms(1000));
        assert_eq!(debouncer.deadline(), Some(start + ms(1300)));
    }

    #[test]
    fn test_edit_during_commit_stays_pending() {
        let start = Instant::now();
        let mut debouncer = FilterDebouncer::new(FilterBy::default(), QUIET);
        debouncer.edit(FilterBy::default().with_txt("a"), start);
        let first = debouncer.poll(start + QUIET).unwrap();

        debouncer.edit(FilterBy::default().with_txt("ab"), start + ms(310));
        debouncer.commit_succeeded(first);
        assert!(matches!(debouncer.state(), DebounceState::Pending { .. }));
        assert_eq!(
            debouncer.poll(start + ms(610)).map(|f| f.txt),
            Some("ab".to_string())
        );
    }

    #[test]
    fn test_reverted_draft_does_not_commit() {
        let start = Instant::now();
        let mut debouncer = FilterDebouncer::new(FilterBy::default(), QUIET);
        debouncer.edit(FilterBy::default().with_txt("x"), start);
        debouncer.edit(FilterBy::default(), start + ms(100));
        assert!(debouncer.poll(start + ms(400)).is_none());
        assert_eq!(debouncer.state(), DebounceState::Idle);
    }

    #[test]
    fn test_external_change_resyncs_immediately() {
        let start = Instant::now();
        let mut debouncer = FilterDebouncer::new(FilterBy::default(), QUIET);
        debouncer.edit(FilterBy::default().with_txt("half typed"), start);

        let sorted = FilterBy::default().with_sort(SortBy::Price, SortDir::Desc);
        assert!(debouncer.external_change(sorted.clone()));
        assert_eq!(debouncer.draft(), &sorted);
        assert_eq!(debouncer.state(), DebounceState::Idle);
        assert!(debouncer.poll(start + ms(1000)).is_none());

        // Seeing the same committed filter again is not a change
        assert!(!debouncer.external_change(sorted));
    }

    #[test]
    fn test_discarded_commit_returns_to_idle() {
        let start = Instant::now();
        let mut debouncer = FilterDebouncer::new(FilterBy::default(), QUIET);
        debouncer.edit(FilterBy::default().with_txt("x"), start);
        debouncer.poll(start + QUIET).unwrap();
        debouncer.commit_discarded();
        assert_eq!(debouncer.state(), DebounceState::Idle);
        assert_eq!(debouncer.committed(), &FilterBy::default());
    }
}
