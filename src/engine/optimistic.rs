//! Reversible local removals used by optimistic deletes
//!
//! Several deletes can be in flight at once. Each removal remembers the
//! index its toy had in the list as it stood with every pending removal
//! still in place, so rollbacks land in the original order regardless of
//! which request resolves first.

use crate::core::toy::{Toy, ToyId};

/// A toy taken out of the rendered list
#[derive(Debug, Clone, PartialEq)]
pub struct OptimisticRemoval {
    toy: Toy,
    index: usize,
}

impl OptimisticRemoval {
    pub fn toy(&self) -> &Toy {
        &self.toy
    }

    /// Position in the list with all pending removals reinserted
    pub fn index(&self) -> usize {
        self.index
    }

    fn is(&self, id: &ToyId) -> bool {
        self.toy.id.as_ref() == Some(id)
    }
}

/// Removals that are awaiting the backend, ordered by index
#[derive(Debug, Clone, Default)]
pub struct PendingRemovals {
    removals: Vec<OptimisticRemoval>,
}

impl PendingRemovals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.removals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.removals.is_empty()
    }

    pub fn contains(&self, id: &ToyId) -> bool {
        self.removals.iter().any(|removal| removal.is(id))
    }

    /// Remove the toy with `id` from `toys` and hold on to it.
    /// `None` when it is not listed.
    pub fn apply(&mut self, toys: &mut Vec<Toy>, id: &ToyId) -> Option<&OptimisticRemoval> {
        let position = toys.iter().position(|toy| toy.id.as_ref() == Some(id))?;

        // Translate to the full list by stepping over earlier removals
        let mut index = position;
        for removal in &self.removals {
            if removal.index <= index {
                index += 1;
            } else {
                break;
            }
        }

        let toy = toys.remove(position);
        let slot = self.removals.partition_point(|removal| removal.index < index);
        self.removals.insert(slot, OptimisticRemoval { toy, index });
        self.removals.get(slot)
    }

    /// Put the toy back where it was. Returns `false`, leaving `toys`
    /// untouched, when the removal is unknown or the toy is already listed.
    pub fn undo(&mut self, toys: &mut Vec<Toy>, id: &ToyId) -> bool {
        let Some(slot) = self.removals.iter().position(|removal| removal.is(id)) else {
            return false;
        };
        let removal = self.removals.remove(slot);
        if toys.iter().any(|toy| toy.id.as_ref() == Some(id)) {
            return false;
        }

        // Removals still pending before this one are absent from `toys`
        let position = (removal.index - slot).min(toys.len());
        toys.insert(position, removal.toy);
        true
    }

    /// The backend confirmed the removal. Later indices close the gap.
    pub fn commit(&mut self, id: &ToyId) -> Option<OptimisticRemoval> {
        let slot = self.removals.iter().position(|removal| removal.is(id))?;
        let removal = self.removals.remove(slot);
        for later in &mut self.removals[slot..] {
            later.index -= 1;
        }
        Some(removal)
    }

    /// Forget every removal. Used when the list is replaced wholesale.
    pub fn clear(&mut self) {
        self.removals.clear();
    }
}
