#![forbid(unsafe_code)]

//! Old-cell → new-cell remapping across a reshape.
//!
//! Exploding a grid retires the cells the user was looking at and moves
//! their content into freshly allocated cells. [`IdentityMap`] records where
//! each original cell went so that, when the original layout comes back, the
//! content of the migrated cell can be carried home.
//!
//! The map is one-shot: built during one explode, read during the matching
//! unexplode, then reset.

use rustc_hash::FxHashMap;

use crate::grid::CellId;

/// One-to-one mapping from pre-explode cells to the cells they became.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityMap {
    forward: FxHashMap<CellId, CellId>,
    reverse: FxHashMap<CellId, CellId>,
}

impl IdentityMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `old` was migrated into `new`.
    ///
    /// Re-recording either side replaces the earlier pairing so the map
    /// stays one-to-one.
    pub fn record(&mut self, old: CellId, new: CellId) {
        if let Some(previous_new) = self.forward.insert(old, new) {
            self.reverse.remove(&previous_new);
        }
        if let Some(previous_old) = self.reverse.insert(new, old)
            && previous_old != old
        {
            self.forward.remove(&previous_old);
        }
    }

    /// The cell `old` was migrated into.
    #[must_use]
    pub fn migrated_to(&self, old: CellId) -> Option<CellId> {
        self.forward.get(&old).copied()
    }

    /// The pre-explode cell that `new` stands in for.
    #[must_use]
    pub fn origin_of(&self, new: CellId) -> Option<CellId> {
        self.reverse.get(&new).copied()
    }

    /// `(old, new)` pairs in unspecified order.
    pub fn pairs(&self) -> impl Iterator<Item = (CellId, CellId)> + '_ {
        self.forward.iter().map(|(old, new)| (*old, *new))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Forget every pairing.
    pub fn reset(&mut self) {
        self.forward.clear();
        self.reverse.clear();
    }
}
