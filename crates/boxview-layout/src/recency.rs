#![forbid(unsafe_code)]

//! Recency-ordered history of touched cells.
//!
//! [`RecencyHistory`] is an ordered set: each cell appears at most once and
//! touching it again moves it to the newest end.
//!
//! # Representation
//!
//! ```text
//! entries: [(a,0) (b,1) (a,2) (c,3)]     live: {a→2, b→1, c→3}
//!            ^^^^^ stale: live[a] != 0
//! logical order (oldest → newest): b, a, c
//! ```
//!
//! Moving a cell to the end appends a new stamped entry instead of searching
//! the queue; the superseded entry is skipped on read and dropped by the
//! next compaction. `touch` and `remove` are O(1) amortized.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::grid::CellId;

/// Compaction runs once stale entries outnumber live ones by this margin.
const COMPACT_SLACK: usize = 16;

/// Deduplicated, recency-ordered cell history (oldest first).
#[derive(Debug, Clone, Default)]
pub struct RecencyHistory {
    /// Append-only log of `(cell, stamp)`; may hold superseded entries.
    entries: VecDeque<(CellId, u64)>,
    /// Current stamp of every live cell.
    live: FxHashMap<CellId, u64>,
    next_stamp: u64,
    /// Maximum number of live cells (0 = unbounded).
    capacity: usize,
}

impl RecencyHistory {
    /// Create an unbounded history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history that forgets its oldest cell beyond `capacity`
    /// entries. A capacity of 0 means unbounded.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Mark `cell` as the most recently touched.
    pub fn touch(&mut self, cell: CellId) {
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        self.live.insert(cell, stamp);
        self.entries.push_back((cell, stamp));
        self.enforce_capacity();
        self.maybe_compact();
    }

    /// Forget `cell`. Returns `true` if it was present.
    pub fn remove(&mut self, cell: CellId) -> bool {
        let removed = self.live.remove(&cell).is_some();
        if removed {
            self.maybe_compact();
        }
        removed
    }

    /// Keep only the cells for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(CellId) -> bool) {
        let before = self.live.len();
        self.live.retain(|cell, _| keep(*cell));
        if self.live.len() != before {
            self.maybe_compact();
        }
    }

    /// Up to `n` most recently touched cells, oldest of them first.
    #[must_use]
    pub fn most_recent(&self, n: usize) -> Vec<CellId> {
        let mut picked: Vec<CellId> = self
            .entries
            .iter()
            .rev()
            .filter(|entry| self.is_current(entry))
            .map(|(cell, _)| *cell)
            .take(n)
            .collect();
        picked.reverse();
        picked
    }

    /// All cells, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = CellId> + '_ {
        self.entries
            .iter()
            .filter(|entry| self.is_current(entry))
            .map(|(cell, _)| *cell)
    }

    /// The most recently touched cell.
    #[must_use]
    pub fn newest(&self) -> Option<CellId> {
        self.most_recent(1).first().copied()
    }

    #[must_use]
    pub fn contains(&self, cell: CellId) -> bool {
        self.live.contains_key(&cell)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Configured capacity (0 = unbounded).
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.live.clear();
    }

    fn is_current(&self, (cell, stamp): &(CellId, u64)) -> bool {
        self.live.get(cell) == Some(stamp)
    }

    fn enforce_capacity(&mut self) {
        if self.capacity == 0 {
            return;
        }
        while self.live.len() > self.capacity {
            let Some(entry) = self.entries.pop_front() else {
                break;
            };
            if self.is_current(&entry) {
                self.live.remove(&entry.0);
            }
        }
    }

    fn maybe_compact(&mut self) {
        if self.entries.len() <= self.live.len() * 2 + COMPACT_SLACK {
            return;
        }
        let live = &self.live;
        self.entries
            .retain(|(cell, stamp)| live.get(cell) == Some(stamp));
    }

    #[cfg(test)]
    fn raw_len(&self) -> usize {
        self.entries.len()
    }
}
