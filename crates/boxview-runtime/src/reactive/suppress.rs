#![forbid(unsafe_code)]

//! Scoped suppression of change handlers.
//!
//! A tool that rebuilds the grid it observes would otherwise receive its own
//! change notifications halfway through the rebuild. The tool holds a
//! [`SuppressGate`]; its listeners check [`SuppressGate::is_suppressed`] and
//! return early while any [`SuppressGuard`] is alive.
//!
//! ```ignore
//! let gate = SuppressGate::new();
//! {
//!     let _quiet = gate.suppress();
//!     grid.reshape(1, 3)?; // listeners see is_suppressed() == true
//! } // released here, also on `?` and on unwind
//! ```
//!
//! # Invariants
//!
//! 1. Guards nest: the gate opens only when the last guard drops.
//! 2. A guard never outlives the scope that created it, so suppression can
//!    not leak past a failed or panicking mutation.

use std::cell::Cell;
use std::rc::Rc;

/// Shared suppression flag. Clones observe the same depth.
#[derive(Clone, Default)]
pub struct SuppressGate {
    depth: Rc<Cell<u32>>,
}

impl std::fmt::Debug for SuppressGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuppressGate")
            .field("depth", &self.depth.get())
            .finish()
    }
}

impl SuppressGate {
    /// Create an open gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the gate until the returned guard drops.
    #[must_use = "suppression ends as soon as the guard is dropped"]
    pub fn suppress(&self) -> SuppressGuard {
        self.depth.set(self.depth.get() + 1);
        tracing::trace!(message = "suppress.enter", depth = self.depth.get());
        SuppressGuard {
            depth: Rc::clone(&self.depth),
        }
    }

    /// True while at least one guard is alive.
    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        self.depth.get() > 0
    }

    /// Current nesting depth.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth.get()
    }
}

/// RAII guard returned by [`SuppressGate::suppress`].
pub struct SuppressGuard {
    depth: Rc<Cell<u32>>,
}

impl Drop for SuppressGuard {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
        tracing::trace!(message = "suppress.exit", depth = self.depth.get());
    }
}

impl std::fmt::Debug for SuppressGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuppressGuard")
            .field("depth", &self.depth.get())
            .finish()
    }
}
