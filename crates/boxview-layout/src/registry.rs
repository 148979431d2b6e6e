#![forbid(unsafe_code)]

//! Per-viewer lookup of explode state.
//!
//! Other tools need to know whether a viewer is exploded without holding its
//! controller. The viewer's composition root registers each controller's
//! [`checked`](crate::ExplodeController::checked) observable here under the
//! viewer's id; queries read the observable and never borrow the controller.

use std::fmt;

use boxview_runtime::Observable;
use rustc_hash::FxHashMap;

use crate::explode::ExplodeController;
use crate::grid::ImageGrid;

/// Identifies one viewer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewerId(u64);

impl ViewerId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "viewer#{}", self.0)
    }
}

/// Explode state of every registered viewer.
#[derive(Debug, Default)]
pub struct ExplodeRegistry {
    viewers: FxHashMap<ViewerId, Observable<bool>>,
}

impl ExplodeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `viewer`'s controller.
    ///
    /// Returns `false` and keeps the existing entry if the viewer already
    /// has one: a viewer owns at most one explode tool.
    pub fn register<G: ImageGrid + 'static>(
        &mut self,
        viewer: ViewerId,
        controller: &ExplodeController<G>,
    ) -> bool {
        self.register_state(viewer, controller.checked())
    }

    /// Register a raw checked-state handle for `viewer`.
    pub fn register_state(&mut self, viewer: ViewerId, checked: Observable<bool>) -> bool {
        if self.viewers.contains_key(&viewer) {
            tracing::debug!(message = "registry.duplicate", %viewer);
            return false;
        }
        self.viewers.insert(viewer, checked);
        true
    }

    /// Forget `viewer`. Returns `true` if it was registered.
    pub fn unregister(&mut self, viewer: ViewerId) -> bool {
        self.viewers.remove(&viewer).is_some()
    }

    /// Whether `viewer` is currently exploded. Unknown viewers are not.
    #[must_use]
    pub fn is_exploded(&self, viewer: ViewerId) -> bool {
        self.viewers.get(&viewer).is_some_and(Observable::get)
    }

    /// The checked-state handle of `viewer`, for subscribing.
    #[must_use]
    pub fn checked(&self, viewer: ViewerId) -> Option<Observable<bool>> {
        self.viewers.get(&viewer).cloned()
    }

    #[must_use]
    pub fn contains(&self, viewer: ViewerId) -> bool {
        self.viewers.contains_key(&viewer)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.viewers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.viewers.is_empty()
    }
}
