#![forbid(unsafe_code)]

//! The explode/unexplode toggle.
//!
//! Exploding spreads the most recently touched cells of a grid across a
//! single row, one cell per display the grid spans. Unexploding brings the
//! previous layout back, carrying over any content the user changed while
//! exploded. Both directions are recorded as undoable commands.
//!
//! # State machine
//!
//! ```text
//!               explode (enabled, history, displays)
//!  Unexploded ───────────────────────────────────────▶ Exploded
//!      ▲  ◀──────────────── unexplode ─────────────────   │
//!      └────────── cells changed externally (cancel) ─────┘
//! ```
//!
//! # Invariants
//!
//! 1. `is_checked() ⇔ identity non-empty ⇔ unexplode snapshot held`.
//! 2. The controller's own grid mutations never reach its grid listener:
//!    they run while a [`SuppressGuard`](boxview_runtime::SuppressGuard) is
//!    alive, and the guard drops on every exit path.
//! 3. The history is only touched while Unexploded.
//!
//! # Re-entrancy
//!
//! The controller lives in an `Rc<RefCell<_>>`. Callers borrow it mutably to
//! toggle; grid listeners borrow it mutably to react. Grid notifications
//! raised by the controller itself are suppressed, and notifications raised
//! by anyone else arrive while the controller is not borrowed. Subscribers of
//! [`checked`](ExplodeController::checked) and
//! [`enabled`](ExplodeController::enabled) run while the controller is
//! borrowed and must not borrow it again.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use boxview_core::DisplayRegions;
use boxview_runtime::{
    CommandError, CommandHistory, CommandResult, MementoCmd, Observable, Subscription,
    SuppressGate,
};
use rustc_hash::FxHashMap;
use tracing::{debug, info, info_span, trace};

use crate::config::ExplodeConfig;
use crate::eligibility::{UnexplodeCheck, can_explode, check_unexplode, is_enabled};
use crate::grid::{CellId, GridError, GridEvent, GridSummary, ImageGrid, SharedGrid};
use crate::identity::IdentityMap;
use crate::recency::RecencyHistory;

/// Why a toggle request did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The tool is disabled.
    Disabled,
    /// Explode requested while already exploded.
    AlreadyExploded,
    /// Unexplode requested while not exploded.
    NotExploded,
    /// The selected cell cannot be exploded.
    SelectionIneligible,
    /// No eligible cell has been touched yet.
    EmptyHistory,
    /// The grid spans no display.
    NoDisplays,
    /// The selected cell has no parent grid.
    Detached,
    /// `set_checked` asked for the current state.
    Unchanged,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Disabled => "disabled",
            Self::AlreadyExploded => "already exploded",
            Self::NotExploded => "not exploded",
            Self::SelectionIneligible => "selection ineligible",
            Self::EmptyHistory => "empty history",
            Self::NoDisplays => "no displays",
            Self::Detached => "selection detached",
            Self::Unchanged => "unchanged",
        };
        f.write_str(text)
    }
}

/// Outcome of a toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The grid now shows `cells` cells in one row.
    Exploded { cells: usize },
    /// The pre-explode layout was restored.
    Unexploded,
    /// The exploded layout was found invalidated and explode mode dropped
    /// without restoring anything.
    Cancelled,
    /// Nothing happened.
    Ignored(IgnoreReason),
}

impl Transition {
    /// True unless the request was ignored.
    #[must_use]
    pub fn changed(&self) -> bool {
        !matches!(self, Self::Ignored(_))
    }
}

/// Per-viewer explode tool.
pub struct ExplodeController<G: ImageGrid + 'static> {
    grid: SharedGrid<G>,
    displays: Rc<dyn DisplayRegions>,
    history: Rc<RefCell<dyn CommandHistory>>,
    recency: RecencyHistory,
    identity: IdentityMap,
    /// Pre-explode layout; present exactly while exploded.
    unexplode_snapshot: Option<G::Snapshot>,
    gate: SuppressGate,
    checked: Observable<bool>,
    enabled: Observable<bool>,
    config: ExplodeConfig,
    grid_subscription: Option<Subscription>,
}

impl<G: ImageGrid + 'static> fmt::Debug for ExplodeController<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExplodeController")
            .field("checked", &self.checked.get())
            .field("enabled", &self.enabled.get())
            .field("recency", &self.recency.len())
            .field("identity", &self.identity.len())
            .field("suppressed", &self.gate.is_suppressed())
            .finish()
    }
}

impl<G: ImageGrid + 'static> ExplodeController<G> {
    /// Create a controller that is not yet listening to its grid.
    ///
    /// Most callers want [`attach`](Self::attach).
    pub fn new(
        grid: SharedGrid<G>,
        displays: Rc<dyn DisplayRegions>,
        history: Rc<RefCell<dyn CommandHistory>>,
        config: ExplodeConfig,
    ) -> Self {
        let mut controller = Self {
            grid,
            displays,
            history,
            recency: RecencyHistory::with_capacity(config.recency_capacity),
            identity: IdentityMap::new(),
            unexplode_snapshot: None,
            gate: SuppressGate::new(),
            checked: Observable::new(false),
            enabled: Observable::new(false),
            config,
            grid_subscription: None,
        };
        controller.refresh_enabled();
        controller
    }

    /// Create a controller and subscribe it to the grid's notifications.
    ///
    /// The subscription holds the controller weakly; dropping the returned
    /// handle detaches it.
    pub fn attach(
        grid: SharedGrid<G>,
        displays: Rc<dyn DisplayRegions>,
        history: Rc<RefCell<dyn CommandHistory>>,
        config: ExplodeConfig,
    ) -> Rc<RefCell<Self>> {
        let events = grid.borrow().events();
        let controller = Rc::new(RefCell::new(Self::new(grid, displays, history, config)));

        let weak: Weak<RefCell<Self>> = Rc::downgrade(&controller);
        let gate = controller.borrow().gate.clone();
        let subscription = events.subscribe(move |event: &GridEvent| {
            if gate.is_suppressed() {
                trace!(message = "grid_event.suppressed", ?event);
                return;
            }
            if let Some(controller) = weak.upgrade() {
                controller.borrow_mut().on_grid_event(event);
            }
        });
        controller.borrow_mut().grid_subscription = Some(subscription);
        controller
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// React to a grid notification raised outside the controller.
    pub fn on_grid_event(&mut self, event: &GridEvent) {
        match event {
            GridEvent::CellsChanged(_) => {
                self.cancel_explode_mode();
            }
            GridEvent::TileSelected(summary) => {
                if !self.is_checked()
                    && let Some((cell, status)) = summary.selected
                    && can_explode(Some(status))
                {
                    self.recency.touch(cell);
                    trace!(message = "recency.touch", %cell, len = self.recency.len());
                }
            }
            GridEvent::ImageSelected(_) => {}
        }
        self.update_enabled(event.summary());
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// The single user-facing action: unexplode if exploded, else explode.
    pub fn toggle_explode(&mut self) -> Result<Transition, GridError> {
        self.refresh_enabled();
        if !self.is_enabled() {
            return Ok(ignored(IgnoreReason::Disabled));
        }
        if self.is_checked() {
            self.unexplode()
        } else {
            self.explode()
        }
    }

    /// Toggle only if `checked` differs from the current state.
    pub fn set_checked(&mut self, checked: bool) -> Result<Transition, GridError> {
        if checked == self.is_checked() {
            return Ok(ignored(IgnoreReason::Unchanged));
        }
        self.toggle_explode()
    }

    /// Double-click entry point. Only ever unexplodes; returns whether the
    /// activation was consumed.
    pub fn handle_activation(&mut self, click_count: u32) -> Result<bool, GridError> {
        if click_count < 2 {
            return Ok(false);
        }
        self.refresh_enabled();
        if !self.is_enabled() || !self.is_checked() {
            return Ok(false);
        }
        self.unexplode()?;
        Ok(true)
    }

    /// Spread the most recently touched cells across one row.
    pub fn explode(&mut self) -> Result<Transition, GridError> {
        let span = info_span!("boxview.explode", target_count = tracing::field::Empty);
        let _enter = span.enter();

        if self.is_checked() {
            return Ok(ignored(IgnoreReason::AlreadyExploded));
        }

        let (selected, bounds) = {
            let grid = self.grid.borrow();
            let selected = grid.selected_cell().map(|cell| grid.cell_status(cell));
            (selected, grid.bounds())
        };
        if !can_explode(selected) {
            return Ok(ignored(IgnoreReason::SelectionIneligible));
        }

        {
            let grid = self.grid.borrow();
            self.recency.retain(|cell| can_explode(Some(grid.cell_status(cell))));
        }
        if self.recency.is_empty() {
            return Ok(ignored(IgnoreReason::EmptyHistory));
        }

        let displays = self.displays.count_intersecting(&bounds);
        let target_count = displays.min(self.recency.len());
        span.record("target_count", target_count);
        if target_count == 0 {
            return Ok(ignored(IgnoreReason::NoDisplays));
        }

        let chosen = self.recency.most_recent(target_count);
        debug!(message = "explode.enter", displays, target_count, cells = ?chosen);

        let before = self.grid.borrow().create_snapshot();
        if let Err(err) = self.spread(&chosen) {
            self.identity.reset();
            debug!(message = "explode.failed", error = %err);
            self.refresh_enabled();
            return Err(err);
        }
        let after = self.grid.borrow().create_snapshot();
        self.record(before.clone(), after);

        self.unexplode_snapshot = Some(before);
        self.checked.set(true);
        self.refresh_enabled();
        info!(message = "explode.done", target_count);
        Ok(Transition::Exploded {
            cells: target_count,
        })
    }

    /// Restore the pre-explode layout, keeping content changed meanwhile.
    pub fn unexplode(&mut self) -> Result<Transition, GridError> {
        let span = info_span!("boxview.unexplode", restored = tracing::field::Empty);
        let _enter = span.enter();

        let Some(restore) = self.unexplode_snapshot.clone() else {
            return Ok(ignored(IgnoreReason::NotExploded));
        };

        match self.unexplode_check() {
            UnexplodeCheck::Allowed => {}
            UnexplodeCheck::Detached => return Ok(ignored(IgnoreReason::Detached)),
            UnexplodeCheck::Invalidated => {
                self.refresh_enabled();
                return Ok(Transition::Cancelled);
            }
        }

        let before = self.grid.borrow().create_snapshot();
        let restored = match self.gather(&restore) {
            Ok(restored) => restored,
            Err(err) => {
                debug!(message = "unexplode.failed", error = %err);
                self.cancel_explode_mode();
                self.refresh_enabled();
                return Err(err);
            }
        };
        span.record("restored", restored);
        let after = self.grid.borrow().create_snapshot();
        self.record(before, after);

        self.unexplode_snapshot = None;
        self.identity.reset();
        self.checked.set(false);
        self.refresh_enabled();
        info!(message = "unexplode.done", restored);
        Ok(Transition::Unexploded)
    }

    /// Whether the selected cell permits an unexplode.
    ///
    /// A selected cell that is attached but empty means the exploded layout
    /// was replaced underneath the controller; explode mode is cancelled.
    pub fn can_unexplode(&mut self) -> bool {
        self.unexplode_check() == UnexplodeCheck::Allowed
    }

    fn unexplode_check(&mut self) -> UnexplodeCheck {
        let selected = {
            let grid = self.grid.borrow();
            grid.selected_cell().map(|cell| grid.cell_status(cell))
        };
        let check = check_unexplode(selected);
        if check == UnexplodeCheck::Invalidated {
            self.cancel_explode_mode();
        }
        check
    }

    /// Drop explode mode without touching the grid.
    ///
    /// Used when the exploded layout has been replaced underneath the
    /// controller. Returns `true` if the controller was exploded.
    pub fn cancel_explode_mode(&mut self) -> bool {
        let was_exploded = self.unexplode_snapshot.take().is_some();
        let had_identity = !self.identity.is_empty();
        self.identity.reset();
        if was_exploded || had_identity {
            debug!(message = "explode.cancelled");
        }
        self.checked.set(false);
        was_exploded
    }

    // ========================================================================
    // Grid work
    // ========================================================================

    /// Reshape to `1 × chosen.len()` and move each chosen cell's content into
    /// its new cell, left to right.
    fn spread(&mut self, chosen: &[CellId]) -> Result<(), GridError> {
        let _quiet = self.gate.suppress();
        let mut grid = self.grid.borrow_mut();

        let contents = chosen
            .iter()
            .map(|&cell| grid.create_cell_snapshot(cell))
            .collect::<Result<Vec<_>, _>>()?;

        grid.reshape(1, chosen.len())?;

        self.identity.reset();
        for ((&old, new), content) in chosen.iter().zip(grid.cells()).zip(&contents) {
            self.identity.record(old, new);
            grid.apply_cell_snapshot(new, content)?;
        }

        grid.redraw();
        grid.select_default_cell();
        Ok(())
    }

    /// Re-apply `restore`, then copy each migrated cell's current content
    /// back to its original position. Returns how many cells were carried
    /// home.
    fn gather(&mut self, restore: &G::Snapshot) -> Result<usize, GridError> {
        let _quiet = self.gate.suppress();
        let mut grid = self.grid.borrow_mut();

        let mut live: FxHashMap<CellId, G::CellSnapshot> = FxHashMap::default();
        for cell in grid.cells() {
            live.insert(cell, grid.create_cell_snapshot(cell)?);
        }

        grid.apply_snapshot(restore)?;

        let mut restored = 0;
        for cell in grid.cells() {
            if let Some(migrated) = self.identity.migrated_to(cell)
                && let Some(content) = live.get(&migrated)
            {
                grid.apply_cell_snapshot(cell, content)?;
                restored += 1;
            }
        }

        grid.redraw();
        Ok(restored)
    }

    /// Append a "before → after" command to the history.
    fn record(&self, before: G::Snapshot, after: G::Snapshot) {
        let grid = Rc::downgrade(&self.grid);
        let command = MementoCmd::begin(self.config.command_label.clone(), before)
            .with_end(after)
            .with_apply(move |snapshot: &G::Snapshot| -> CommandResult {
                let Some(target) = grid.upgrade() else {
                    return Err(CommandError::InvalidState("grid dropped".to_string()));
                };
                let mut grid = target.borrow_mut();
                grid.apply_snapshot(snapshot)?;
                grid.redraw();
                Ok(())
            });
        self.history.borrow_mut().append(Box::new(command));
    }

    fn refresh_enabled(&mut self) {
        let summary = self.grid.borrow().summary();
        self.update_enabled(&summary);
    }

    fn update_enabled(&mut self, summary: &GridSummary) {
        let enabled = is_enabled(
            self.is_checked(),
            summary,
            self.config.min_cells_to_enable,
        );
        self.enabled.set(enabled);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Currently exploded.
    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.unexplode_snapshot.is_some()
    }

    /// The toggle may be invoked.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Exploded state with change notification.
    #[must_use]
    pub fn checked(&self) -> Observable<bool> {
        self.checked.clone()
    }

    /// Enablement with change notification.
    #[must_use]
    pub fn enabled(&self) -> Observable<bool> {
        self.enabled.clone()
    }

    #[must_use]
    pub fn recency(&self) -> &RecencyHistory {
        &self.recency
    }

    #[must_use]
    pub fn identity(&self) -> &IdentityMap {
        &self.identity
    }

    /// A pre-explode layout is being held.
    #[must_use]
    pub fn holds_unexplode_snapshot(&self) -> bool {
        self.unexplode_snapshot.is_some()
    }

    /// Gate closed while the controller mutates its grid.
    #[must_use]
    pub fn gate(&self) -> &SuppressGate {
        &self.gate
    }

    #[must_use]
    pub fn config(&self) -> &ExplodeConfig {
        &self.config
    }

    /// The controller is subscribed to its grid.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.grid_subscription.is_some()
    }
}

fn ignored(reason: IgnoreReason) -> Transition {
    trace!(message = "toggle.ignored", %reason);
    Transition::Ignored(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_changed() {
        assert!(Transition::Exploded { cells: 2 }.changed());
        assert!(Transition::Unexploded.changed());
        assert!(Transition::Cancelled.changed());
        assert!(!Transition::Ignored(IgnoreReason::Disabled).changed());
    }

    #[test]
    fn ignore_reason_display() {
        assert_eq!(IgnoreReason::NoDisplays.to_string(), "no displays");
        assert_eq!(IgnoreReason::Unchanged.to_string(), "unchanged");
    }
}
