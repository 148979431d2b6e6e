#![forbid(unsafe_code)]

//! A viewer composition root for tests.
//!
//! [`TestViewer`] wires a [`MemoryGrid`], a row of fixed displays, an undo
//! history and an attached [`ExplodeController`] together the way a real
//! viewer would, and registers the controller in an [`ExplodeRegistry`].

use std::cell::RefCell;
use std::rc::Rc;

use boxview_core::{DisplayRegions, FixedDisplays, Rect};
use boxview_layout::{
    CellId, ExplodeConfig, ExplodeController, ExplodeRegistry, GridError, ImageGrid,
    SharedGrid, Transition, ViewerId,
};
use boxview_runtime::{CommandError, CommandHistory};

use crate::grid::{CellContent, MemoryGrid};
use crate::history::RecordingHistory;

/// Width of every simulated display.
pub const DISPLAY_WIDTH: u32 = 1920;
/// Height of every simulated display.
pub const DISPLAY_HEIGHT: u32 = 1080;

/// Everything a viewer owns, wired up.
pub struct TestViewer {
    pub id: ViewerId,
    pub grid: SharedGrid<MemoryGrid>,
    pub displays: Rc<FixedDisplays>,
    pub history: Rc<RefCell<RecordingHistory>>,
    pub controller: Rc<RefCell<ExplodeController<MemoryGrid>>>,
}

impl TestViewer {
    /// A `rows`×`cols` viewer spanning `displays` side-by-side displays.
    /// Every cell is loaded with series `s{i}` showing image `s{i}-1`.
    #[must_use]
    pub fn new(rows: usize, cols: usize, displays: usize) -> Self {
        Self::with_config(rows, cols, displays, ExplodeConfig::default())
    }

    #[must_use]
    pub fn with_config(rows: usize, cols: usize, displays: usize, config: ExplodeConfig) -> Self {
        let span = DISPLAY_WIDTH.saturating_mul(displays.max(1) as u32);
        let mut grid = MemoryGrid::new(rows, cols).with_bounds(Rect::from_size(span, DISPLAY_HEIGHT));
        for (i, cell) in grid.cells().into_iter().enumerate() {
            let series = format!("s{i}");
            grid.load(cell, CellContent::showing(&series, &format!("{series}-1")))
                .expect("freshly allocated cell");
        }
        let grid = Rc::new(RefCell::new(grid));
        let displays = Rc::new(FixedDisplays::side_by_side(
            displays,
            DISPLAY_WIDTH,
            DISPLAY_HEIGHT,
        ));
        let history = Rc::new(RefCell::new(RecordingHistory::new()));

        let regions: Rc<dyn DisplayRegions> = displays.clone();
        let commands: Rc<RefCell<dyn CommandHistory>> = history.clone();
        let controller = ExplodeController::attach(Rc::clone(&grid), regions, commands, config);

        Self {
            id: ViewerId::new(1),
            grid,
            displays,
            history,
            controller,
        }
    }

    /// Register this viewer's controller.
    pub fn register(&self, registry: &mut ExplodeRegistry) -> bool {
        registry.register(self.id, &*self.controller.borrow())
    }

    /// Handle of the cell at layout position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn cell(&self, index: usize) -> CellId {
        self.grid.borrow().cells()[index]
    }

    /// Click the cell at `index`.
    pub fn touch(&self, index: usize) -> Result<(), GridError> {
        let cell = self.cell(index);
        self.grid.borrow_mut().select(cell)
    }

    /// Click the cells at `indices` in order.
    pub fn touch_all(&self, indices: &[usize]) -> Result<(), GridError> {
        indices.iter().try_for_each(|&index| self.touch(index))
    }

    /// Press the explode button.
    pub fn toggle(&self) -> Result<Transition, GridError> {
        self.controller.borrow_mut().toggle_explode()
    }

    pub fn undo(&self) -> Option<Result<String, CommandError>> {
        self.history.borrow_mut().undo()
    }

    pub fn redo(&self) -> Option<Result<String, CommandError>> {
        self.history.borrow_mut().redo()
    }

    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.controller.borrow().is_checked()
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.controller.borrow().is_enabled()
    }

    /// Display set of every cell, in layout order.
    #[must_use]
    pub fn display_sets(&self) -> Vec<Option<String>> {
        self.grid.borrow().display_sets()
    }

    /// The controller's checked flag, identity map and held snapshot agree.
    #[must_use]
    pub fn state_is_consistent(&self) -> bool {
        let controller = self.controller.borrow();
        let checked = controller.is_checked();
        checked == !controller.identity().is_empty()
            && checked == controller.holds_unexplode_snapshot()
            && checked == controller.checked().get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_is_loaded_and_enabled_after_selection() {
        let viewer = TestViewer::new(2, 2, 2);
        assert_eq!(viewer.display_sets().len(), 4);
        assert_eq!(viewer.display_sets()[3].as_deref(), Some("s3"));
        assert!(viewer.controller.borrow().is_attached());

        viewer.touch(0).unwrap();
        assert!(viewer.is_enabled());
        assert_eq!(viewer.controller.borrow().recency().len(), 1);
    }

    #[test]
    fn grid_spans_every_display() {
        let viewer = TestViewer::new(1, 2, 3);
        let bounds = viewer.grid.borrow().bounds();
        assert_eq!(viewer.displays.count_intersecting(&bounds), 3);
    }
}
