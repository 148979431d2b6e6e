#![forbid(unsafe_code)]

//! In-memory [`ImageGrid`].
//!
//! Cells hold plain strings for their display set and image. Handles are
//! allocated from a counter that never repeats, so a handle retired by a
//! reshape stays detached until a snapshot that recorded it is applied.

use boxview_core::Rect;
use boxview_layout::{CellId, CellStatus, GridError, GridEvent, ImageGrid};
use boxview_runtime::EventFeed;

/// Content of one cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellContent {
    /// Bound display set (series), if any.
    pub display_set: Option<String>,
    /// The cell's tile is selected.
    pub tile_selected: bool,
    /// Image shown in the selected tile.
    pub image: Option<String>,
}

impl CellContent {
    /// A cell showing `image` from `display_set`, tile selected.
    #[must_use]
    pub fn showing(display_set: &str, image: &str) -> Self {
        Self {
            display_set: Some(display_set.to_string()),
            tile_selected: true,
            image: Some(image.to_string()),
        }
    }
}

/// Whole-grid snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSnapshot {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<(CellId, CellContent)>,
    pub selected: Option<CellId>,
}

/// A grid that lives entirely in memory and publishes the same
/// notifications a real viewer would.
#[derive(Debug)]
pub struct MemoryGrid {
    rows: usize,
    cols: usize,
    cells: Vec<(CellId, CellContent)>,
    selected: Option<CellId>,
    locked: bool,
    bounds: Rect,
    next_id: u64,
    events: EventFeed<GridEvent>,
    redraws: usize,
    fail_cell_apply: bool,
}

impl MemoryGrid {
    /// Empty `rows`×`cols` grid covering one 1920×1080 display.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut grid = Self {
            rows: 0,
            cols: 0,
            cells: Vec::new(),
            selected: None,
            locked: false,
            bounds: Rect::from_size(1920, 1080),
            next_id: 1,
            events: EventFeed::new(),
            redraws: 0,
            fail_cell_apply: false,
        };
        grid.rebuild(rows, cols);
        grid
    }

    /// Set the region the grid occupies on the desktop.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Fill `cell` without notifying anyone (test setup).
    pub fn load(&mut self, cell: CellId, content: CellContent) -> Result<(), GridError> {
        *self.content_mut(cell)? = content;
        Ok(())
    }

    /// Select `cell`'s tile, as a click on it would.
    pub fn select(&mut self, cell: CellId) -> Result<(), GridError> {
        self.content_mut(cell)?.tile_selected = true;
        self.selected = Some(cell);
        self.events.publish(&GridEvent::TileSelected(self.summary()));
        Ok(())
    }

    /// Show `image` in `cell`'s tile.
    pub fn set_image(&mut self, cell: CellId, image: Option<&str>) -> Result<(), GridError> {
        self.content_mut(cell)?.image = image.map(str::to_string);
        self.events.publish(&GridEvent::ImageSelected(self.summary()));
        Ok(())
    }

    /// Bind a different display set to `cell`, as dragging a series onto it
    /// would.
    pub fn set_display_set(
        &mut self,
        cell: CellId,
        display_set: Option<&str>,
    ) -> Result<(), GridError> {
        self.content_mut(cell)?.display_set = display_set.map(str::to_string);
        self.events.publish(&GridEvent::ImageSelected(self.summary()));
        Ok(())
    }

    /// Drop `cell`'s content while leaving it in the grid.
    pub fn clear_content(&mut self, cell: CellId) -> Result<(), GridError> {
        *self.content_mut(cell)? = CellContent::default();
        Ok(())
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Make the next `apply_cell_snapshot` fail.
    pub fn fail_next_cell_apply(&mut self) {
        self.fail_cell_apply = true;
    }

    #[must_use]
    pub fn content(&self, cell: CellId) -> Option<&CellContent> {
        self.cells.iter().find(|(id, _)| *id == cell).map(|(_, c)| c)
    }

    /// Display set of every cell, in layout order.
    #[must_use]
    pub fn display_sets(&self) -> Vec<Option<String>> {
        self.cells
            .iter()
            .map(|(_, c)| c.display_set.clone())
            .collect()
    }

    /// `(rows, cols)`.
    #[must_use]
    pub fn layout(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[must_use]
    pub fn redraw_count(&self) -> usize {
        self.redraws
    }

    fn content_mut(&mut self, cell: CellId) -> Result<&mut CellContent, GridError> {
        self.cells
            .iter_mut()
            .find(|(id, _)| *id == cell)
            .map(|(_, c)| c)
            .ok_or(GridError::UnknownCell(cell))
    }

    fn rebuild(&mut self, rows: usize, cols: usize) {
        let first = self.next_id;
        self.next_id += (rows * cols) as u64;
        self.cells = (first..self.next_id)
            .map(|raw| (CellId::new(raw), CellContent::default()))
            .collect();
        self.rows = rows;
        self.cols = cols;
        self.selected = None;
    }
}

impl ImageGrid for MemoryGrid {
    type Snapshot = GridSnapshot;
    type CellSnapshot = CellContent;

    fn cells(&self) -> Vec<CellId> {
        self.cells.iter().map(|(id, _)| *id).collect()
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn selected_cell(&self) -> Option<CellId> {
        self.selected
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn cell_status(&self, cell: CellId) -> CellStatus {
        match self.content(cell) {
            Some(content) => CellStatus {
                attached: true,
                content_bound: content.display_set.is_some(),
                sub_region_selected: content.tile_selected,
                sub_region_has_content: content.image.is_some(),
            },
            None => CellStatus::DETACHED,
        }
    }

    fn reshape(&mut self, rows: usize, cols: usize) -> Result<(), GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidShape { rows, cols });
        }
        self.rebuild(rows, cols);
        tracing::trace!(message = "grid.reshape", rows, cols);
        self.events.publish(&GridEvent::CellsChanged(self.summary()));
        Ok(())
    }

    fn create_snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.clone(),
            selected: self.selected,
        }
    }

    fn apply_snapshot(&mut self, snapshot: &GridSnapshot) -> Result<(), GridError> {
        if snapshot.cells.len() != snapshot.rows * snapshot.cols {
            return Err(GridError::SnapshotRejected(format!(
                "{} cells for a {}x{} layout",
                snapshot.cells.len(),
                snapshot.rows,
                snapshot.cols
            )));
        }
        self.rows = snapshot.rows;
        self.cols = snapshot.cols;
        self.cells = snapshot.cells.clone();
        self.selected = snapshot.selected;
        self.events.publish(&GridEvent::CellsChanged(self.summary()));
        Ok(())
    }

    fn create_cell_snapshot(&self, cell: CellId) -> Result<CellContent, GridError> {
        self.content(cell)
            .cloned()
            .ok_or(GridError::UnknownCell(cell))
    }

    fn apply_cell_snapshot(
        &mut self,
        cell: CellId,
        snapshot: &CellContent,
    ) -> Result<(), GridError> {
        if std::mem::take(&mut self.fail_cell_apply) {
            return Err(GridError::SnapshotRejected(format!("{cell} refused content")));
        }
        *self.content_mut(cell)? = snapshot.clone();
        Ok(())
    }

    fn redraw(&mut self) {
        self.redraws += 1;
    }

    fn select_default_cell(&mut self) {
        if let Some((first, _)) = self.cells.first() {
            self.selected = Some(*first);
            self.events.publish(&GridEvent::TileSelected(self.summary()));
        }
    }

    fn events(&self) -> EventFeed<GridEvent> {
        self.events.clone()
    }
}
