#![forbid(unsafe_code)]

//! Contracts for the image box grid a viewer displays.
//!
//! The grid and its cells belong to the viewer. Layout tools reach them
//! through [`ImageGrid`] and refer to cells by [`CellId`] handles rather
//! than references: reshaping a grid destroys every cell and allocates new
//! handles, so a handle taken before a reshape goes stale afterwards.
//!
//! # Identity contract
//!
//! - `reshape` retires every existing `CellId` and allocates fresh ones.
//! - `apply_snapshot` reinstates exactly the `CellId`s recorded in the
//!   snapshot, so a handle that was valid when the snapshot was taken is
//!   valid again once it is applied.
//! - `cell_status` of a retired handle is [`CellStatus::DETACHED`].
//!
//! # Notifications
//!
//! Grids publish [`GridEvent`]s on the feed returned by
//! [`ImageGrid::events`]. Each event carries a [`GridSummary`] taken after
//! the change, so listeners never need to borrow the grid to react.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use boxview_core::Rect;
use boxview_runtime::{CommandError, EventFeed};

/// Handle to a cell (image box) inside a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(u64);

impl CellId {
    /// Create a handle from a raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell#{}", self.0)
    }
}

/// What layout tools need to know about one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStatus {
    /// The cell still belongs to a grid.
    pub attached: bool,
    /// A display set is bound to the cell.
    pub content_bound: bool,
    /// One of the cell's tiles is selected.
    pub sub_region_selected: bool,
    /// The selected tile shows an image.
    pub sub_region_has_content: bool,
}

impl CellStatus {
    /// Status of a handle whose cell no longer exists.
    pub const DETACHED: Self = Self {
        attached: false,
        content_bound: false,
        sub_region_selected: false,
        sub_region_has_content: false,
    };

    /// A fully populated, attached cell.
    pub const READY: Self = Self {
        attached: true,
        content_bound: true,
        sub_region_selected: true,
        sub_region_has_content: true,
    };

    /// Selected tile exists and shows an image.
    #[must_use]
    pub const fn shows_image(&self) -> bool {
        self.sub_region_selected && self.sub_region_has_content
    }
}

/// Grid state carried by every [`GridEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridSummary {
    /// The grid refuses layout changes.
    pub locked: bool,
    /// Number of cells currently in the grid.
    pub cell_count: usize,
    /// The selected cell and its status, if any.
    pub selected: Option<(CellId, CellStatus)>,
}

/// Change notification published by a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEvent {
    /// The set of cells was rebuilt (reshape, snapshot applied).
    CellsChanged(GridSummary),
    /// A tile became the selection focus; its parent cell is
    /// `summary.selected`.
    TileSelected(GridSummary),
    /// The image shown in the selected tile changed.
    ImageSelected(GridSummary),
}

impl GridEvent {
    /// Grid state after the change.
    #[must_use]
    pub fn summary(&self) -> &GridSummary {
        match self {
            Self::CellsChanged(s) | Self::TileSelected(s) | Self::ImageSelected(s) => s,
        }
    }
}

/// Errors reported by grid operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The handle does not name a live cell.
    UnknownCell(CellId),
    /// A reshape asked for an empty grid.
    InvalidShape { rows: usize, cols: usize },
    /// The grid could not apply a snapshot.
    SnapshotRejected(String),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCell(id) => write!(f, "unknown {}", id),
            Self::InvalidShape { rows, cols } => {
                write!(f, "invalid grid shape {}x{}", rows, cols)
            }
            Self::SnapshotRejected(msg) => write!(f, "snapshot rejected: {}", msg),
        }
    }
}

impl std::error::Error for GridError {}

impl From<GridError> for CommandError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::SnapshotRejected(msg) => CommandError::SnapshotRejected(msg),
            other => CommandError::InvalidState(other.to_string()),
        }
    }
}

/// A viewer's grid of image boxes.
pub trait ImageGrid {
    /// Whole-grid memento. Equal snapshots describe identical layouts.
    type Snapshot: Clone + PartialEq + fmt::Debug + 'static;
    /// Single-cell memento (display set, tile selection, presentation).
    type CellSnapshot: Clone + fmt::Debug + 'static;

    /// Cells in layout order (row-major).
    fn cells(&self) -> Vec<CellId>;

    /// The grid refuses layout changes.
    fn is_locked(&self) -> bool;

    /// Currently selected cell.
    fn selected_cell(&self) -> Option<CellId>;

    /// Bounding region of the grid in desktop coordinates.
    fn bounds(&self) -> Rect;

    /// Status of `cell`; [`CellStatus::DETACHED`] for retired handles.
    fn cell_status(&self, cell: CellId) -> CellStatus;

    /// Replace every cell with a fresh `rows`×`cols` layout.
    fn reshape(&mut self, rows: usize, cols: usize) -> Result<(), GridError>;

    /// Capture the whole grid.
    fn create_snapshot(&self) -> Self::Snapshot;

    /// Restore the whole grid, reinstating the recorded cell handles.
    fn apply_snapshot(&mut self, snapshot: &Self::Snapshot) -> Result<(), GridError>;

    /// Capture one cell.
    fn create_cell_snapshot(&self, cell: CellId) -> Result<Self::CellSnapshot, GridError>;

    /// Restore one cell from a snapshot taken from any cell.
    fn apply_cell_snapshot(
        &mut self,
        cell: CellId,
        snapshot: &Self::CellSnapshot,
    ) -> Result<(), GridError>;

    /// Repaint the grid.
    fn redraw(&mut self);

    /// Select the grid's default cell (usually the first).
    fn select_default_cell(&mut self);

    /// Feed on which the grid publishes its [`GridEvent`]s.
    fn events(&self) -> EventFeed<GridEvent>;

    /// Current state in notification form.
    fn summary(&self) -> GridSummary {
        GridSummary {
            locked: self.is_locked(),
            cell_count: self.cells().len(),
            selected: self
                .selected_cell()
                .map(|cell| (cell, self.cell_status(cell))),
        }
    }
}

/// A grid shared between the viewer, its tools and their undo commands.
pub type SharedGrid<G> = Rc<RefCell<G>>;
