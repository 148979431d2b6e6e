#![forbid(unsafe_code)]

//! Eligibility and enablement rules for the explode tool.

use crate::grid::{CellStatus, GridSummary};

/// A cell can be exploded when it is attached, has a display set bound and
/// its selected tile shows an image.
#[must_use]
pub fn can_explode(status: Option<CellStatus>) -> bool {
    match status {
        Some(s) => s.attached && s.content_bound && s.shows_image(),
        None => false,
    }
}

/// Outcome of checking whether the selected cell permits an unexplode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnexplodeCheck {
    /// Safe to restore the pre-explode layout.
    Allowed,
    /// No selected cell, or it has no parent grid.
    Detached,
    /// The cell is attached but empty: the grid was rebuilt underneath the
    /// tool and the exploded layout no longer exists.
    Invalidated,
}

/// Classify the selected cell for unexplode.
#[must_use]
pub fn check_unexplode(status: Option<CellStatus>) -> UnexplodeCheck {
    match status {
        None => UnexplodeCheck::Detached,
        Some(s) if !s.attached => UnexplodeCheck::Detached,
        Some(s) if !s.content_bound => UnexplodeCheck::Invalidated,
        Some(_) => UnexplodeCheck::Allowed,
    }
}

/// Toolbar enablement.
///
/// Always enabled while exploded so the user can get back. Otherwise the
/// grid must be unlocked, hold at least `min_cells` cells and have a
/// selected cell whose selected tile shows an image.
#[must_use]
pub fn is_enabled(exploded: bool, grid: &GridSummary, min_cells: usize) -> bool {
    if exploded {
        return true;
    }
    !grid.locked
        && grid.cell_count >= min_cells
        && grid
            .selected
            .is_some_and(|(_, status)| status.shows_image())
}
