#![forbid(unsafe_code)]

//! Test fixtures for BoxView layout tools.
//!
//! - [`MemoryGrid`] - an in-memory [`ImageGrid`](boxview_layout::ImageGrid)
//!   with failure injection
//! - [`RecordingHistory`] - unbounded undo/redo over appended commands
//! - [`TestViewer`] - grid, displays, history and explode tool wired up

pub mod grid;
pub mod history;
pub mod viewer;

pub use grid::{CellContent, GridSnapshot, MemoryGrid};
pub use history::RecordingHistory;
pub use viewer::{DISPLAY_HEIGHT, DISPLAY_WIDTH, TestViewer};
