#![forbid(unsafe_code)]

//! The seam between layout tools and the host's undo/redo engine.
//!
//! Tools apply their change first and then hand the host a reversible
//! command. Undo and redo belong to the host; a tool never drives them.

use super::command::UndoableCmd;

/// Append-only view of a command history.
pub trait CommandHistory {
    /// Record a command whose effect has already been applied.
    fn append(&mut self, cmd: Box<dyn UndoableCmd>);
}

impl CommandHistory for Vec<Box<dyn UndoableCmd>> {
    fn append(&mut self, cmd: Box<dyn UndoableCmd>) {
        self.push(cmd);
    }
}
