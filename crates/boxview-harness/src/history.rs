#![forbid(unsafe_code)]

//! A recording [`CommandHistory`] with plain undo/redo.
//!
//! Stands in for the host's engine: it keeps every appended command and
//! replays them on request, with no depth or memory limits.

use boxview_runtime::{CommandError, CommandHistory, UndoableCmd};

/// Two lists of commands; appending clears redo.
#[derive(Default)]
pub struct RecordingHistory {
    done: Vec<Box<dyn UndoableCmd>>,
    undone: Vec<Box<dyn UndoableCmd>>,
}

impl RecordingHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Revert the newest command. A command that fails to undo stays put.
    pub fn undo(&mut self) -> Option<Result<String, CommandError>> {
        let mut cmd = self.done.pop()?;
        let label = cmd.description().to_string();
        match cmd.undo() {
            Ok(()) => {
                self.undone.push(cmd);
                Some(Ok(label))
            }
            Err(err) => {
                self.done.push(cmd);
                Some(Err(err))
            }
        }
    }

    /// Re-apply the newest undone command.
    pub fn redo(&mut self) -> Option<Result<String, CommandError>> {
        let mut cmd = self.undone.pop()?;
        let label = cmd.description().to_string();
        match cmd.redo() {
            Ok(()) => {
                self.done.push(cmd);
                Some(Ok(label))
            }
            Err(err) => {
                self.undone.push(cmd);
                Some(Err(err))
            }
        }
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.done.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.undone.len()
    }

    /// Labels of recorded commands, newest first.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.done.iter().rev().map(|c| c.description()).collect()
    }

    /// The command the next `undo` would revert.
    #[must_use]
    pub fn last(&self) -> Option<&dyn UndoableCmd> {
        self.done.last().map(|c| c.as_ref())
    }
}

impl CommandHistory for RecordingHistory {
    fn append(&mut self, cmd: Box<dyn UndoableCmd>) {
        tracing::trace!(message = "history.append", label = cmd.description());
        self.undone.clear();
        self.done.push(cmd);
    }
}
