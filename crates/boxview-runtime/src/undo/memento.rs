#![forbid(unsafe_code)]

//! Snapshot-pair commands.
//!
//! A [`MementoCmd`] records the state of some originator before and after an
//! operation. Undo re-applies the begin snapshot, redo re-applies the end
//! snapshot. The command never inspects the snapshots; the originator
//! produces and consumes them through the apply callback.
//!
//! # Lifecycle
//!
//! ```text
//! begin(label, s0)   ── operation runs ──   with_end(s1)   ── history.append
//!   begin fixed                               end fixed          immutable
//! ```
//!
//! The end snapshot is required before the command can execute; a command
//! that reaches the history without one reports `InvalidState`.

use std::any::Any;
use std::fmt;

use super::command::{CommandError, CommandMetadata, CommandResult, UndoableCmd};

/// Callback that restores an originator from a snapshot.
pub type SnapshotApplyFn<S> = Box<dyn Fn(&S) -> CommandResult>;

/// Reversible command built from a before/after snapshot pair.
pub struct MementoCmd<S> {
    begin: S,
    end: Option<S>,
    metadata: CommandMetadata,
    apply: Option<SnapshotApplyFn<S>>,
}

impl<S: fmt::Debug> fmt::Debug for MementoCmd<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MementoCmd")
            .field("label", &self.metadata.description)
            .field("begin", &self.begin)
            .field("end", &self.end)
            .field("has_apply", &self.apply.is_some())
            .finish()
    }
}

impl<S> MementoCmd<S> {
    /// Start a command whose begin state is `begin`.
    #[must_use]
    pub fn begin(label: impl Into<String>, begin: S) -> Self {
        Self {
            begin,
            end: None,
            metadata: CommandMetadata::new(label),
            apply: None,
        }
    }

    /// Fix the end state.
    #[must_use]
    pub fn with_end(mut self, end: S) -> Self {
        self.end = Some(end);
        self
    }

    /// Set the callback that applies a snapshot to the originator.
    #[must_use]
    pub fn with_apply<F>(mut self, f: F) -> Self
    where
        F: Fn(&S) -> CommandResult + 'static,
    {
        self.apply = Some(Box::new(f));
        self
    }

    /// Replace the metadata (e.g. to mark a programmatic source).
    #[must_use]
    pub fn with_metadata(mut self, metadata: CommandMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// State before the operation.
    #[must_use]
    pub fn begin_snapshot(&self) -> &S {
        &self.begin
    }

    /// State after the operation, once fixed.
    #[must_use]
    pub fn end_snapshot(&self) -> Option<&S> {
        self.end.as_ref()
    }

    /// Label shown in undo/redo menus.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.metadata.description
    }

    fn apply(&self, snapshot: &S) -> CommandResult {
        match self.apply {
            Some(ref apply) => apply(snapshot),
            None => Err(CommandError::InvalidState(
                "no apply callback set".to_string(),
            )),
        }
    }
}

impl<S: 'static> UndoableCmd for MementoCmd<S> {
    fn execute(&mut self) -> CommandResult {
        let Some(end) = self.end.as_ref() else {
            return Err(CommandError::InvalidState(
                "end snapshot not recorded".to_string(),
            ));
        };
        self.apply(end)
    }

    fn undo(&mut self) -> CommandResult {
        self.apply(&self.begin)
    }

    fn description(&self) -> &str {
        &self.metadata.description
    }

    fn size_bytes(&self) -> usize {
        std::mem::size_of::<Self>() + self.metadata.size_bytes() + std::mem::size_of::<S>()
    }

    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn debug_name(&self) -> &'static str {
        "MementoCmd"
    }
}
