#![forbid(unsafe_code)]

//! Undoable command framework.
//!
//! Layout tools record their work as reversible commands and append them to
//! the host's history. The host owns undo/redo; tools only produce commands.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  append(MementoCmd)  ┌──────────────────────────┐
//! │ layout tool  │ ───────────────────► │ host CommandHistory      │
//! └──────────────┘                      └──────────────────────────┘
//!        ▲                                         │ undo()/redo()
//!        │ apply(snapshot)                         │
//!        └─────────────────────────────────────────┘
//! ```
//!
//! # Module Structure
//!
//! - [`command`]: Core `UndoableCmd` trait, metadata and errors
//! - [`memento`]: `MementoCmd`, the before/after snapshot command
//! - [`history`]: the `CommandHistory` append seam
//!
//! # Design Notes
//!
//! ## Why Commands Store Callbacks
//!
//! Commands outlive the call that created them, so they cannot borrow the
//! workspace they restore. Instead they hold an apply callback that captures
//! a shared handle to it. The originator stays in control of how a snapshot
//! is applied, and the history can store any command as an owned value.

pub mod command;
pub mod history;
pub mod memento;

pub use command::{CommandError, CommandMetadata, CommandResult, CommandSource, UndoableCmd};
pub use history::CommandHistory;
pub use memento::{MementoCmd, SnapshotApplyFn};
