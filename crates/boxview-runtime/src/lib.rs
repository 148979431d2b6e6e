#![forbid(unsafe_code)]

//! BoxView Runtime
//!
//! Undoable commands and reactive notification primitives shared by the
//! viewer's layout tools.
//!
//! # Key Components
//!
//! - [`CommandHistory`] - where tools append finished commands
//! - [`MementoCmd`] - reversible command built from a before/after snapshot
//! - [`Observable`] - value with change notification
//! - [`EventFeed`] - synchronous publish/subscribe for discrete events
//! - [`SuppressGate`] - scoped listener suppression
//!
//! # How it fits in the system
//! `boxview-layout` builds its tools on these pieces: tools publish their
//! state through `Observable`s, listen to grids through `EventFeed`s, and
//! record their work as `MementoCmd`s appended to a `CommandHistory`.

pub mod reactive;
pub mod undo;

pub use reactive::{EventFeed, Observable, Subscription, SuppressGate, SuppressGuard};
pub use undo::{
    CommandError, CommandHistory, CommandMetadata, CommandResult, CommandSource, MementoCmd,
    UndoableCmd,
};
