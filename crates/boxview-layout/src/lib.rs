#![forbid(unsafe_code)]

//! Image box layout tools.
//!
//! # Role in BoxView
//! `boxview-layout` defines what a viewer's grid of image boxes must offer
//! ([`ImageGrid`]) and builds the explode tool on top of it:
//!
//! - [`RecencyHistory`] remembers which cells the user touched, in order.
//! - [`IdentityMap`] links each pre-explode cell to the cell it became.
//! - [`ExplodeController`] runs the explode/unexplode toggle and records
//!   both directions in the viewer's undo history.
//! - [`ExplodeRegistry`] answers "is this viewer exploded?" for other tools.
//!
//! Undo commands, observables and suppression gates come from
//! `boxview-runtime`; display enumeration from `boxview-core`.

pub mod config;
pub mod eligibility;
pub mod explode;
pub mod grid;
pub mod identity;
pub mod recency;
pub mod registry;

#[cfg(feature = "config")]
pub use config::ConfigError;
pub use config::ExplodeConfig;
pub use eligibility::{UnexplodeCheck, can_explode, check_unexplode, is_enabled};
pub use explode::{ExplodeController, IgnoreReason, Transition};
pub use grid::{CellId, CellStatus, GridError, GridEvent, GridSummary, ImageGrid, SharedGrid};
pub use identity::IdentityMap;
pub use recency::RecencyHistory;
pub use registry::{ExplodeRegistry, ViewerId};
