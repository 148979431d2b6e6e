#![forbid(unsafe_code)]

//! Core: geometry, display enumeration, and logging setup.
//!
//! # Role in BoxView
//! `boxview-core` holds the leaf types every other crate shares. It has no
//! knowledge of grids, cells or undo history; it only answers "where is this
//! rectangle" and "how many displays does it touch".

pub mod display;
pub mod geometry;
pub mod logging;

pub use display::{DisplayRegions, FixedDisplays};
pub use geometry::Rect;
