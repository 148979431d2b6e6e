#![forbid(unsafe_code)]

//! Reactive notification primitives.
//!
//! - [`Observable`]: a shared value that notifies subscribers when it changes
//!   (tool checked/enabled state).
//! - [`EventFeed`]: a stream of discrete events (grid rebuilt, tile selected).
//! - [`SuppressGate`]: scoped muting of a tool's own listeners while it
//!   mutates the thing it listens to.
//!
//! All three are single-threaded (`Rc`-based) and deliver synchronously in
//! subscription order.

pub mod event_feed;
pub mod observable;
pub mod suppress;

pub use event_feed::EventFeed;
pub use observable::{Observable, Subscription};
pub use suppress::{SuppressGate, SuppressGuard};
