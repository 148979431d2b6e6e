#![forbid(unsafe_code)]

//! Publish/subscribe feed for discrete events.
//!
//! [`Observable`](super::Observable) models a value that changes; an
//! [`EventFeed`] models things that happen ("the cell list was rebuilt",
//! "a tile was selected"). Every `publish` reaches every live subscriber,
//! even when two consecutive events compare equal.
//!
//! Delivery is synchronous and in subscription order. Callbacks run after
//! the feed releases its internal borrow, so a subscriber may publish or
//! subscribe again from inside its callback.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::observable::Subscription;

type ListenerRc<E> = Rc<dyn Fn(&E)>;
type ListenerWeak<E> = Weak<dyn Fn(&E)>;

/// Shared event feed. Clones publish to and subscribe on the same feed.
pub struct EventFeed<E> {
    listeners: Rc<RefCell<Vec<ListenerWeak<E>>>>,
}

impl<E> Clone for EventFeed<E> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
        }
    }
}

impl<E> Default for EventFeed<E> {
    fn default() -> Self {
        Self {
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<E> std::fmt::Debug for EventFeed<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventFeed")
            .field("listener_count", &self.listeners.borrow().len())
            .finish()
    }
}

impl<E: 'static> EventFeed<E> {
    /// Create an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Dropping the returned guard unsubscribes it.
    pub fn subscribe(&self, listener: impl Fn(&E) + 'static) -> Subscription {
        let strong: ListenerRc<E> = Rc::new(listener);
        self.listeners.borrow_mut().push(Rc::downgrade(&strong));
        Subscription::hold(strong)
    }

    /// Deliver `event` to every live listener. Returns how many ran.
    pub fn publish(&self, event: &E) -> usize {
        let live: Vec<ListenerRc<E>> = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.retain(|w| w.strong_count() > 0);
            listeners.iter().filter_map(|w| w.upgrade()).collect()
        };
        for listener in &live {
            listener(event);
        }
        live.len()
    }

    /// Number of registered listeners (including dead ones not yet pruned).
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}
