//! Gears: push-only event sources that are not derived from state.
//!
//! A gear lets things outside the loop (another loop, a timer, a socket) feed
//! events into it. Feedbacks attach to a gear with
//! [`Feedback::attached_to`](crate::Feedback::attached_to) or
//! [`Feedback::catching`](crate::Feedback::catching).

use crate::stream::{Broadcast, EventStream};

/// A multicast event emitter.
///
/// Clones share the same channel. Events propagated while nothing is
/// listening are dropped, not buffered.
pub struct Gear<E> {
    channel: Broadcast<E>,
}

impl<E> Clone for Gear<E> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

impl<E> Default for Gear<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Gear<E> {
    pub fn new() -> Self {
        Self {
            channel: Broadcast::new(),
        }
    }

    /// Whether any loop is currently listening.
    pub fn is_attached(&self) -> bool {
        self.channel.observer_count() > 0
    }
}

impl<E> Gear<E>
where
    E: Clone + Send + 'static,
{
    pub fn propagate(&self, event: E) {
        if !self.is_attached() {
            tracing::trace!("Gear event dropped, nothing attached");
            return;
        }
        self.channel.send(event);
    }

    /// A read-only subscription to everything propagated from now on.
    pub fn event_stream(&self) -> EventStream<E> {
        self.channel.subscribe()
    }
}
