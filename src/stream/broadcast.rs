//! Multicast channel with an optional replay-one slot.

use std::sync::Arc;

use futures::channel::mpsc;
use futures::stream::{BoxStream, StreamExt};
use parking_lot::Mutex;

/// A push-based multicast source.
///
/// Every [`subscribe`](Broadcast::subscribe) call gets its own stream of
/// everything sent afterwards. A replaying broadcast also keeps the most
/// recent value and hands it to new subscribers first. Sending with no live
/// subscriber drops the value.
pub struct Broadcast<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

struct Inner<T> {
    latest: Option<T>,
    replay: bool,
    observers: Vec<mpsc::UnboundedSender<T>>,
}

impl<T> Clone for Broadcast<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Broadcast<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Broadcast<T> {
    /// A broadcast that retains nothing.
    pub fn new() -> Self {
        Self::with_slot(None, false)
    }

    /// A replay-one broadcast seeded with `initial`.
    pub fn replaying(initial: T) -> Self {
        Self::with_slot(Some(initial), true)
    }

    fn with_slot(latest: Option<T>, replay: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                latest,
                replay,
                observers: Vec::new(),
            })),
        }
    }

    /// Number of subscribers still listening, as of the last send.
    pub fn observer_count(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.observers.retain(|observer| !observer.is_closed());
        inner.observers.len()
    }

    /// End every current subscription.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        for observer in inner.observers.drain(..) {
            observer.close_channel();
        }
    }
}

impl<T> Broadcast<T>
where
    T: Clone + Send + 'static,
{
    /// Push `value` to every live subscriber.
    pub fn send(&self, value: T) {
        let mut inner = self.inner.lock();
        inner
            .observers
            .retain(|observer| observer.unbounded_send(value.clone()).is_ok());
        if inner.replay {
            inner.latest = Some(value);
        }
    }

    /// The retained value, if this broadcast replays.
    pub fn latest(&self) -> Option<T> {
        self.inner.lock().latest.clone()
    }

    pub fn subscribe(&self) -> BoxStream<'static, T> {
        let (sender, receiver) = mpsc::unbounded();
        let mut inner = self.inner.lock();
        if let Some(latest) = inner.latest.clone() {
            // The receiver is alive, so this cannot fail.
            let _ = sender.unbounded_send(latest);
        }
        inner.observers.push(sender);
        receiver.boxed()
    }
}
