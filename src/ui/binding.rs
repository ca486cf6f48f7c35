use std::sync::Arc;

use tokio::sync::watch;

use crate::gear::Gear;

/// Two-way binding for a UI control: reads a piece of the current state and
/// turns writes into loop events.
pub struct Binding<S, V, E> {
    state: watch::Receiver<S>,
    read: Arc<dyn Fn(&S) -> V + Send + Sync>,
    event: Arc<dyn Fn(V) -> E + Send + Sync>,
    emitter: Gear<E>,
}

impl<S, V, E> Clone for Binding<S, V, E> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            read: Arc::clone(&self.read),
            event: Arc::clone(&self.event),
            emitter: self.emitter.clone(),
        }
    }
}

impl<S, V, E> Binding<S, V, E>
where
    E: Clone + Send + 'static,
{
    pub(crate) fn new<R, F>(state: watch::Receiver<S>, emitter: Gear<E>, read: R, event: F) -> Self
    where
        R: Fn(&S) -> V + Send + Sync + 'static,
        F: Fn(V) -> E + Send + Sync + 'static,
    {
        Self {
            state,
            read: Arc::new(read),
            event: Arc::new(event),
            emitter,
        }
    }

    pub fn get(&self) -> V {
        (self.read)(&self.state.borrow())
    }

    /// Emit the event for `value`. The bound value changes once the loop
    /// has reduced it.
    pub fn set(&self, value: V) {
        self.emitter.propagate((self.event)(value));
    }
}
