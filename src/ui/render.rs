//! Weakly held render callback.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

type RenderFn<S> = Arc<dyn Fn(&S) -> bool + Send + Sync>;

/// Slot for the callback that pushes states into an external container.
///
/// The container is held weakly; once it is gone the callback resolves to
/// nothing and the slot clears itself.
pub(crate) struct RenderSlot<S> {
    render: Arc<Mutex<Option<RenderFn<S>>>>,
}

impl<S> Clone for RenderSlot<S> {
    fn clone(&self) -> Self {
        Self {
            render: Arc::clone(&self.render),
        }
    }
}

impl<S> RenderSlot<S> {
    pub(crate) fn new() -> Self {
        Self {
            render: Arc::new(Mutex::new(None)),
        }
    }

    pub(crate) fn set<C, F>(&self, container: &Arc<C>, using: F)
    where
        C: Send + Sync + 'static,
        F: Fn(&C, &S) + Send + Sync + 'static,
    {
        let container: Weak<C> = Arc::downgrade(container);
        *self.render.lock() = Some(Arc::new(move |state| match container.upgrade() {
            Some(container) => {
                using(&container, state);
                true
            }
            None => false,
        }));
    }

    pub(crate) fn is_set(&self) -> bool {
        self.render.lock().is_some()
    }

    /// The callback runs without the slot locked, so it may use the slot itself.
    pub(crate) fn render(&self, state: &S) {
        let Some(callback) = self.render.lock().clone() else {
            return;
        };
        if callback(state) {
            return;
        }

        let mut render = self.render.lock();
        // Leave a callback registered meanwhile in place.
        if render.as_ref().is_some_and(|current| Arc::ptr_eq(current, &callback)) {
            tracing::debug!("Render container released, dropping render callback");
            *render = None;
        }
    }
}
