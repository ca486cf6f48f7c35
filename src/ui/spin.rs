use std::future::ready;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::sync::watch;

use crate::executor::{Executor, ExecutorError};
use crate::feedback::Feedback;
use crate::gear::Gear;
use crate::mvi::{Event, State};
use crate::spin::{Spin, SpinHandle};
use crate::stream::StateStream;
use crate::ui::binding::Binding;
use crate::ui::render::RenderSlot;

/// A [`Spin`] exposed to a UI layer.
///
/// - `state()` / `subscribe()`: latest state, updated once per loop emission
/// - `emit()`: push an event into the loop
/// - `render()`: register a weakly held callback that receives every state
///
/// The loop runs from [`UiSpin::start`] until [`UiSpin::stop`] or drop.
pub struct UiSpin<S, E> {
    spin: Spin<S, E>,
    state: watch::Receiver<S>,
    emitter: Gear<E>,
    render: RenderSlot<S>,
    handle: Option<SpinHandle>,
}

impl<S, E> UiSpin<S, E>
where
    S: State,
    E: Event + Clone,
{
    /// Wrap `spin`, rendering in whatever context drives the loop.
    pub fn new(spin: Spin<S, E>) -> Self {
        Self::with_executor(spin, Executor::inline())
    }

    /// Wrap `spin`, publishing and rendering every state on `ui_executor`.
    pub fn with_executor(spin: Spin<S, E>, ui_executor: Executor) -> Self {
        let (sender, state) = watch::channel(spin.initial_state().clone());
        let emitter = Gear::new();
        let render = RenderSlot::new();
        let feedback = ui_feedback(Arc::new(sender), render.clone(), emitter.clone())
            .execute_on(ui_executor);

        Self {
            spin: spin.with_leading_feedback(feedback),
            state,
            emitter,
            render,
            handle: None,
        }
    }

    /// The wrapped spin, including the UI feedback.
    pub fn spin(&self) -> &Spin<S, E> {
        &self.spin
    }

    pub fn state(&self) -> S {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.state.clone()
    }

    /// Push `event` into the loop. Dropped if the loop is not running.
    pub fn emit(&self, event: E) {
        self.emitter.propagate(event);
    }

    /// Call `using` with `container` for every new state, for as long as
    /// `container` is alive elsewhere.
    pub fn render<C, F>(&self, container: &Arc<C>, using: F)
    where
        C: Send + Sync + 'static,
        F: Fn(&C, &S) + Send + Sync + 'static,
    {
        self.render.set(container, using);
    }

    pub fn has_renderer(&self) -> bool {
        self.render.is_set()
    }

    /// Two-way binding: `read` selects a value from state, `event` turns a
    /// written value into an event.
    pub fn binding<V, R, F>(&self, read: R, event: F) -> Binding<S, V, E>
    where
        R: Fn(&S) -> V + Send + Sync + 'static,
        F: Fn(V) -> E + Send + Sync + 'static,
    {
        Binding::new(self.state.clone(), self.emitter.clone(), read, event)
    }

    /// Start the loop on the ambient tokio runtime.
    pub fn start(&mut self) -> Result<(), ExecutorError> {
        self.start_on(&Executor::inline())
    }

    /// Start the loop on `executor`, replacing any loop already running.
    pub fn start_on(&mut self, executor: &Executor) -> Result<(), ExecutorError> {
        if self.handle.take().is_some() {
            tracing::debug!("Restarting UI loop");
        }
        self.handle = Some(self.spin.start(executor)?);
        Ok(())
    }

    pub fn stop(&mut self) {
        self.handle = None;
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_stopped())
    }
}

/// Mirrors states into the observable and the render callback, and forwards
/// emitted events into the loop.
fn ui_feedback<S, E>(
    sender: Arc<watch::Sender<S>>,
    render: RenderSlot<S>,
    emitter: Gear<E>,
) -> Feedback<S, E>
where
    S: State,
    E: Event + Clone,
{
    Feedback::new(move |states: StateStream<S>| {
        let sender = Arc::clone(&sender);
        let render = render.clone();
        let rendered = states
            .inspect(move |state| {
                sender.send_replace(state.clone());
                render.render(state);
            })
            .filter_map(|_| ready(None::<E>));
        stream::select(rendered, emitter.event_stream())
    })
}
