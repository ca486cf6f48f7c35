//! The composition root: initial state, feedbacks and reducer closed into
//! one loop.

mod builder;
mod handle;

use std::future::ready;

use futures::future::{AbortHandle, Abortable};
use futures::stream::{self, StreamExt};
use uuid::Uuid;

use crate::executor::{Executor, ExecutorError};
use crate::feedback::Feedback;
use crate::mvi::{Event, Reducer, State};
use crate::stream::{deferred, merge, Broadcast, EventStream, StateStream};

pub use builder::SpinBuilder;
pub use handle::SpinHandle;

/// Initial state, an ordered list of feedbacks and a reducer.
///
/// Immutable once built; clones share the feedbacks and the reducer.
pub struct Spin<S, E> {
    initial_state: S,
    feedbacks: Vec<Feedback<S, E>>,
    reducer: Reducer<S, E>,
}

impl<S, E> Clone for Spin<S, E>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            initial_state: self.initial_state.clone(),
            feedbacks: self.feedbacks.clone(),
            reducer: self.reducer.clone(),
        }
    }
}

impl<S, E> Spin<S, E>
where
    S: State,
    E: Event,
{
    pub fn new(initial_state: S, feedbacks: Vec<Feedback<S, E>>, reducer: Reducer<S, E>) -> Self {
        Self {
            initial_state,
            feedbacks,
            reducer,
        }
    }

    pub fn builder(initial_state: S) -> SpinBuilder<S, E> {
        SpinBuilder::new(initial_state)
    }

    pub fn initial_state(&self) -> &S {
        &self.initial_state
    }

    pub fn feedbacks(&self) -> &[Feedback<S, E>] {
        &self.feedbacks
    }

    pub fn reducer(&self) -> &Reducer<S, E> {
        &self.reducer
    }

    /// The same loop with `feedback` placed before all others.
    pub(crate) fn with_leading_feedback(&self, feedback: Feedback<S, E>) -> Self {
        let mut feedbacks = Vec::with_capacity(self.feedbacks.len() + 1);
        feedbacks.push(feedback);
        feedbacks.extend(self.feedbacks.iter().cloned());
        Self::new(self.initial_state.clone(), feedbacks, self.reducer.clone())
    }

    /// Close the loop and return the stream of states it produces.
    ///
    /// Nothing runs until the stream is first polled, and every call builds
    /// an independent loop with its own state holder. The stream starts with
    /// the initial state and never ends on its own; drop it to stop the loop.
    pub fn materialize(&self) -> StateStream<S> {
        let spin = self.clone();
        deferred(move || {
            let loop_id = Uuid::new_v4();
            let span = tracing::info_span!("spin", %loop_id);
            let _entered = span.enter();
            tracing::debug!(feedbacks = spin.feedbacks.len(), "Materializing feedback loop");

            // Replay-one holder: every feedback first sees the current state,
            // then each state the reducer produces.
            let holder = Broadcast::replaying(spin.initial_state.clone());
            let events: Vec<EventStream<E>> = spin
                .feedbacks
                .iter()
                .map(|feedback| feedback.apply(holder.subscribe()))
                .collect();
            // Keeps the loop alive even with no feedbacks or once all of them end.
            let events = merge(events).chain(stream::pending()).boxed();

            spin.reducer
                .scheduled(spin.initial_state.clone(), events, move |state| {
                    tracing::trace!(%loop_id, "State reduced");
                    holder.send(state.clone());
                })
        })
    }

    /// Run the loop on `executor` until the returned handle is dropped or cancelled.
    pub fn start(&self, executor: &Executor) -> Result<SpinHandle, ExecutorError> {
        self.start_with(executor, |_| {})
    }

    /// Like [`Spin::start`], handing every emitted state to `on_state`.
    pub fn start_with<F>(&self, executor: &Executor, mut on_state: F) -> Result<SpinHandle, ExecutorError>
    where
        F: FnMut(S) + Send + 'static,
    {
        let states = self.materialize();
        let (task, registration) = AbortHandle::new_pair();
        let (handle, signal) = SpinHandle::new(task);
        let drive = Abortable::new(
            states.for_each(move |state| {
                on_state(state);
                ready(())
            }),
            registration,
        );

        executor.schedule(async move {
            let _signal = signal;
            if drive.await.is_err() {
                tracing::debug!("Feedback loop stopped by its handle");
            }
        })?;
        Ok(handle)
    }
}
