//! Reducer: the serialized fold at the centre of the loop.

use std::sync::Arc;

use crate::executor::Executor;
use crate::mvi::{Event, State};
use crate::stream::{observe_on, scan_with_prefix, EventStream, StateStream};

/// Named reducers.
///
/// The reducer is the only place where state transitions happen.
/// It must be a pure, total function: (State, Event) -> State
pub trait Reduce {
    /// The state type this reducer operates on.
    type State: State;

    /// The event type this reducer handles.
    type Event: Event;

    /// Process an event and return the new state.
    fn reduce(state: Self::State, event: Self::Event) -> Self::State;
}

type ReduceFn<S, E> = dyn Fn(S, E) -> S + Send + Sync;

/// A reduce function plus the executor it runs on.
///
/// Events are never folded concurrently: the fold runs as a single stream
/// on [`Reducer::executor`].
pub struct Reducer<S, E> {
    reduce: Arc<ReduceFn<S, E>>,
    executor: Executor,
}

impl<S, E> Clone for Reducer<S, E> {
    fn clone(&self) -> Self {
        Self {
            reduce: Arc::clone(&self.reduce),
            executor: self.executor.clone(),
        }
    }
}

impl<S, E> Reducer<S, E>
where
    S: State,
    E: Event,
{
    /// Fold in whatever context polls the loop.
    pub fn new<F>(reduce: F) -> Self
    where
        F: Fn(S, E) -> S + Send + Sync + 'static,
    {
        Self::on(reduce, Executor::inline())
    }

    pub fn on<F>(reduce: F, executor: Executor) -> Self
    where
        F: Fn(S, E) -> S + Send + Sync + 'static,
    {
        Self {
            reduce: Arc::new(reduce),
            executor,
        }
    }

    pub fn from_reduce<R>() -> Self
    where
        R: Reduce<State = S, Event = E> + 'static,
    {
        Self::new(R::reduce)
    }

    pub fn with_executor(mut self, executor: Executor) -> Self {
        self.executor = executor;
        self
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn reduce(&self, state: S, event: E) -> S {
        (self.reduce)(state, event)
    }

    /// Fold `events` starting at `initial` on this reducer's executor.
    ///
    /// The output starts with `initial`. `publish` sees every folded state
    /// (not the initial one) on the executor, before it is handed downstream.
    pub fn scheduled<P>(&self, initial: S, events: EventStream<E>, publish: P) -> StateStream<S>
    where
        P: Fn(&S) + Send + 'static,
    {
        let reduce = Arc::clone(&self.reduce);
        let states = scan_with_prefix(events, initial, move |state: &S, event| {
            let next = reduce(state.clone(), event);
            publish(&next);
            next
        });
        observe_on(states, &self.executor)
    }
}
