//! Feedbacks: the effect boundary of the loop.
//!
//! A feedback turns the stream of current states into a stream of events.
//! Constructors cover the usual shapes: effects run per state under an
//! [`ExecutionStrategy`], plain state-to-event mappings, and feedbacks fed
//! by a [`Gear`] instead of by state.

mod strategy;

use std::fmt::Display;
use std::future::ready;
use std::sync::Arc;

use futures::stream::{self, Stream, StreamExt};

use crate::executor::Executor;
use crate::gear::Gear;
use crate::mvi::{Event, State};
use crate::stream::{
    deferred, end_on_error, end_on_panic, merge, observe_on, Broadcast, EventStream, StateStream,
};

pub use strategy::ExecutionStrategy;

type Body<S, E> = dyn Fn(StateStream<S>) -> EventStream<E> + Send + Sync;

/// A function from the state stream to an event stream, optionally observing
/// its input on a given executor.
///
/// A feedback should not end its own event stream: ending it only silences
/// this feedback, never the loop.
pub struct Feedback<S, E> {
    body: Arc<Body<S, E>>,
    executor: Option<Executor>,
}

impl<S, E> Clone for Feedback<S, E> {
    fn clone(&self) -> Self {
        Self {
            body: Arc::clone(&self.body),
            executor: self.executor.clone(),
        }
    }
}

impl<S, E> Feedback<S, E>
where
    S: State,
    E: Event,
{
    pub fn new<F, St>(body: F) -> Self
    where
        F: Fn(StateStream<S>) -> St + Send + Sync + 'static,
        St: Stream<Item = E> + Send + 'static,
    {
        Self {
            body: Arc::new(move |states| body(states).boxed()),
            executor: None,
        }
    }

    /// Run `effect` for every state, combining invocations per `strategy`.
    ///
    /// A panic while polling an invocation ends that invocation only.
    pub fn effect<F, St>(effect: F, strategy: ExecutionStrategy) -> Self
    where
        F: Fn(S) -> St + Send + Sync + 'static,
        St: Stream<Item = E> + Send + 'static,
    {
        let effect = Arc::new(effect);
        Self::new(move |states| {
            let effect = Arc::clone(&effect);
            strategy.apply(states, move |state| end_on_panic(effect(state)).boxed())
        })
    }

    /// Like [`Feedback::effect`] for fallible effects: the first `Err` an
    /// invocation yields is logged and ends that invocation.
    pub fn try_effect<F, St, Err>(effect: F, strategy: ExecutionStrategy) -> Self
    where
        F: Fn(S) -> St + Send + Sync + 'static,
        St: Stream<Item = Result<E, Err>> + Send + 'static,
        Err: Display + 'static,
    {
        Self::effect(move |state| end_on_error(effect(state)), strategy)
    }

    /// One event per state, computed synchronously.
    pub fn direct<F>(effect: F) -> Self
    where
        F: Fn(S) -> E + Send + Sync + 'static,
    {
        let effect = Arc::new(effect);
        Self::new(move |states: StateStream<S>| {
            let effect = Arc::clone(&effect);
            states.map(move |state| effect(state))
        })
    }

    /// Run every feedback on the same states and merge their events.
    pub fn merge<I>(feedbacks: I) -> Self
    where
        I: IntoIterator<Item = Feedback<S, E>>,
    {
        let feedbacks: Arc<[Feedback<S, E>]> = feedbacks.into_iter().collect();
        Self::new(move |states: StateStream<S>| {
            let fan_out = Broadcast::new();
            let mut branches: Vec<EventStream<E>> = feedbacks
                .iter()
                .map(|feedback| feedback.apply(fan_out.subscribe()))
                .collect();

            let pump = stream::once(async move {
                let mut states = states;
                while let Some(state) = states.next().await {
                    fan_out.send(state);
                }
                fan_out.close();
                None::<E>
            })
            .filter_map(ready);
            branches.push(pump.boxed());

            merge(branches)
        })
    }

    /// Ignore state and forward the gear's events through `filter`.
    /// Events mapped to `None` are dropped.
    pub fn attached_to<G, F>(gear: &Gear<G>, filter: F) -> Self
    where
        G: Clone + Send + 'static,
        F: Fn(G) -> Option<E> + Send + Sync + 'static,
    {
        let gear = gear.clone();
        let filter = Arc::new(filter);
        Self::new(move |_states: StateStream<S>| {
            let filter = Arc::clone(&filter);
            gear.event_stream()
                .filter_map(move |event| ready(filter(event)))
        })
    }

    /// Emit `emitted` every time the gear propagates `trigger`.
    pub fn catching<G>(gear: &Gear<G>, trigger: G, emitted: E) -> Self
    where
        G: Clone + PartialEq + Send + Sync + 'static,
        E: Clone + Sync,
    {
        Self::attached_to(gear, move |event| {
            (event == trigger).then(|| emitted.clone())
        })
    }

    /// Only pass states matching `predicate` on to this feedback.
    pub fn filtered_by<P>(self, predicate: P) -> Self
    where
        P: Fn(&S) -> bool + Send + Sync + 'static,
    {
        let body = self.body;
        let predicate = Arc::new(predicate);
        Self {
            body: Arc::new(move |states: StateStream<S>| {
                let predicate = Arc::clone(&predicate);
                body(states.filter(move |state| ready(predicate(state))).boxed())
            }),
            executor: self.executor,
        }
    }

    /// Run the body on `executor`: its input is polled there and its events
    /// are handed back to the loop.
    pub fn execute_on(mut self, executor: Executor) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn executor(&self) -> Option<&Executor> {
        self.executor.as_ref()
    }

    /// Wire this feedback to a state stream.
    pub fn apply(&self, states: StateStream<S>) -> EventStream<E> {
        match &self.executor {
            Some(executor) => {
                let body = Arc::clone(&self.body);
                observe_on(deferred(move || body(states)), executor)
            }
            None => (self.body)(states),
        }
    }
}
