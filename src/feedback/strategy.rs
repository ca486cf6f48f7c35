use futures::stream::BoxStream;

use crate::stream::{flat_map_latest, flat_map_merge, EventStream, StateStream};

/// What to do with an effect still in flight when a new state arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Start a new invocation and let the previous ones run to completion.
    /// Events from every invocation are merged.
    ContinueOnNewState,
    /// Drop the previous invocation and start a new one.
    #[default]
    CancelOnNewState,
}

impl ExecutionStrategy {
    /// Invoke `effect` for each state and combine the resulting event streams.
    pub fn apply<S, E, F>(self, states: StateStream<S>, effect: F) -> EventStream<E>
    where
        S: Send + 'static,
        E: Send + 'static,
        F: FnMut(S) -> BoxStream<'static, E> + Send + 'static,
    {
        match self {
            ExecutionStrategy::ContinueOnNewState => flat_map_merge(states, effect),
            ExecutionStrategy::CancelOnNewState => flat_map_latest(states, effect),
        }
    }
}
