use crate::feedback::Feedback;
use crate::mvi::{Event, Reducer, State};
use crate::spin::Spin;

/// Fluent construction of a [`Spin`]: initial state, then feedbacks, then
/// the reducer that closes the loop.
pub struct SpinBuilder<S, E> {
    initial_state: S,
    feedbacks: Vec<Feedback<S, E>>,
}

impl<S, E> SpinBuilder<S, E>
where
    S: State,
    E: Event,
{
    pub(crate) fn new(initial_state: S) -> Self {
        Self {
            initial_state,
            feedbacks: Vec::new(),
        }
    }

    pub fn feedback(mut self, feedback: Feedback<S, E>) -> Self {
        self.feedbacks.push(feedback);
        self
    }

    pub fn feedbacks<I>(mut self, feedbacks: I) -> Self
    where
        I: IntoIterator<Item = Feedback<S, E>>,
    {
        self.feedbacks.extend(feedbacks);
        self
    }

    pub fn reducer(self, reducer: Reducer<S, E>) -> Spin<S, E> {
        Spin::new(self.initial_state, self.feedbacks, reducer)
    }
}
