//! Shared test utilities for driving feedback loops.

#![allow(dead_code, unused_imports)]

use futures::stream::{BoxStream, StreamExt};
use parking_lot::Mutex;
use spinloop::{Reduce, Reducer};
use std::sync::Arc;
use std::time::Duration;

/// Poll `condition` until it holds, failing the test after ~1s of (virtual) time.
pub async fn wait_until<F: Fn() -> bool>(condition: F) {
    for _ in 0..500 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("condition not reached in time");
}

/// Next item of `stream`, or `None` if nothing arrives within `timeout`.
pub async fn next_within<T>(stream: &mut BoxStream<'static, T>, timeout: Duration) -> Option<T> {
    tokio::time::timeout(timeout, stream.next()).await.ok().flatten()
}

/// Shared sink for values observed from inside a loop.
#[derive(Clone)]
pub struct Recorder<T> {
    seen: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone> Recorder<T> {
    pub fn new() -> Self {
        Self {
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn push(&self, value: T) {
        self.seen.lock().push(value);
    }

    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.seen.lock().clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CounterEvent {
    Increment,
    Decrement,
    Set(i64),
}

pub struct CounterReducer;

impl Reduce for CounterReducer {
    type State = i64;
    type Event = CounterEvent;

    fn reduce(state: i64, event: CounterEvent) -> i64 {
        match event {
            CounterEvent::Increment => state + 1,
            CounterEvent::Decrement => state - 1,
            CounterEvent::Set(value) => value,
        }
    }
}

pub fn counter_reducer() -> Reducer<i64, CounterEvent> {
    Reducer::from_reduce::<CounterReducer>()
}
