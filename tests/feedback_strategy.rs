mod common;

use common::{next_within, Recorder};
use futures::channel::mpsc;
use futures::stream::{self, Stream, StreamExt};
use spinloop::{ExecutionStrategy, Feedback, Gear, Reducer, Spin};
use std::time::Duration;
use tokio::time::sleep;

/// Emits `state * 10` after 100ms.
fn slow_effect(state: u32) -> impl Stream<Item = u32> + Send {
    stream::once(async move {
        sleep(Duration::from_millis(100)).await;
        state * 10
    })
}

/// Feeds state 1, then state 2 while the effect for state 1 is still running.
async fn run_overlapping(strategy: ExecutionStrategy) -> Vec<u32> {
    let (states, input) = mpsc::unbounded();
    let events = Feedback::effect(slow_effect, strategy).apply(input.boxed());

    tokio::spawn(async move {
        states.unbounded_send(1).unwrap();
        sleep(Duration::from_millis(50)).await;
        states.unbounded_send(2).unwrap();
    });

    let mut events: Vec<u32> = events.collect().await;
    events.sort_unstable();
    events
}

#[tokio::test(start_paused = true)]
async fn continue_on_new_state_keeps_every_invocation() {
    assert_eq!(
        run_overlapping(ExecutionStrategy::ContinueOnNewState).await,
        vec![10, 20]
    );
}

#[tokio::test(start_paused = true)]
async fn cancel_on_new_state_keeps_only_latest_invocation() {
    assert_eq!(
        run_overlapping(ExecutionStrategy::CancelOnNewState).await,
        vec![20]
    );
}

#[test]
fn default_strategy_cancels() {
    assert_eq!(
        ExecutionStrategy::default(),
        ExecutionStrategy::CancelOnNewState
    );
}

#[tokio::test(start_paused = true)]
async fn cancelled_search_never_reaches_state() {
    #[derive(Debug, Clone, PartialEq)]
    enum SearchEvent {
        Query(&'static str),
        Results(String),
    }

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Search {
        query: Option<&'static str>,
        results: Vec<String>,
    }

    let started = Recorder::<&'static str>::new();
    let log = started.clone();
    let gear = Gear::new();
    let spin = Spin::builder(Search::default())
        .feedback(
            Feedback::effect(
                move |state: Search| {
                    let query = state.query.unwrap_or_default();
                    log.push(query);
                    stream::once(async move {
                        sleep(Duration::from_millis(100)).await;
                        SearchEvent::Results(format!("results for {}", query))
                    })
                },
                ExecutionStrategy::CancelOnNewState,
            )
            .filtered_by(|state| state.query.is_some() && state.results.is_empty()),
        )
        .feedback(Feedback::attached_to(&gear, Some))
        .reducer(Reducer::new(|state: Search, event: SearchEvent| match event {
            SearchEvent::Query(query) => Search {
                query: Some(query),
                results: Vec::new(),
            },
            SearchEvent::Results(result) => Search {
                results: vec![result],
                ..state
            },
        }));

    let mut states = spin.materialize();
    assert_eq!(states.next().await, Some(Search::default()));

    gear.propagate(SearchEvent::Query("ru"));
    assert_eq!(
        next_within(&mut states, Duration::from_millis(10)).await.and_then(|s| s.query),
        Some("ru")
    );

    gear.propagate(SearchEvent::Query("rust"));
    assert_eq!(
        next_within(&mut states, Duration::from_millis(10)).await.and_then(|s| s.query),
        Some("rust")
    );

    let settled = next_within(&mut states, Duration::from_millis(500)).await.unwrap();
    assert_eq!(settled.results, vec!["results for rust".to_string()]);
    assert_eq!(next_within(&mut states, Duration::from_millis(500)).await, None);
    assert_eq!(started.snapshot(), vec!["ru", "rust"]);
}
