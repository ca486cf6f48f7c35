//! The stream capability the loop is written against.
//!
//! Everything here is expressed over [`futures::Stream`]. Operators the
//! `futures` crate already provides (`map`, `filter`, `inspect`, `select_all`,
//! `flat_map_unordered`) are used directly; this module adds the ones the
//! loop needs on top: deferred construction, switch-to-latest, replay-one
//! multicast, executor hand-off and error-as-end recovery.

mod broadcast;
mod observe_on;
mod recover;
mod switch;

use std::future::ready;

use futures::future;
use futures::stream::{self, BoxStream, Stream, StreamExt};

pub use broadcast::Broadcast;
pub use observe_on::{observe_on, ObserveOn};
pub use recover::{end_on_error, end_on_panic};
pub use switch::SwitchLatest;

/// A boxed stream of states.
pub type StateStream<S> = BoxStream<'static, S>;

/// A boxed stream of events.
pub type EventStream<E> = BoxStream<'static, E>;

/// Build the stream only once it is first polled.
pub fn deferred<F, St>(factory: F) -> BoxStream<'static, St::Item>
where
    F: FnOnce() -> St + Send + 'static,
    St: Stream + Send + 'static,
{
    stream::once(future::lazy(move |_| factory()))
        .flatten()
        .boxed()
}

/// Merge `streams` fairly. Ends once every input has ended.
pub fn merge<T>(streams: Vec<BoxStream<'static, T>>) -> BoxStream<'static, T>
where
    T: Send + 'static,
{
    stream::select_all(streams).boxed()
}

/// Run `effect` for every item and merge all resulting streams, letting each
/// run to completion.
pub fn flat_map_merge<St, F, U>(source: St, effect: F) -> BoxStream<'static, U::Item>
where
    St: Stream + Send + 'static,
    F: FnMut(St::Item) -> U + Send + 'static,
    U: Stream + Unpin + Send + 'static,
    U::Item: Send + 'static,
{
    source.flat_map_unordered(None, effect).boxed()
}

/// Run `effect` for every item, dropping the stream started for the previous
/// item as soon as a newer one arrives.
pub fn flat_map_latest<St, F, U>(source: St, effect: F) -> BoxStream<'static, U::Item>
where
    St: Stream + Unpin + Send + 'static,
    F: FnMut(St::Item) -> U + Send + 'static,
    U: Stream + Unpin + Send + 'static,
{
    SwitchLatest::new(source.map(effect)).boxed()
}

/// Fold `events` into states starting at `seed`; the seed itself is emitted first.
pub fn scan_with_prefix<St, S, F>(events: St, seed: S, mut fold: F) -> impl Stream<Item = S>
where
    St: Stream,
    S: Clone,
    F: FnMut(&S, St::Item) -> S,
{
    stream::once(ready(seed.clone())).chain(events.scan(seed, move |state, event| {
        let next = fold(state, event);
        *state = next.clone();
        ready(Some(next))
    }))
}
