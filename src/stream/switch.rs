//! Switch-to-latest flattening.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{Stream, StreamExt};

/// Flattens a stream of streams, following only the most recent inner stream.
///
/// When the outer stream yields a new inner stream, the current one is
/// dropped on the spot. Ends once the outer stream and the last inner stream
/// have both ended.
pub struct SwitchLatest<St, U> {
    outer: Option<St>,
    inner: Option<U>,
}

impl<St, U> SwitchLatest<St, U> {
    pub fn new(outer: St) -> Self {
        Self {
            outer: Some(outer),
            inner: None,
        }
    }
}

impl<St, U> Stream for SwitchLatest<St, U>
where
    St: Stream<Item = U> + Unpin,
    U: Stream + Unpin,
{
    type Item = U::Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<U::Item>> {
        let this = &mut *self;

        while let Some(outer) = this.outer.as_mut() {
            match outer.poll_next_unpin(cx) {
                Poll::Ready(Some(next)) => {
                    if this.inner.replace(next).is_some() {
                        tracing::trace!("Dropped in-flight effect in favour of a newer state");
                    }
                }
                Poll::Ready(None) => this.outer = None,
                Poll::Pending => break,
            }
        }

        if let Some(inner) = this.inner.as_mut() {
            match inner.poll_next_unpin(cx) {
                Poll::Ready(Some(item)) => return Poll::Ready(Some(item)),
                Poll::Ready(None) => this.inner = None,
                Poll::Pending => return Poll::Pending,
            }
        }

        if this.outer.is_none() && this.inner.is_none() {
            Poll::Ready(None)
        } else {
            Poll::Pending
        }
    }
}
