//! Shifting delivery of a stream onto an [`Executor`].

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::{AbortHandle, Abortable};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use tokio::sync::mpsc;

use crate::executor::Executor;

/// Receiving end of a stream that is driven on another executor.
///
/// Dropping it aborts the task driving the upstream, which drops the upstream
/// and everything it owns.
pub struct ObserveOn<T> {
    receiver: mpsc::Receiver<T>,
    task: AbortHandle,
}

impl<T> Stream for ObserveOn<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.receiver.poll_recv(cx)
    }
}

impl<T> Drop for ObserveOn<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Poll `source` on `executor` and deliver its items to the caller.
///
/// Inline executors return the stream untouched. If the executor cannot take
/// the work the failure is logged and the result never yields.
pub fn observe_on<St>(source: St, executor: &Executor) -> BoxStream<'static, St::Item>
where
    St: Stream + Send + 'static,
    St::Item: Send + 'static,
{
    if executor.is_inline() {
        return source.boxed();
    }

    let (sender, receiver) = mpsc::channel(executor.capacity());
    let (task, registration) = AbortHandle::new_pair();
    let forward = async move {
        futures::pin_mut!(source);
        while let Some(item) = source.next().await {
            if sender.send(item).await.is_err() {
                break;
            }
        }
    };
    let work = async move {
        // Aborted means the receiving side went away; nothing to report.
        let _ = Abortable::new(forward, registration).await;
    };

    match executor.schedule(work) {
        Ok(()) => ObserveOn { receiver, task }.boxed(),
        Err(err) => {
            tracing::error!(?executor, "Failed to shift stream onto executor: {}", err);
            stream::pending().boxed()
        }
    }
}
