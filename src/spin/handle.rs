//! Lifecycle handle of a running loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::future::AbortHandle;
use tokio::sync::Notify;

/// Owns a running loop. Dropping the handle cancels it.
///
/// Cancelling tears down the whole pipeline: the reducer stops receiving
/// events and every feedback's in-flight work is dropped. A cancelled loop
/// cannot be resumed; materialize the spin again instead.
pub struct SpinHandle {
    task: AbortHandle,
    status: Arc<Status>,
}

struct Status {
    stopped: AtomicBool,
    notify: Notify,
}

/// Held by the task driving the loop; marks the handle stopped when dropped.
pub(crate) struct StopSignal {
    status: Arc<Status>,
}

impl SpinHandle {
    pub(crate) fn new(task: AbortHandle) -> (Self, StopSignal) {
        let status = Arc::new(Status {
            stopped: AtomicBool::new(false),
            notify: Notify::new(),
        });
        let signal = StopSignal {
            status: Arc::clone(&status),
        };
        (Self { task, status }, signal)
    }

    /// Request the loop to stop.
    pub fn cancel(&self) {
        if !self.task.is_aborted() {
            self.task.abort();
            tracing::debug!("Feedback loop cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.task.is_aborted()
    }

    /// Whether the task driving the loop has finished.
    pub fn is_stopped(&self) -> bool {
        self.status.stopped.load(Ordering::SeqCst)
    }

    /// Wait until the task driving the loop has finished.
    pub async fn stopped(&self) {
        // Register before checking the flag so a stop landing in between
        // still wakes us.
        let notified = self.status.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_stopped() {
            return;
        }
        notified.await;
    }
}

impl Drop for SpinHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl Drop for StopSignal {
    fn drop(&mut self) {
        self.status.stopped.store(true, Ordering::SeqCst);
        self.status.notify.notify_waiters();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stopped_resolves_after_signal_drops() {
        let (task, _registration) = AbortHandle::new_pair();
        let (handle, signal) = SpinHandle::new(task);
        assert!(!handle.is_stopped());

        tokio::spawn(async move {
            tokio::task::yield_now().await;
            drop(signal);
        });
        handle.stopped().await;
        assert!(handle.is_stopped());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let (task, _registration) = AbortHandle::new_pair();
        let (handle, _signal) = SpinHandle::new(task);
        handle.cancel();
        handle.cancel();
        assert!(handle.is_cancelled());
    }
}
