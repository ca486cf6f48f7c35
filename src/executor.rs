//! Scheduling contexts that stream delivery can be shifted onto.
//!
//! An [`Executor`] decides which context polls a pipeline: the caller
//! (`Inline`), a tokio runtime, or a dedicated serial thread. Shifting a
//! stream onto an executor is done by [`crate::stream::observe_on`].

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use futures::future::BoxFuture;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::config::{ExecutorConfig, ExecutorKind, DEFAULT_CHANNEL_CAPACITY};

static NEXT_SERIAL_ID: AtomicUsize = AtomicUsize::new(1);

/// Errors that can occur when creating or scheduling onto an executor.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Failed to spawn executor thread '{name}': {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No tokio runtime available to schedule work on")]
    NoRuntime,

    #[error("Executor '{name}' has shut down")]
    Closed { name: String },
}

#[derive(Clone)]
enum Kind {
    Inline,
    Runtime(Handle),
    Serial(SerialExecutor),
}

/// An opaque scheduling context.
///
/// Cloning is cheap and clones share the same context.
#[derive(Clone)]
pub struct Executor {
    kind: Kind,
    capacity: usize,
}

impl Executor {
    /// No hand-off: values are delivered in whatever context polls the stream.
    pub fn inline() -> Self {
        Self {
            kind: Kind::Inline,
            capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Spawn onto the given tokio runtime.
    pub fn runtime(handle: Handle) -> Self {
        Self {
            kind: Kind::Runtime(handle),
            capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Spawn onto the runtime the caller is running in.
    pub fn current() -> Result<Self, ExecutorError> {
        Handle::try_current()
            .map(Self::runtime)
            .map_err(|_| ExecutorError::NoRuntime)
    }

    /// A fresh, independent serial context backed by its own thread.
    pub fn serial() -> Result<Self, ExecutorError> {
        Self::from_config(&ExecutorConfig {
            kind: ExecutorKind::Serial,
            ..ExecutorConfig::default()
        })
    }

    /// Build an executor as described by configuration.
    pub fn from_config(config: &ExecutorConfig) -> Result<Self, ExecutorError> {
        let kind = match config.kind {
            ExecutorKind::Inline => Kind::Inline,
            ExecutorKind::Current => {
                Kind::Runtime(Handle::try_current().map_err(|_| ExecutorError::NoRuntime)?)
            }
            ExecutorKind::Serial => Kind::Serial(SerialExecutor::with_config(config)?),
        };
        Ok(Self {
            kind,
            capacity: config.channel_capacity.max(1),
        })
    }

    /// Bound of the hand-off channel used when shifting a stream onto this executor.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_inline(&self) -> bool {
        matches!(self.kind, Kind::Inline)
    }

    /// Schedule `work` to run to completion on this executor.
    ///
    /// `Inline` has no context of its own, so its work goes to the ambient
    /// tokio runtime.
    pub fn schedule<F>(&self, work: F) -> Result<(), ExecutorError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match &self.kind {
            Kind::Inline => {
                let handle = Handle::try_current().map_err(|_| ExecutorError::NoRuntime)?;
                handle.spawn(work);
                Ok(())
            }
            Kind::Runtime(handle) => {
                handle.spawn(work);
                Ok(())
            }
            Kind::Serial(serial) => serial.schedule(Box::pin(work)),
        }
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::inline()
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.kind {
            Kind::Inline => "inline".to_string(),
            Kind::Runtime(_) => "runtime".to_string(),
            Kind::Serial(serial) => format!("serial({})", serial.name()),
        };
        f.debug_struct("Executor")
            .field("kind", &kind)
            .field("capacity", &self.capacity)
            .finish()
    }
}

/// A dedicated thread running a current-thread tokio runtime.
///
/// Everything scheduled here shares one thread, so no two pieces of work
/// ever run at the same time. The thread exits once every clone is dropped
/// and all work scheduled on it has finished.
#[derive(Clone)]
pub struct SerialExecutor {
    inner: Arc<SerialInner>,
}

struct SerialInner {
    name: String,
    sender: mpsc::UnboundedSender<BoxFuture<'static, ()>>,
}

impl SerialExecutor {
    pub fn new() -> Result<Self, ExecutorError> {
        Self::with_config(&ExecutorConfig::default())
    }

    pub fn with_config(config: &ExecutorConfig) -> Result<Self, ExecutorError> {
        let id = NEXT_SERIAL_ID.fetch_add(1, Ordering::Relaxed);
        let name = format!("{}-{}", config.thread_name, id);
        let (sender, receiver) = mpsc::unbounded_channel();

        let thread_name = name.clone();
        thread::Builder::new()
            .name(name.clone())
            .spawn(move || run_serial(thread_name, receiver))
            .map_err(|source| ExecutorError::Spawn {
                name: name.clone(),
                source,
            })?;

        Ok(Self {
            inner: Arc::new(SerialInner { name, sender }),
        })
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    fn schedule(&self, work: BoxFuture<'static, ()>) -> Result<(), ExecutorError> {
        self.inner
            .sender
            .send(work)
            .map_err(|_| ExecutorError::Closed {
                name: self.inner.name.clone(),
            })
    }
}

fn run_serial(name: String, mut receiver: mpsc::UnboundedReceiver<BoxFuture<'static, ()>>) {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!(executor = %name, "Failed to build serial runtime: {}", err);
            return;
        }
    };

    tracing::debug!(executor = %name, "Serial executor started");
    runtime.block_on(async {
        let mut tasks = JoinSet::new();
        loop {
            tokio::select! {
                work = receiver.recv() => match work {
                    Some(work) => {
                        tasks.spawn(work);
                    }
                    None => break,
                },
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }
        // Every handle is gone; keep serving the work already running.
        tracing::debug!(executor = %name, pending = tasks.len(), "Serial executor draining");
        while tasks.join_next().await.is_some() {}
    });
    tracing::debug!(executor = %name, "Serial executor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc as std_mpsc;
    use std::time::Duration;

    #[test]
    fn test_schedule_inline_without_runtime_fails() {
        let result = Executor::inline().schedule(async {});
        assert!(matches!(result, Err(ExecutorError::NoRuntime)));
    }

    #[test]
    fn test_serial_executor_runs_on_named_thread() {
        let executor = SerialExecutor::new().unwrap();
        let (tx, rx) = std_mpsc::channel();
        executor
            .schedule(Box::pin(async move {
                let name = thread::current().name().map(str::to_string);
                tx.send(name).unwrap();
            }))
            .unwrap();

        let name = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(name.as_deref(), Some(executor.name()));
        assert!(executor.name().starts_with("spinloop-serial-"));
    }

    #[test]
    fn test_work_outlives_dropped_executor() {
        let executor = SerialExecutor::new().unwrap();
        let (ready_tx, ready_rx) = std_mpsc::channel::<()>();
        let (done_tx, done_rx) = std_mpsc::channel();
        executor
            .schedule(Box::pin(async move {
                let _ = ready_tx.send(());
                tokio::time::sleep(Duration::from_millis(50)).await;
                done_tx.send(thread::current().name().map(str::to_string)).unwrap();
            }))
            .unwrap();
        ready_rx.recv_timeout(Duration::from_secs(5)).unwrap();

        let name = executor.name().to_string();
        drop(executor);
        let ran_on = done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(ran_on.as_deref(), Some(name.as_str()));
    }

    #[test]
    fn test_serial_executors_are_independent() {
        let a = SerialExecutor::new().unwrap();
        let b = SerialExecutor::new().unwrap();
        assert_ne!(a.name(), b.name());
    }

    #[test]
    fn test_capacity_is_never_zero() {
        let executor = Executor::inline().with_capacity(0);
        assert_eq!(executor.capacity(), 1);
    }
}
