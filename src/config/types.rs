use serde::{Deserialize, Serialize};

/// Bound of the hand-off channel between executors when nothing else is configured.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub executor: ExecutorConfig,
}

/// Which scheduling context an executor built from config uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorKind {
    /// Deliver in the polling context.
    Inline,
    /// The tokio runtime the executor is built in.
    Current,
    /// A fresh dedicated thread.
    #[default]
    Serial,
}

/// Executor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    #[serde(default)]
    pub kind: ExecutorKind,
    /// Name prefix for serial executor threads (default: "spinloop-serial").
    #[serde(default = "default_thread_name")]
    pub thread_name: String,
    /// Bound of the channel used to hand values across executors (default: 64).
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_thread_name() -> String {
    "spinloop-serial".to_string()
}

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            kind: ExecutorKind::default(),
            thread_name: default_thread_name(),
            channel_capacity: default_channel_capacity(),
        }
    }
}
