mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{Config, ExecutorConfig, ExecutorKind, DEFAULT_CHANNEL_CAPACITY};
