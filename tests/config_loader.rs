use spinloop::config::{Config, ConfigError, ExecutorKind};
use spinloop::Executor;
use std::fs;
use tempfile::TempDir;

fn write_config(content: &str) -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, content).expect("Failed to write config");
    (temp_dir, path)
}

#[test]
fn load_from_reads_executor_section() {
    let (_dir, path) = write_config(
        r#"
[executor]
kind = "inline"
thread_name = "reducer"
channel_capacity = 8
"#,
    );

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.executor.kind, ExecutorKind::Inline);
    assert_eq!(config.executor.thread_name, "reducer");
    assert_eq!(config.executor.channel_capacity, 8);
}

#[test]
fn missing_file_is_a_read_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = Config::load_from(&temp_dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::ReadError { .. })));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let (_dir, path) = write_config("[executor\nkind = ");
    let result = Config::load_from(&path);
    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn unknown_executor_kind_is_a_parse_error() {
    let (_dir, path) = write_config("[executor]\nkind = \"gpu\"\n");
    let result = Config::load_from(&path);
    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn zero_capacity_fails_validation() {
    let (_dir, path) = write_config("[executor]\nchannel_capacity = 0\n");
    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError { .. }));
    assert!(err.to_string().contains("channel_capacity"));
}

#[test]
fn blank_thread_name_fails_validation() {
    let mut config = Config::default();
    config.executor.thread_name = "  ".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError { .. })
    ));
}

#[test]
fn config_path_ends_with_crate_directory() {
    let path = Config::config_path();
    assert!(path.ends_with("spinloop/config.toml"));
}

#[test]
fn executor_from_config_respects_kind_and_capacity() {
    let (_dir, path) = write_config("[executor]\nkind = \"inline\"\nchannel_capacity = 3\n");
    let config = Config::load_from(&path).unwrap();
    let executor = Executor::from_config(&config.executor).unwrap();
    assert!(executor.is_inline());
    assert_eq!(executor.capacity(), 3);
}

#[test]
fn current_executor_needs_a_runtime() {
    let mut config = Config::default();
    config.executor.kind = ExecutorKind::Current;
    assert!(Executor::from_config(&config.executor).is_err());
}

#[tokio::test]
async fn serial_executor_from_config_uses_thread_name() {
    let (_dir, path) = write_config("[executor]\nkind = \"serial\"\nthread_name = \"loop-worker\"\n");
    let config = Config::load_from(&path).unwrap();
    let executor = Executor::from_config(&config.executor).unwrap();
    assert!(format!("{:?}", executor).contains("loop-worker-"));
}
