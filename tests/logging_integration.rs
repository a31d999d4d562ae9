//! File logging. Runs in its own test binary because it installs the global
//! subscriber.

use std::fs;

use lio::infrastructure::logging::{LogConfig, LogFormat, LoggerImpl, RotationPolicy};
use tempfile::TempDir;
use tracing::info;

#[test]
fn test_logger_writes_json_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = LogConfig {
        level: "info".to_string(),
        format: LogFormat::Json,
        log_dir: Some(temp_dir.path().to_path_buf()),
        rotation: RotationPolicy::Never,
    };

    let logger = LoggerImpl::init(&config).unwrap();
    assert!(logger.writes_file());
    info!(trial_id = 3, fitness = 0.25, "trial finished");

    // A second subscriber cannot be installed
    assert!(LoggerImpl::init(&LogConfig::default()).is_err());

    // Dropping the logger flushes the non-blocking writer
    drop(logger);

    let contents = fs::read_to_string(temp_dir.path().join("lio.log")).unwrap();
    let line = contents
        .lines()
        .find(|l| l.contains("trial finished"))
        .expect("event should be logged");
    let event: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(event["fields"]["trial_id"], 3);
    assert_eq!(event["level"], "INFO");
}
