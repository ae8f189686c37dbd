//! Integration tests for subscriber installation
//!
//! A global subscriber can be installed once per process, so everything that
//! touches `init_logging` lives in a single test.

use super::test_utils::with_env;
use cloudant_link::logging::{init_logging, LoggingConfig};
use cloudant_link::CloudantError;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_file_logging_then_second_init_fails() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("state").join("logs").join("client.log");
    let config = LoggingConfig {
        level: "info".to_string(),
        format: "json".to_string(),
        output: "file".to_string(),
        file: log_path.clone(),
        ..LoggingConfig::default()
    };

    with_env(&temp_dir, || {
        init_logging(Some(&config)).unwrap();
        tracing::info!(db = "orders", "Logging to file");

        assert!(
            log_path.exists(),
            "log file should exist at {}",
            log_path.display()
        );
        let content = fs::read_to_string(&log_path).unwrap();
        let event: serde_json::Value = content
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .find(|event: &serde_json::Value| event["fields"]["message"] == "Logging to file")
            .expect("event should be written as a JSON line");
        assert_eq!(event["level"], "INFO");
        assert_eq!(event["fields"]["db"], "orders");

        let err = init_logging(None).unwrap_err();
        assert!(matches!(err, CloudantError::ConfigError(_)));
    });
}
