//! Integration tests for configuration loading

use super::test_utils::with_env;
use cloudant_link::{ClientConfig, CloudantClient, CloudantError, ConfigLoader};
use tempfile::TempDir;

#[test]
fn test_defaults_without_sources() {
    let temp_dir = TempDir::new().unwrap();
    let config = with_env(&temp_dir, || ConfigLoader::load().unwrap());
    assert_eq!(config, ClientConfig::default());
}

#[test]
fn test_explicit_file_overrides_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("client.toml");
    std::fs::write(
        &config_file,
        r#"
url = "https://account.cloudant.com"
username = "admin"
password = "secret"
request_timeout_secs = 5

[logging]
level = "debug"
format = "json"
"#,
    )
    .unwrap();

    let config = with_env(&temp_dir, || ConfigLoader::load_from_file(&config_file).unwrap());
    assert_eq!(config.url, "https://account.cloudant.com");
    assert_eq!(config.username.as_deref(), Some("admin"));
    assert_eq!(config.request_timeout_secs, 5);
    assert_eq!(config.connect_timeout_secs, 10);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");

    let client = CloudantClient::from_config(&config);
    assert!(client.is_ok());
}

#[test]
fn test_user_file_then_environment() {
    let temp_dir = TempDir::new().unwrap();
    let user_dir = temp_dir.path().join("cloudant");
    std::fs::create_dir_all(&user_dir).unwrap();
    std::fs::write(
        user_dir.join("config.toml"),
        "url = \"http://couch.internal:5984\"\nconnect_timeout_secs = 3\n",
    )
    .unwrap();

    let config = with_env(&temp_dir, || {
        std::env::set_var("CLOUDANT_URL", "http://override:5984");
        std::env::set_var("CLOUDANT_LOGGING__LEVEL", "warn");
        ConfigLoader::load().unwrap()
    });
    assert_eq!(config.url, "http://override:5984");
    assert_eq!(config.connect_timeout_secs, 3);
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("absent.toml");
    let err = with_env(&temp_dir, || ConfigLoader::load_from_file(&missing).unwrap_err());
    assert!(matches!(err, CloudantError::ConfigError(_)));
}

#[test]
fn test_invalid_values_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("bad.toml");
    std::fs::write(&config_file, "password = \"secret\"\n").unwrap();

    let err = with_env(&temp_dir, || ConfigLoader::load_from_file(&config_file).unwrap_err());
    assert!(matches!(err, CloudantError::ConfigError(_)));
}
