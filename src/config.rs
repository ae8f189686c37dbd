//! Client Configuration
//!
//! Layered configuration for the client: built-in defaults, the user config
//! file, an optional explicit file, then `CLOUDANT_*` environment variables.

use crate::error::CloudantError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod merge_policy;
mod sources;

pub use sources::global_file::global_config_path;

pub const DEFAULT_URL: &str = "http://127.0.0.1:5984";

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server base URL
    #[serde(default = "default_url")]
    pub url: String,

    /// Basic-auth user name
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            username: None,
            password: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("URL cannot be empty".to_string());
        }
        crate::transport::parse_base_url(&self.url).map_err(|e| e.to_string())?;
        if self.connect_timeout_secs == 0 {
            return Err("connect_timeout_secs must be greater than 0".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.password.is_some() && self.username.is_none() {
            return Err("password is set but username is missing".to_string());
        }
        Ok(())
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from defaults, the user config file and the environment.
    pub fn load() -> Result<ClientConfig, CloudantError> {
        Self::load_with(None)
    }

    /// As [`ConfigLoader::load`], with `path` layered above the user config file.
    pub fn load_from_file(path: &Path) -> Result<ClientConfig, CloudantError> {
        Self::load_with(Some(path))
    }

    fn load_with(path: Option<&Path>) -> Result<ClientConfig, CloudantError> {
        let mut builder = merge_policy::builder_with_defaults()?;
        builder = sources::global_file::add_to_builder(builder)?;
        if let Some(path) = path {
            builder = sources::explicit_file::add_to_builder(builder, path)?;
        }
        builder = sources::environment::add_to_builder(builder);

        let config: ClientConfig = builder.build()?.try_deserialize()?;
        config.validate().map_err(CloudantError::ConfigError)?;
        Ok(config)
    }
}
