//! Merge rules: defaults first, later sources override earlier ones.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("url", super::DEFAULT_URL)?
        .set_default("connect_timeout_secs", 10)?
        .set_default("request_timeout_secs", 60)
}
