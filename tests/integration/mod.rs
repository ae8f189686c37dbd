//! Integration tests for the Cloudant client

mod config_loading;
mod logging_init;
mod partitioned_database;
mod test_utils;
