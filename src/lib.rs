//! Cloudant Link: typed client for Cloudant and CouchDB
//!
//! Database status, documents, design documents, views, search indexes and
//! query, including the partition-scoped variants of partitioned databases.
//! Responses are decoded tolerantly: fields whose shape drifts between server
//! versions degrade to defaults instead of failing the request.

pub mod client;
pub mod config;
pub mod database;
pub mod design;
pub mod error;
pub mod logging;
pub mod model;
pub mod query;
pub mod search;
pub mod transport;
pub mod views;

pub use client::{CloudantClient, CloudantClientBuilder};
pub use config::{ClientConfig, ConfigLoader};
pub use database::{Database, Partition};
pub use design::DesignDocumentManager;
pub use error::{CloudantError, Result};
pub use model::{DbInfo, DbProps, PartitionInfo, Sequence};
