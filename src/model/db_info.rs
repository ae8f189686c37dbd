//! Database status (`GET /{db}`)
//!
//! The status document drifts across server versions. Decoding only fails when
//! the payload is not a JSON object or lacks `db_name`; every other field falls
//! back to its zero value when absent or oddly shaped.

use super::lenient::{
    bool_field, count_text_field, kind_of, object_field, sequence_field, string_field, u32_field,
    u64_field, Object,
};
use super::sequence::Sequence;
use crate::error::{CloudantError, Result};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Database properties (`props`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbProps {
    #[serde(default)]
    partitioned: bool,
}

impl DbProps {
    pub fn partitioned(&self) -> bool {
        self.partitioned
    }

    fn from_object(map: Option<&Object>) -> Self {
        Self {
            partitioned: map.map(|m| bool_field(m, "partitioned")).unwrap_or(false),
        }
    }
}

/// Storage sizes in bytes (`sizes`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbSizes {
    #[serde(default)]
    file: u64,
    #[serde(default)]
    external: u64,
    #[serde(default)]
    active: u64,
}

impl DbSizes {
    /// Size of the database file on disk.
    pub fn file(&self) -> u64 {
        self.file
    }

    /// Uncompressed size of the stored data.
    pub fn external(&self) -> u64 {
        self.external
    }

    /// Size of live data inside the file.
    pub fn active(&self) -> u64 {
        self.active
    }

    pub(crate) fn from_object(map: Option<&Object>) -> Self {
        match map {
            Some(m) => Self {
                file: u64_field(m, "file"),
                external: u64_field(m, "external"),
                active: u64_field(m, "active"),
            },
            None => Self::default(),
        }
    }
}

/// Information about a database instance.
///
/// Immutable once decoded; read it through the accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DbInfo {
    db_name: String,
    doc_count: u64,
    doc_del_count: String,
    update_seq: Sequence,
    purge_seq: Sequence,
    compact_running: bool,
    disk_size: u64,
    instance_start_time: u64,
    disk_format_version: u32,
    sizes: DbSizes,
    props: DbProps,
}

impl DbInfo {
    /// Decode a raw response body.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(CloudantError::MalformedPayload(
                "empty database info payload".to_string(),
            ));
        }
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| CloudantError::MalformedPayload(format!("invalid JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Decode an already parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::from_object(&map),
            other => Err(CloudantError::MalformedPayload(format!(
                "expected a JSON object, got {}",
                kind_of(&other)
            ))),
        }
    }

    fn from_object(map: &Object) -> Result<Self> {
        let db_name = match map.get("db_name") {
            Some(Value::String(name)) => name.clone(),
            Some(other) => {
                return Err(CloudantError::MalformedPayload(format!(
                    "db_name must be a string, got {}",
                    kind_of(other)
                )))
            }
            None => {
                return Err(CloudantError::MalformedPayload(
                    "missing required field db_name".to_string(),
                ))
            }
        };

        Ok(Self {
            db_name,
            doc_count: u64_field(map, "doc_count"),
            doc_del_count: count_text_field(map, "doc_del_count"),
            update_seq: sequence_field(map, "update_seq"),
            purge_seq: sequence_field(map, "purge_seq"),
            compact_running: bool_field(map, "compact_running"),
            disk_size: u64_field(map, "disk_size"),
            instance_start_time: u64_field(map, "instance_start_time"),
            disk_format_version: u32_field(map, "disk_format_version"),
            sizes: DbSizes::from_object(object_field(map, "sizes")),
            props: DbProps::from_object(object_field(map, "props")),
        })
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    pub fn doc_count(&self) -> u64 {
        self.doc_count
    }

    /// Deleted document count, kept as the text the server sent.
    pub fn doc_del_count(&self) -> &str {
        &self.doc_del_count
    }

    /// Current update sequence rendered as text. Never parse it.
    pub fn update_seq(&self) -> String {
        self.update_seq.as_opaque_str()
    }

    pub fn update_sequence(&self) -> &Sequence {
        &self.update_seq
    }

    /// Number of purge operations on the database.
    ///
    /// Returns `0` when `purge_seq` cannot be read as a single integer. From
    /// CouchDB 2.3 onwards `purge_seq` is an opaque string, so this reads `0`
    /// even for databases that have been purged.
    #[deprecated(note = "use `string_purge_seq` instead")]
    pub fn purge_seq(&self) -> i64 {
        self.purge_seq.legacy_as_i64()
    }

    /// Opaque description of the purge state across the database.
    pub fn string_purge_seq(&self) -> String {
        self.purge_seq.as_opaque_str()
    }

    pub fn purge_sequence(&self) -> &Sequence {
        &self.purge_seq
    }

    pub fn is_compact_running(&self) -> bool {
        self.compact_running
    }

    pub fn disk_size(&self) -> u64 {
        self.disk_size
    }

    /// Instance start time in microseconds.
    pub fn instance_start_time(&self) -> u64 {
        self.instance_start_time
    }

    pub fn disk_format_version(&self) -> u32 {
        self.disk_format_version
    }

    pub fn sizes(&self) -> DbSizes {
        self.sizes
    }

    pub fn props(&self) -> DbProps {
        self.props
    }

    pub fn is_partitioned(&self) -> bool {
        self.props.partitioned
    }
}

impl FromStr for DbInfo {
    type Err = CloudantError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_slice(s.as_bytes())
    }
}

impl<'de> Deserialize<'de> for DbInfo {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Object::deserialize(deserializer)?;
        DbInfo::from_object(&map).map_err(de::Error::custom)
    }
}

impl fmt::Display for DbInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DbInfo [db_name={}, doc_count={}, doc_del_count={}, update_seq={}, purge_seq={}, \
             compact_running={}, disk_size={}, instance_start_time={}, disk_format_version={}, \
             partitioned={}]",
            self.db_name,
            self.doc_count,
            self.doc_del_count,
            self.update_seq,
            self.purge_seq,
            self.compact_running,
            self.disk_size,
            self.instance_start_time,
            self.disk_format_version,
            self.props.partitioned
        )
    }
}

/// Partition status (`GET /{db}/_partition/{key}`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionInfo {
    db_name: String,
    partition: String,
    doc_count: u64,
    doc_del_count: u64,
    sizes: DbSizes,
}

impl PartitionInfo {
    pub fn from_value(value: Value) -> Result<Self> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(CloudantError::MalformedPayload(format!(
                    "expected a JSON object, got {}",
                    kind_of(&other)
                )))
            }
        };
        let db_name = string_field(&map, "db_name").ok_or_else(|| {
            CloudantError::MalformedPayload("missing required field db_name".to_string())
        })?;

        Ok(Self {
            db_name,
            partition: string_field(&map, "partition").unwrap_or_default(),
            doc_count: u64_field(&map, "doc_count"),
            doc_del_count: u64_field(&map, "doc_del_count"),
            sizes: DbSizes::from_object(object_field(&map, "sizes")),
        })
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    pub fn partition(&self) -> &str {
        &self.partition
    }

    pub fn doc_count(&self) -> u64 {
        self.doc_count
    }

    pub fn doc_del_count(&self) -> u64 {
        self.doc_del_count
    }

    pub fn sizes(&self) -> DbSizes {
        self.sizes
    }
}

impl<'de> Deserialize<'de> for PartitionInfo {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        PartitionInfo::from_value(value).map_err(de::Error::custom)
    }
}
