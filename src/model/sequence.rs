//! Opaque sequence tokens
//!
//! `update_seq` and `purge_seq` change shape between server versions: bare
//! integers on CouchDB 1.x, composite strings (`"5-g1AAAA..."`) on clustered
//! servers, and occasionally arrays. The raw JSON value is kept as received and
//! only interpreted on demand.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// A sequence token exactly as the server sent it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Sequence(Value);

impl<'de> Deserialize<'de> for Sequence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Sequence::new)
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Sequence(Value::from(0))
    }
}

impl From<Value> for Sequence {
    fn from(value: Value) -> Self {
        Sequence::new(value)
    }
}

impl Sequence {
    /// Wrap a raw JSON value. `null` is treated as absent and becomes `0`.
    pub fn new(value: Value) -> Self {
        if value.is_null() {
            Sequence::default()
        } else {
            Sequence(value)
        }
    }

    /// The underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Textual rendering of the token.
    ///
    /// JSON strings render as their contents without quotes; every other shape
    /// renders as compact JSON text (`42`, `[1,"g1AA"]`).
    pub fn as_opaque_str(&self) -> String {
        match &self.0 {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Legacy integer reading of the token.
    ///
    /// Returns the value for integer numbers that fit in an `i64` and for
    /// strings that parse as one. Any other shape (arrays, objects, floats,
    /// booleans, composite strings) yields `0`, even when the server holds a
    /// non-zero sequence in a newer format.
    pub fn legacy_as_i64(&self) -> i64 {
        let coerced = match &self.0 {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse::<i64>().ok(),
            _ => None,
        };
        coerced.unwrap_or_else(|| {
            debug!(sequence = %self.0, "Sequence is not a scalar integer, reading as 0");
            0
        })
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_opaque_str())
    }
}
