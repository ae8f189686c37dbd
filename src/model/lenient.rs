//! Tolerant field extraction from loosely typed JSON objects.
//!
//! A field with an unexpected shape degrades to its zero value instead of
//! failing the whole decode.

use super::sequence::Sequence;
use serde_json::{Map, Value};

pub(crate) type Object = Map<String, Value>;

/// Unsigned integer from a number or a numeric string.
pub(crate) fn u64_field(map: &Object, key: &str) -> u64 {
    match map.get(key) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

pub(crate) fn u32_field(map: &Object, key: &str) -> u32 {
    u32::try_from(u64_field(map, key)).unwrap_or(0)
}

pub(crate) fn bool_field(map: &Object, key: &str) -> bool {
    map.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Count kept as text: strings verbatim, numbers in decimal, otherwise `"0"`.
pub(crate) fn count_text_field(map: &Object, key: &str) -> String {
    match map.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => "0".to_string(),
    }
}

pub(crate) fn string_field(map: &Object, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

pub(crate) fn sequence_field(map: &Object, key: &str) -> Sequence {
    map.get(key).cloned().map(Sequence::new).unwrap_or_default()
}

pub(crate) fn object_field<'a>(map: &'a Object, key: &str) -> Option<&'a Object> {
    map.get(key).and_then(Value::as_object)
}

/// Name of a JSON value's kind, for error messages.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
