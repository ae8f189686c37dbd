//! Documents and write responses

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON document with its identity fields split out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,

    /// Remaining document fields
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Partition key of a partitioned document id (`"keyA:doc1"` -> `"keyA"`).
    pub fn partition_key(&self) -> Option<&str> {
        self.id.split_once(':').map(|(key, _)| key)
    }
}

/// Result of a single document write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentResponse {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub rev: Option<String>,

    #[serde(default)]
    pub ok: Option<bool>,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub reason: Option<String>,
}

impl DocumentResponse {
    /// True unless the server reported an error for this document.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_flattens_fields() {
        let doc = Document::new("keyA:doc0").with_field("foo", "bar");
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value, json!({"_id": "keyA:doc0", "foo": "bar"}));
        assert_eq!(doc.partition_key(), Some("keyA"));

        let back: Document =
            serde_json::from_value(json!({"_id": "x", "_rev": "1-a", "n": 3})).unwrap();
        assert_eq!(back.rev.as_deref(), Some("1-a"));
        assert_eq!(back.fields.get("n"), Some(&json!(3)));
        assert_eq!(back.partition_key(), None);
    }

    #[test]
    fn test_bulk_row_with_error() {
        let row: DocumentResponse =
            serde_json::from_value(json!({"id": "a", "error": "conflict", "reason": "Document update conflict."}))
                .unwrap();
        assert!(!row.is_ok());
        assert_eq!(row.rev, None);
    }
}
