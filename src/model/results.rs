//! Response bodies for views, search and query

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of a view response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRow<K, V> {
    /// Absent on reduced rows
    #[serde(default)]
    pub id: Option<String>,
    pub key: K,
    pub value: V,
    #[serde(default)]
    pub doc: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewResponse<K, V> {
    #[serde(default)]
    pub total_rows: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
    pub rows: Vec<ViewRow<K, V>>,
}

impl<K, V> ViewResponse<K, V> {
    pub fn rows(&self) -> &[ViewRow<K, V>] {
        &self.rows
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.rows.iter().map(|row| &row.key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultRow<T> {
    pub id: String,
    #[serde(default)]
    pub order: Vec<Value>,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default = "Option::default")]
    pub doc: Option<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult<T> {
    #[serde(default)]
    pub total_rows: u64,
    #[serde(default)]
    pub bookmark: Option<String>,
    #[serde(default = "Vec::new")]
    pub rows: Vec<SearchResultRow<T>>,
    #[serde(default)]
    pub counts: Option<Value>,
    #[serde(default)]
    pub ranges: Option<Value>,
}

impl<T> SearchResult<T> {
    pub fn rows(&self) -> &[SearchResultRow<T>] {
        &self.rows
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult<T> {
    #[serde(default = "Vec::new")]
    pub docs: Vec<T>,
    /// Set when the server could not use a suitable index
    #[serde(default)]
    pub warning: Option<String>,
    #[serde(default)]
    pub bookmark: Option<String>,
    #[serde(default)]
    pub execution_stats: Option<Value>,
}

impl<T> QueryResult<T> {
    pub fn docs(&self) -> &[T] {
        &self.docs
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }
}

/// Response to `POST /{db}/_index`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexResponse {
    /// `created` or `exists`
    pub result: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Document;
    use serde_json::json;

    #[test]
    fn test_view_response_rows() {
        let response: ViewResponse<String, u32> = serde_json::from_value(json!({
            "total_rows": 2,
            "offset": 0,
            "rows": [
                {"id": "keyA:doc0", "key": "keyA:doc0", "value": 1},
                {"id": "keyA:doc3", "key": "keyA:doc3", "value": 1}
            ]
        }))
        .unwrap();
        assert_eq!(response.rows().len(), 2);
        assert!(response.keys().all(|k| k.starts_with("keyA")));
    }

    #[test]
    fn test_reduced_view_row_without_id() {
        let response: ViewResponse<Value, u64> =
            serde_json::from_value(json!({"rows": [{"key": null, "value": 30}]})).unwrap();
        assert_eq!(response.rows[0].id, None);
        assert_eq!(response.total_rows, None);
    }

    #[test]
    fn test_search_result_with_docs() {
        let result: SearchResult<Document> = serde_json::from_value(json!({
            "total_rows": 1,
            "bookmark": "g2wAAAAB",
            "rows": [{
                "id": "keyB:doc1",
                "order": [1.0, 0],
                "fields": {"id": "keyB:doc1"},
                "doc": {"_id": "keyB:doc1", "_rev": "1-x", "foo": "bar"}
            }]
        }))
        .unwrap();
        assert_eq!(result.total_rows, 1);
        let row = &result.rows()[0];
        assert_eq!(row.doc.as_ref().map(|d| d.id.as_str()), Some("keyB:doc1"));
    }

    #[test]
    fn test_query_result_warning() {
        let result: QueryResult<Document> = serde_json::from_value(json!({
            "docs": [{"_id": "keyC:doc2", "foo": "bar"}],
            "warning": "No matching index found, create an index to optimize query time."
        }))
        .unwrap();
        assert_eq!(result.docs().len(), 1);
        assert!(result.warning().is_some());
    }
}
