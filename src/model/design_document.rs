//! Design documents

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const DESIGN_PREFIX: &str = "_design/";

/// Prefix `id` with `_design/` unless it already has it.
pub fn ensure_design_prefix(id: &str) -> String {
    if id.starts_with(DESIGN_PREFIX) {
        id.to_string()
    } else {
        format!("{}{}", DESIGN_PREFIX, id)
    }
}

/// A view definition.
///
/// `map` is a JavaScript function source for map/reduce views and an object
/// (`{"fields": {...}}`) for views backing `language: "query"` indexes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapReduce {
    pub map: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduce: Option<String>,

    /// Per-view fields this client does not model (options, dbcopy, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MapReduce {
    pub fn new(map: impl Into<String>) -> Self {
        Self {
            map: Value::String(map.into()),
            ..Self::default()
        }
    }

    pub fn with_reduce(mut self, reduce: impl Into<String>) -> Self {
        self.reduce = Some(reduce.into());
        self
    }

    /// The map function source, `None` for query-index views.
    pub fn map_function(&self) -> Option<&str> {
        self.map.as_str()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignDocument {
    #[serde(rename = "_id")]
    id: String,

    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub views: BTreeMap<String, MapReduce>,

    /// Search index definitions, e.g. `{"search": {"index": "function(doc) {...}"}}`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub indexes: BTreeMap<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<BTreeMap<String, bool>>,

    /// Fields this client does not model (validate_doc_update, filters, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DesignDocument {
    pub fn new(id: &str) -> Self {
        Self {
            id: ensure_design_prefix(id),
            ..Self::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Id without the `_design/` prefix.
    pub fn name(&self) -> &str {
        self.id.strip_prefix(DESIGN_PREFIX).unwrap_or(&self.id)
    }

    pub fn set_id(&mut self, id: &str) {
        self.id = ensure_design_prefix(id);
    }

    pub fn set_option(&mut self, name: impl Into<String>, value: bool) {
        self.options
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value);
    }

    pub fn set_partitioned(&mut self, partitioned: bool) {
        self.set_option("partitioned", partitioned);
    }

    pub fn is_partitioned(&self) -> bool {
        self.options
            .as_ref()
            .and_then(|o| o.get("partitioned").copied())
            .unwrap_or(false)
    }

    pub fn add_view(&mut self, name: impl Into<String>, view: MapReduce) {
        self.views.insert(name.into(), view);
    }

    /// Add a search index from its index function source.
    pub fn add_search_index(&mut self, name: impl Into<String>, index_function: impl Into<String>) {
        let mut definition = Map::new();
        definition.insert("index".to_string(), Value::String(index_function.into()));
        self.indexes.insert(name.into(), Value::Object(definition));
    }
}
