//! Search index queries (`_search`)

use crate::database::{Database, Scope};
use crate::error::{CloudantError, Result};
use crate::model::{SearchResult, DESIGN_PREFIX};
use crate::transport::HttpRequest;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Split `ddoc/index` (optionally `_design/ddoc/index`) into its parts.
fn parse_index_id(index_id: &str) -> Result<(String, String)> {
    let trimmed = index_id.strip_prefix(DESIGN_PREFIX).unwrap_or(index_id);
    match trimmed.split_once('/') {
        Some((ddoc, index)) if !ddoc.is_empty() && !index.is_empty() && !index.contains('/') => {
            Ok((ddoc.to_string(), index.to_string()))
        }
        _ => Err(CloudantError::InvalidArgument(format!(
            "Search index id '{}' must have the form 'design_doc/index_name'",
            index_id
        ))),
    }
}

pub struct SearchRequest {
    db: Database,
    scope: Scope,
    ddoc: String,
    index: String,
    limit: Option<u32>,
    include_docs: Option<bool>,
    bookmark: Option<String>,
    sort: Option<Value>,
}

impl SearchRequest {
    pub(crate) fn new(db: Database, scope: Scope, index_id: &str) -> Result<Self> {
        let (ddoc, index) = parse_index_id(index_id)?;
        Ok(Self {
            db,
            scope,
            ddoc,
            index,
            limit: None,
            include_docs: None,
            bookmark: None,
            sort: None,
        })
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn include_docs(mut self, include_docs: bool) -> Self {
        self.include_docs = Some(include_docs);
        self
    }

    /// Continue from the bookmark of a previous page.
    pub fn bookmark(mut self, bookmark: impl Into<String>) -> Self {
        self.bookmark = Some(bookmark.into());
        self
    }

    /// Sort by a field (`"-price<number>"`) or a JSON array of fields.
    pub fn sort(mut self, sort: impl Into<Value>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    fn path(&self) -> Vec<String> {
        let mut path = self.scope.prefix(self.db.name());
        path.extend([
            "_design".to_string(),
            self.ddoc.clone(),
            "_search".to_string(),
            self.index.clone(),
        ]);
        path
    }

    fn body(&self, query: &str) -> Value {
        let mut body = Map::new();
        body.insert("query".to_string(), Value::from(query));
        if let Some(limit) = self.limit {
            body.insert("limit".to_string(), Value::from(limit));
        }
        if let Some(include_docs) = self.include_docs {
            body.insert("include_docs".to_string(), Value::from(include_docs));
        }
        if let Some(bookmark) = &self.bookmark {
            body.insert("bookmark".to_string(), Value::from(bookmark.as_str()));
        }
        if let Some(sort) = &self.sort {
            body.insert("sort".to_string(), sort.clone());
        }
        Value::Object(body)
    }

    /// Run a Lucene query and decode rows with documents of type `T`.
    pub async fn query_search_result<T: DeserializeOwned>(
        &self,
        query: &str,
    ) -> Result<SearchResult<T>> {
        let request = HttpRequest::post(self.path()).json(self.body(query));
        self.db.execute(request).await?.into_json()
    }
}
