//! View requests
//!
//! Built from [`Database::view_request_builder`] or, for partitioned
//! databases, [`crate::database::Partition::view_request_builder`].

use crate::database::{Database, Scope};
use crate::error::{CloudantError, Result};
use crate::model::{ViewResponse, DESIGN_PREFIX};
use crate::transport::HttpRequest;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::marker::PhantomData;

/// Names a view; `new_request` fixes its key and value types.
pub struct ViewRequestBuilder {
    db: Database,
    scope: Scope,
    ddoc: String,
    view: String,
}

impl ViewRequestBuilder {
    pub(crate) fn new(db: Database, scope: Scope, ddoc: &str, view: &str) -> Self {
        Self {
            db,
            scope,
            ddoc: ddoc.strip_prefix(DESIGN_PREFIX).unwrap_or(ddoc).to_string(),
            view: view.to_string(),
        }
    }

    pub fn new_request<K, V>(self) -> ViewRequest<K, V>
    where
        K: Serialize + DeserializeOwned,
        V: DeserializeOwned,
    {
        ViewRequest {
            db: self.db,
            scope: self.scope,
            ddoc: self.ddoc,
            view: self.view,
            params: ViewParams::default(),
            key: None,
            keys: None,
            start_key: None,
            end_key: None,
            _value: PhantomData,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct ViewParams {
    limit: Option<u64>,
    skip: Option<u64>,
    descending: Option<bool>,
    include_docs: Option<bool>,
    reduce: Option<bool>,
    group: Option<bool>,
    group_level: Option<u32>,
    inclusive_end: Option<bool>,
}

/// A configured view query with key type `K` and value type `V`.
pub struct ViewRequest<K, V> {
    db: Database,
    scope: Scope,
    ddoc: String,
    view: String,
    params: ViewParams,
    key: Option<K>,
    keys: Option<Vec<K>>,
    start_key: Option<K>,
    end_key: Option<K>,
    _value: PhantomData<fn() -> V>,
}

impl<K, V> ViewRequest<K, V>
where
    K: Serialize + DeserializeOwned,
    V: DeserializeOwned,
{
    pub fn limit(mut self, limit: u64) -> Self {
        self.params.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.params.skip = Some(skip);
        self
    }

    pub fn descending(mut self, descending: bool) -> Self {
        self.params.descending = Some(descending);
        self
    }

    pub fn include_docs(mut self, include_docs: bool) -> Self {
        self.params.include_docs = Some(include_docs);
        self
    }

    pub fn reduce(mut self, reduce: bool) -> Self {
        self.params.reduce = Some(reduce);
        self
    }

    pub fn group(mut self, group: bool) -> Self {
        self.params.group = Some(group);
        self
    }

    pub fn group_level(mut self, level: u32) -> Self {
        self.params.group_level = Some(level);
        self
    }

    pub fn inclusive_end(mut self, inclusive_end: bool) -> Self {
        self.params.inclusive_end = Some(inclusive_end);
        self
    }

    pub fn key(mut self, key: K) -> Self {
        self.key = Some(key);
        self
    }

    /// Fetch exactly these keys; sent as a POST body.
    pub fn keys(mut self, keys: Vec<K>) -> Self {
        self.keys = Some(keys);
        self
    }

    pub fn start_key(mut self, key: K) -> Self {
        self.start_key = Some(key);
        self
    }

    pub fn end_key(mut self, key: K) -> Self {
        self.end_key = Some(key);
        self
    }

    pub(crate) fn path(&self) -> Vec<String> {
        let mut path = self.scope.prefix(self.db.name());
        path.extend([
            "_design".to_string(),
            self.ddoc.clone(),
            "_view".to_string(),
            self.view.clone(),
        ]);
        path
    }

    /// Query string pairs; keys are JSON encoded.
    pub(crate) fn query_params(&self) -> Result<Vec<(String, String)>> {
        let mut params = Vec::new();
        let p = &self.params;
        let mut push = |name: &str, value: Option<String>| {
            if let Some(value) = value {
                params.push((name.to_string(), value));
            }
        };
        push("limit", p.limit.map(|v| v.to_string()));
        push("skip", p.skip.map(|v| v.to_string()));
        push("descending", p.descending.map(|v| v.to_string()));
        push("include_docs", p.include_docs.map(|v| v.to_string()));
        push("reduce", p.reduce.map(|v| v.to_string()));
        push("group", p.group.map(|v| v.to_string()));
        push("group_level", p.group_level.map(|v| v.to_string()));
        push("inclusive_end", p.inclusive_end.map(|v| v.to_string()));
        push("key", self.key.as_ref().map(encode_key).transpose()?);
        push("startkey", self.start_key.as_ref().map(encode_key).transpose()?);
        push("endkey", self.end_key.as_ref().map(encode_key).transpose()?);
        Ok(params)
    }

    fn http_request(&self) -> Result<HttpRequest> {
        let path = self.path();
        let mut request = match &self.keys {
            Some(keys) => {
                let keys = serde_json::to_value(keys).map_err(|e| {
                    CloudantError::InvalidArgument(format!("Failed to encode view keys: {}", e))
                })?;
                HttpRequest::post(path).json(json!({ "keys": keys }))
            }
            None => HttpRequest::get(path),
        };
        for (name, value) in self.query_params()? {
            request = request.query(name, value);
        }
        Ok(request)
    }

    pub async fn response(&self) -> Result<ViewResponse<K, V>> {
        let request = self.http_request()?;
        self.db.execute(request).await?.into_json()
    }
}

fn encode_key<K: Serialize>(key: &K) -> Result<String> {
    serde_json::to_string(key)
        .map_err(|e| CloudantError::InvalidArgument(format!("Failed to encode view key: {}", e)))
}
