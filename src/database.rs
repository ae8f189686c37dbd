//! Database handle
//!
//! Document CRUD, database status, and entry points to design documents,
//! views, search and query. [`Partition`] scopes the query operations to a
//! single partition of a partitioned database.

use crate::design::DesignDocumentManager;
use crate::error::{CloudantError, Result};
use crate::model::{DbInfo, DocumentResponse, IndexResponse, PartitionInfo, QueryResult};
use crate::search::SearchRequest;
use crate::transport::{HttpRequest, HttpResponse, Transport};
use crate::views::ViewRequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// Names of system databases accepted despite the leading underscore.
const SYSTEM_DATABASES: &[&str] = &["_users", "_replicator", "_global_changes"];

/// Check `name` against the server's database naming rules.
pub fn validate_db_name(name: &str) -> Result<()> {
    if SYSTEM_DATABASES.contains(&name) {
        return Ok(());
    }
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_lowercase() => chars.all(|c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || "_$()+-/".contains(c)
        }),
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(CloudantError::InvalidArgument(format!(
            "Invalid database name '{}': must start with a lowercase letter and contain only \
             a-z, 0-9 and _$()+-/",
            name
        )))
    }
}

/// Check a partition key: non-empty, no `:`, no leading `_`.
pub fn validate_partition_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CloudantError::InvalidArgument(
            "Partition key cannot be empty".to_string(),
        ));
    }
    if key.contains(':') {
        return Err(CloudantError::InvalidArgument(format!(
            "Partition key '{}' cannot contain ':'",
            key
        )));
    }
    if key.starts_with('_') {
        return Err(CloudantError::InvalidArgument(format!(
            "Partition key '{}' cannot start with '_'",
            key
        )));
    }
    Ok(())
}

/// Path segments for a document id; `_design/` and `_local/` ids keep their
/// slash as a path separator.
pub(crate) fn doc_path(db: &str, id: &str) -> Vec<String> {
    for prefix in ["_design/", "_local/"] {
        if let Some(rest) = id.strip_prefix(prefix) {
            return vec![
                db.to_string(),
                prefix.trim_end_matches('/').to_string(),
                rest.to_string(),
            ];
        }
    }
    vec![db.to_string(), id.to_string()]
}

/// Where a view, search or query request is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Scope {
    Database,
    Partition(String),
}

impl Scope {
    pub(crate) fn prefix(&self, db: &str) -> Vec<String> {
        match self {
            Scope::Database => vec![db.to_string()],
            Scope::Partition(key) => vec![db.to_string(), "_partition".to_string(), key.clone()],
        }
    }
}

fn parse_json_object(json_text: &str, what: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(json_text)
        .map_err(|e| CloudantError::InvalidArgument(format!("Invalid {} JSON: {}", what, e)))?;
    if !value.is_object() {
        return Err(CloudantError::InvalidArgument(format!(
            "{} must be a JSON object",
            what
        )));
    }
    Ok(value)
}

#[derive(Clone)]
pub struct Database {
    transport: Arc<dyn Transport>,
    name: String,
}

impl Database {
    pub(crate) fn new(transport: Arc<dyn Transport>, name: &str) -> Self {
        Self {
            transport,
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.transport.execute(request).await
    }

    /// Current status of the database.
    pub async fn info(&self) -> Result<DbInfo> {
        let response = self
            .execute(HttpRequest::get([self.name.as_str()]))
            .await?
            .error_for_status()?;
        DbInfo::from_slice(&response.body)
    }

    /// Create a document, or update it when it carries `_id` and `_rev`.
    pub async fn save<T: Serialize>(&self, doc: &T) -> Result<DocumentResponse> {
        let body = to_json(doc)?;
        let response: DocumentResponse = self
            .execute(HttpRequest::post([self.name.as_str()]).json(body))
            .await?
            .into_json()?;
        debug!(db = %self.name, id = %response.id, "Saved document");
        Ok(response)
    }

    pub async fn find<T: DeserializeOwned>(&self, id: &str) -> Result<T> {
        self.execute(HttpRequest::get(doc_path(&self.name, id)))
            .await?
            .into_json()
    }

    pub async fn contains(&self, id: &str) -> Result<bool> {
        let response = self
            .execute(HttpRequest::head(doc_path(&self.name, id)))
            .await?;
        match response.error_for_status() {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn remove(&self, id: &str, rev: &str) -> Result<DocumentResponse> {
        self.execute(HttpRequest::delete(doc_path(&self.name, id)).query("rev", rev))
            .await?
            .into_json()
    }

    /// Write many documents in one request. Per-document failures are
    /// reported in the returned rows, not as an error.
    pub async fn bulk<T: Serialize>(&self, docs: &[T]) -> Result<Vec<DocumentResponse>> {
        let docs = docs.iter().map(to_json).collect::<Result<Vec<_>>>()?;
        let count = docs.len();
        let rows: Vec<DocumentResponse> = self
            .execute(
                HttpRequest::post([self.name.as_str(), "_bulk_docs"]).json(json!({ "docs": docs })),
            )
            .await?
            .into_json()?;
        let failed = rows.iter().filter(|r| !r.is_ok()).count();
        debug!(db = %self.name, count, failed, "Bulk write");
        Ok(rows)
    }

    pub fn design_document_manager(&self) -> DesignDocumentManager {
        DesignDocumentManager::new(self.clone())
    }

    pub fn view_request_builder(&self, ddoc: &str, view: &str) -> ViewRequestBuilder {
        ViewRequestBuilder::new(self.clone(), Scope::Database, ddoc, view)
    }

    /// Search request for `index_id` in `ddoc/index` form.
    pub fn search(&self, index_id: &str) -> Result<SearchRequest> {
        SearchRequest::new(self.clone(), Scope::Database, index_id)
    }

    /// Create a query index from its JSON definition.
    pub async fn create_index(&self, definition: &str) -> Result<IndexResponse> {
        let body = parse_json_object(definition, "index definition")?;
        let response: IndexResponse = self
            .execute(HttpRequest::post([self.name.as_str(), "_index"]).json(body))
            .await?
            .into_json()?;
        debug!(db = %self.name, result = %response.result, "Created query index");
        Ok(response)
    }

    /// Run a query (`_find`) given as JSON text, e.g. from [`crate::query::QueryBuilder::build`].
    pub async fn query<T: DeserializeOwned>(&self, query: &str) -> Result<QueryResult<T>> {
        run_find(self, &Scope::Database, query).await
    }

    /// Handle scoped to partition `key`.
    pub fn partition(&self, key: &str) -> Result<Partition> {
        validate_partition_key(key)?;
        Ok(Partition {
            db: self.clone(),
            key: key.to_string(),
        })
    }
}

async fn run_find<T: DeserializeOwned>(
    db: &Database,
    scope: &Scope,
    query: &str,
) -> Result<QueryResult<T>> {
    let body = parse_json_object(query, "query")?;
    let mut path = scope.prefix(db.name());
    path.push("_find".to_string());
    let result: QueryResult<T> = db
        .execute(HttpRequest::post(path).json(body))
        .await?
        .into_json()?;
    if let Some(warning) = result.warning() {
        debug!(db = %db.name(), warning, "Query returned a warning");
    }
    Ok(result)
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| CloudantError::InvalidArgument(format!("Failed to serialize document: {}", e)))
}

/// One partition of a partitioned database.
#[derive(Clone)]
pub struct Partition {
    db: Database,
    key: String,
}

impl Partition {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn scope(&self) -> Scope {
        Scope::Partition(self.key.clone())
    }

    pub async fn info(&self) -> Result<PartitionInfo> {
        self.db
            .execute(HttpRequest::get(self.scope().prefix(self.db.name())))
            .await?
            .into_json()
    }

    pub fn view_request_builder(&self, ddoc: &str, view: &str) -> ViewRequestBuilder {
        ViewRequestBuilder::new(self.db.clone(), self.scope(), ddoc, view)
    }

    pub fn search(&self, index_id: &str) -> Result<SearchRequest> {
        SearchRequest::new(self.db.clone(), self.scope(), index_id)
    }

    pub async fn query<T: DeserializeOwned>(&self, query: &str) -> Result<QueryResult<T>> {
        run_find(&self.db, &self.scope(), query).await
    }
}
