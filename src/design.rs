//! Design document management

use crate::database::{doc_path, Database};
use crate::error::{CloudantError, Result};
use crate::model::{ensure_design_prefix, DesignDocument, DocumentResponse};
use crate::transport::HttpRequest;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

#[derive(Deserialize)]
struct RevOnly {
    #[serde(rename = "_rev")]
    rev: String,
}

#[derive(Deserialize)]
struct AllDocsRow {
    doc: Option<DesignDocument>,
}

#[derive(Deserialize)]
struct AllDocsResponse {
    rows: Vec<AllDocsRow>,
}

/// Reads and writes the design documents of one database.
#[derive(Clone)]
pub struct DesignDocumentManager {
    db: Database,
}

impl DesignDocumentManager {
    pub(crate) fn new(db: Database) -> Self {
        Self { db }
    }

    async fn current_rev(&self, id: &str) -> Result<Option<String>> {
        match self.db.find::<RevOnly>(id).await {
            Ok(doc) => Ok(Some(doc.rev)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create or replace a design document.
    ///
    /// When `ddoc` has no `_rev`, the server's current revision is fetched so
    /// an existing design document is overwritten rather than conflicting.
    pub async fn put(&self, ddoc: &DesignDocument) -> Result<DocumentResponse> {
        let mut ddoc = ddoc.clone();
        if ddoc.rev.is_none() {
            ddoc.rev = self.current_rev(ddoc.id()).await?;
        }
        let body = serde_json::to_value(&ddoc).map_err(|e| {
            CloudantError::InvalidArgument(format!(
                "Failed to serialize design document: {}",
                e
            ))
        })?;

        let response: DocumentResponse = self
            .db
            .execute(HttpRequest::put(doc_path(self.db.name(), ddoc.id())).json(body))
            .await?
            .into_json()?;
        debug!(
            db = %self.db.name(),
            id = %ddoc.id(),
            partitioned = ddoc.is_partitioned(),
            "Saved design document"
        );
        Ok(response)
    }

    /// Fetch a design document by id, with or without the `_design/` prefix.
    pub async fn get(&self, id: &str) -> Result<DesignDocument> {
        self.db.find(&ensure_design_prefix(id)).await
    }

    pub async fn remove(&self, id: &str) -> Result<DocumentResponse> {
        let id = ensure_design_prefix(id);
        let rev = self.db.find::<RevOnly>(&id).await?.rev;
        self.db.remove(&id, &rev).await
    }

    /// All design documents in the database.
    pub async fn list(&self) -> Result<Vec<DesignDocument>> {
        let request = HttpRequest::get([self.db.name(), "_all_docs"])
            .query("startkey", Value::from("_design/").to_string())
            .query("endkey", Value::from("_design0").to_string())
            .query("include_docs", "true");
        let response: AllDocsResponse = self.db.execute(request).await?.into_json()?;
        Ok(response.rows.into_iter().filter_map(|row| row.doc).collect())
    }
}
