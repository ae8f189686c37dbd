//! Partitioned database scenarios against a live server
//!
//! Each test builds a partitioned database holding 30 documents spread evenly
//! over partitions `keyA`, `keyB` and `keyC`, and drops it afterwards.

use super::test_utils::{live_client, unique_db_name};
use cloudant_link::model::{DesignDocument, MapReduce, QueryResult, SearchResult};
use cloudant_link::query::{eq, QueryBuilder};
use cloudant_link::{CloudantClient, Database};
use serde::{Deserialize, Serialize};

const PARTITION_KEYS: [&str; 3] = ["keyA", "keyB", "keyC"];

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PartitionDocument {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    rev: Option<String>,
    foo: String,
}

struct Fixture {
    client: CloudantClient,
    db: Database,
}

impl Fixture {
    async fn setup() -> Option<Self> {
        let client = live_client()?;
        let name = unique_db_name("partitioned_database");
        client.create_partitioned_db(&name).await.unwrap();
        let db = client.database(&name, false).await.unwrap();

        let docs: Vec<PartitionDocument> = (0..30)
            .map(|i| PartitionDocument {
                id: format!("{}:doc{}", PARTITION_KEYS[i % 3], i),
                rev: None,
                foo: "bar".to_string(),
            })
            .collect();
        let rows = db.bulk(&docs).await.unwrap();
        assert!(rows.iter().all(|row| row.is_ok()));

        Some(Self { client, db })
    }

    async fn teardown(self) {
        self.client.delete_db(self.db.name()).await.unwrap();
    }
}

fn partitioned_design_document(id: &str) -> DesignDocument {
    let mut ddoc = DesignDocument::new(id);
    ddoc.set_partitioned(true);
    ddoc
}

#[tokio::test]
async fn test_create_partitioned_database() {
    let Some(client) = live_client() else {
        eprintln!("CLOUDANT_TEST_URL not set, skipping");
        return;
    };
    let name = unique_db_name("partitioned_database");
    client.create_partitioned_db(&name).await.unwrap();

    let db = client.database(&name, false).await.unwrap();
    let info = db.info().await.unwrap();
    assert_eq!(info.db_name(), name);
    assert!(info.props().partitioned());

    client.delete_db(&name).await.unwrap();
}

#[tokio::test]
async fn test_create_partition_design_document() {
    let Some(fixture) = Fixture::setup().await else {
        eprintln!("CLOUDANT_TEST_URL not set, skipping");
        return;
    };
    let ddoc_manager = fixture.db.design_document_manager();
    ddoc_manager
        .put(&partitioned_design_document("partitioned_ddoc_empty"))
        .await
        .unwrap();

    let fetched = ddoc_manager.get("partitioned_ddoc_empty").await.unwrap();
    let options = fetched.options.as_ref().expect("options should be stored");
    assert_eq!(options.get("partitioned"), Some(&true));

    fixture.teardown().await;
}

#[tokio::test]
async fn test_partitioned_view() {
    let Some(fixture) = Fixture::setup().await else {
        eprintln!("CLOUDANT_TEST_URL not set, skipping");
        return;
    };
    let mut ddoc = partitioned_design_document("partitioned_ddoc_view");
    ddoc.add_view("view", MapReduce::new("function(doc) { emit(doc._id, 1); }"));
    fixture.db.design_document_manager().put(&ddoc).await.unwrap();

    let partition_key = "keyA";
    let response = fixture
        .db
        .partition(partition_key)
        .unwrap()
        .view_request_builder("partitioned_ddoc_view", "view")
        .new_request::<String, u32>()
        .response()
        .await
        .unwrap();

    assert_eq!(response.rows().len(), 10);
    assert!(response.keys().all(|key| key.starts_with(partition_key)));

    fixture.teardown().await;
}

#[tokio::test]
async fn test_partitioned_search() {
    let Some(fixture) = Fixture::setup().await else {
        eprintln!("CLOUDANT_TEST_URL not set, skipping");
        return;
    };
    let mut ddoc = partitioned_design_document("partitioned_ddoc_search");
    ddoc.add_search_index(
        "search",
        "function(doc) { index(\"id\", doc._id, {\"store\": true}); }",
    );
    fixture.db.design_document_manager().put(&ddoc).await.unwrap();

    let partition_key = "keyB";
    let results: SearchResult<PartitionDocument> = fixture
        .db
        .partition(partition_key)
        .unwrap()
        .search("partitioned_ddoc_search/search")
        .unwrap()
        .query_search_result("*:*")
        .await
        .unwrap();

    assert_eq!(results.rows().len(), 10);
    assert!(results.rows().iter().all(|row| row.id.starts_with(partition_key)));

    fixture.teardown().await;
}

#[tokio::test]
async fn test_partitioned_query() {
    let Some(fixture) = Fixture::setup().await else {
        eprintln!("CLOUDANT_TEST_URL not set, skipping");
        return;
    };
    let ddoc_id = "partitioned_ddoc_query";
    fixture
        .db
        .create_index(&format!(
            r#"{{"index": {{"fields": ["foo"]}}, "partitioned": true, "name": "foo-index", "ddoc": "{}", "type": "json"}}"#,
            ddoc_id
        ))
        .await
        .unwrap();

    let partition_key = "keyC";
    let query = QueryBuilder::new(eq("foo", "bar")).use_index(ddoc_id).build();
    let results: QueryResult<PartitionDocument> = fixture
        .db
        .partition(partition_key)
        .unwrap()
        .query(&query)
        .await
        .unwrap();

    // The partitioned index created above must have been used.
    assert!(results.warning().is_none());
    assert_eq!(results.docs().len(), 10);
    assert!(results.docs().iter().all(|doc| doc.id.starts_with(partition_key)));

    fixture.teardown().await;
}
