use serde_json::json;
use uuid::Uuid;
use vector_client::{
    names, ClientError, CollectionConfig, DataObject, Filter, Properties, Request, Response,
};
use vector_instrumentation_config::InstrumentationConfig;

use crate::testkit::{capture_enabled, TestClient, TestTelemetry};

fn object(id: u128, title: &str, vector: Vec<f32>) -> DataObject {
    let mut properties = Properties::new();
    properties.insert("title".into(), json!(title));
    DataObject::new(properties)
        .with_uuid(Uuid::from_u128(id))
        .with_vector(vector)
}

fn properties(title: &str) -> Properties {
    let mut properties = Properties::new();
    properties.insert("title".into(), json!(title));
    properties
}

/// One request per operation, plus a few that fail on purpose.
fn script() -> Vec<(&'static str, Request)> {
    let collection = || "Product".to_string();

    vec![
        (
            names::COLLECTIONS_CREATE,
            Request::CreateCollection {
                config: CollectionConfig::new("Product"),
            },
        ),
        (
            names::COLLECTIONS_CREATE,
            Request::CreateCollection {
                config: CollectionConfig::new("Product"),
            },
        ),
        (
            names::COLLECTIONS_GET,
            Request::GetCollection { name: collection() },
        ),
        (names::COLLECTIONS_LIST_ALL, Request::ListCollections),
        (
            names::DATA_INSERT,
            Request::Insert {
                collection: collection(),
                object: object(1, "red shoes", vec![1.0, 0.0]),
            },
        ),
        (
            names::DATA_INSERT_MANY,
            Request::InsertMany {
                collection: collection(),
                objects: vec![
                    object(2, "blue shoes", vec![0.0, 1.0]),
                    object(1, "duplicate", vec![1.0, 1.0]),
                ],
            },
        ),
        (
            names::BATCH_ADD_OBJECTS,
            Request::BatchObjects {
                collection: collection(),
                objects: vec![object(3, "red scarf", vec![0.7, 0.7])],
            },
        ),
        (
            names::DATA_REPLACE,
            Request::Replace {
                collection: collection(),
                uuid: Uuid::from_u128(2),
                properties: properties("navy shoes"),
            },
        ),
        (
            names::DATA_UPDATE,
            Request::Update {
                collection: collection(),
                uuid: Uuid::from_u128(3),
                properties: properties("crimson scarf"),
            },
        ),
        (
            names::DATA_UPDATE,
            Request::Update {
                collection: collection(),
                uuid: Uuid::from_u128(99),
                properties: properties("ghost"),
            },
        ),
        (
            names::DATA_EXISTS,
            Request::Exists {
                collection: collection(),
                uuid: Uuid::from_u128(1),
            },
        ),
        (
            names::QUERY_FETCH_OBJECT_BY_ID,
            Request::FetchObjectById {
                collection: collection(),
                uuid: Uuid::from_u128(2),
            },
        ),
        (
            names::QUERY_FETCH_OBJECTS,
            Request::FetchObjects {
                collection: collection(),
                limit: Some(2),
            },
        ),
        (
            names::QUERY_NEAR_TEXT,
            Request::NearText {
                collection: collection(),
                query: "find red shoes".into(),
                limit: None,
            },
        ),
        (
            names::QUERY_NEAR_TEXT,
            Request::NearText {
                collection: collection(),
                query: "  ".into(),
                limit: None,
            },
        ),
        (
            names::QUERY_NEAR_VECTOR,
            Request::NearVector {
                collection: collection(),
                vector: vec![0.9, 0.1],
                limit: Some(2),
            },
        ),
        (
            names::QUERY_BM25,
            Request::Bm25 {
                collection: collection(),
                query: "shoes".into(),
                limit: None,
            },
        ),
        (
            names::AGGREGATE_OVER_ALL,
            Request::Aggregate {
                collection: collection(),
            },
        ),
        (
            names::DATA_DELETE_MANY,
            Request::DeleteMany {
                collection: collection(),
                filter: Filter::by_property("title", "crimson scarf"),
            },
        ),
        (
            names::DATA_DELETE_BY_ID,
            Request::DeleteById {
                collection: collection(),
                uuid: Uuid::from_u128(1),
            },
        ),
        (
            names::COLLECTIONS_DELETE,
            Request::DeleteCollection { name: collection() },
        ),
        (
            names::QUERY_FETCH_OBJECTS,
            Request::FetchObjects {
                collection: collection(),
                limit: None,
            },
        ),
        (names::COLLECTIONS_DELETE_ALL, Request::DeleteAllCollections),
    ]
}

async fn run(
    test_client: &TestClient,
    script: Vec<(&'static str, Request)>,
) -> Vec<Result<Response, ClientError>> {
    let mut results = Vec::with_capacity(script.len());
    for (name, request) in script {
        results.push(test_client.client.execute(name, request).await);
    }
    results
}

async fn assert_transparent(config: InstrumentationConfig) {
    let telemetry = TestTelemetry::start();

    let plain = TestClient::in_memory();
    let expected = run(&plain, script()).await;

    let traced = TestClient::in_memory();
    traced
        .instrumentor
        .instrument(telemetry.options(config))
        .expect("Failed to instrument");
    let actual = run(&traced, script()).await;
    traced.instrumentor.uninstrument();

    assert_eq!(actual, expected);
    assert!(expected.iter().any(Result::is_err));
    assert_eq!(telemetry.spans().len(), script().len());
}

#[tokio::test]
async fn wrapped_operations_return_what_the_originals_return() {
    assert_transparent(InstrumentationConfig::default()).await;
}

#[tokio::test]
async fn content_capture_does_not_change_results() {
    assert_transparent(capture_enabled()).await;
}

#[test]
fn script_covers_every_operation() {
    let script = script();
    for name in names::ALL {
        assert!(
            script.iter().any(|(operation, _)| operation == name),
            "{name} is not exercised"
        );
    }
}
