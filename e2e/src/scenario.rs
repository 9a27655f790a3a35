use opentelemetry::trace::{SpanKind, Status};
use vector_client::CollectionConfig;
use vector_instrumentation::spans::attributes;

use crate::testkit::{
    article, attribute, capture_enabled, span_names, TestClient, TestTelemetry,
};

#[tokio::test]
async fn create_read_search_delete_then_uninstrument() {
    let telemetry = TestTelemetry::start();
    let TestClient {
        client,
        instrumentor,
    } = TestClient::in_memory();

    instrumentor
        .instrument(telemetry.options(capture_enabled()))
        .expect("Failed to instrument");

    let articles = client
        .collections()
        .create(CollectionConfig::new("Article"))
        .await
        .expect("Failed to create collection");
    telemetry.reset_spans();

    // create
    let uuid = articles
        .data()
        .insert(article("Robert", "A pair of red shoes"))
        .await
        .expect("Failed to insert");
    let spans = telemetry.spans();
    assert_eq!(spans.len(), 1);
    let create = &spans[0];
    assert_eq!(create.name, "insert Article");
    assert_eq!(create.span_kind, SpanKind::Client);
    assert_eq!(create.status, Status::Ok);
    assert_eq!(
        attribute(create, attributes::WEAVIATE_OPERATION_CATEGORY),
        Some(&"create".into())
    );
    assert_eq!(
        attribute(create, attributes::WEAVIATE_OPERATION_SUCCESS),
        Some(&true.into())
    );
    assert_eq!(
        attribute(create, attributes::WEAVIATE_OBJECT_COUNT),
        Some(&1_i64.into())
    );
    assert_eq!(
        attribute(create, attributes::DB_COLLECTION_NAME),
        Some(&"Article".into())
    );
    assert_eq!(
        attribute(create, attributes::SERVER_ADDRESS),
        Some(&"weaviate.test".into())
    );
    telemetry.reset_spans();

    // read
    let fetched = articles
        .query()
        .fetch_object_by_id(uuid)
        .await
        .expect("Failed to fetch");
    assert!(fetched.is_some());
    let spans = telemetry.spans();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].name, "fetch_object_by_id Article");
    assert_eq!(
        attribute(&spans[0], attributes::WEAVIATE_OPERATION_CATEGORY),
        Some(&"read".into())
    );
    assert_eq!(
        attribute(&spans[0], attributes::WEAVIATE_OBJECT_COUNT),
        Some(&1_i64.into())
    );
    telemetry.reset_spans();

    // search
    let found = articles
        .query()
        .near_text("shoes", Some(3))
        .await
        .expect("Failed to search");
    assert_eq!(found.objects.len(), 1);
    let spans = telemetry.spans();
    assert_eq!(spans.len(), 1);
    let search = &spans[0];
    assert_eq!(search.name, "near_text Article");
    assert_eq!(
        attribute(search, attributes::DB_QUERY_TEXT),
        Some(&"shoes".into())
    );
    assert_eq!(
        attribute(search, attributes::WEAVIATE_QUERY_LIMIT),
        Some(&3_i64.into())
    );
    assert_eq!(search.events.events.len(), 1);
    assert_eq!(search.events.events[0].name, attributes::DOCUMENT_EVENT_NAME);
    telemetry.reset_spans();

    // delete
    let deleted = articles
        .data()
        .delete_by_id(uuid)
        .await
        .expect("Failed to delete");
    assert!(deleted);
    let spans = telemetry.spans();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].name, "delete_by_id Article");
    assert_eq!(
        attribute(&spans[0], attributes::WEAVIATE_OPERATION_SUCCESS),
        Some(&true.into())
    );
    telemetry.reset_spans();

    instrumentor.uninstrument();

    let uuid = articles
        .data()
        .insert(article("Johnson", "More shoes"))
        .await
        .expect("Failed to insert");
    articles
        .query()
        .fetch_object_by_id(uuid)
        .await
        .expect("Failed to fetch");
    articles
        .query()
        .near_text("shoes", None)
        .await
        .expect("Failed to search");
    articles
        .data()
        .delete_by_id(uuid)
        .await
        .expect("Failed to delete");

    assert!(telemetry.spans().is_empty());
}

#[tokio::test]
async fn spans_are_named_after_operation_and_collection() {
    let telemetry = TestTelemetry::start();
    let TestClient {
        client,
        instrumentor,
    } = TestClient::in_memory();
    instrumentor
        .instrument(telemetry.options(Default::default()))
        .expect("Failed to instrument");

    let articles = client
        .collections()
        .create(CollectionConfig::new("Article"))
        .await
        .expect("Failed to create collection");
    articles
        .batch()
        .add_objects(vec![
            article("Robert", "Once upon a time, R. wrote a book..."),
            article("Johnson", "Once upon a time, J. wrote some news..."),
        ])
        .await
        .expect("Failed to import");
    articles
        .query()
        .bm25("book", None)
        .await
        .expect("Failed to search");
    articles
        .aggregate()
        .over_all()
        .await
        .expect("Failed to aggregate");
    client
        .collections()
        .list_all()
        .await
        .expect("Failed to list");
    client
        .collections()
        .delete_all()
        .await
        .expect("Failed to delete");

    insta::assert_snapshot!(span_names(&telemetry.spans()).join("\n"), @r"
    create_collection Article
    batch_add_objects Article
    bm25 Article
    aggregate Article
    list_collections
    delete_all_collections
    ");

    instrumentor.uninstrument();
}
