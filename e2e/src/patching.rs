use std::sync::Arc;

use vector_client::{
    names, CollectionConfig, InMemoryTransport, OperationHandle, OperationTable, Resolution,
};
use vector_instrumentation::{spans::attributes, InstrumentOptions};
use vector_instrumentation_config::InstrumentationConfig;

use crate::testkit::{article, attribute, span_names, TestClient, TestTelemetry};

fn handle(table: &OperationTable, name: &str) -> OperationHandle {
    match table.resolve(name) {
        Resolution::Found(handle) => handle,
        Resolution::NotFound => panic!("slot {name} is missing"),
    }
}

#[tokio::test]
async fn instrumenting_twice_produces_one_span_per_call() {
    let telemetry = TestTelemetry::start();
    let TestClient {
        client,
        instrumentor,
    } = TestClient::in_memory();

    instrumentor
        .instrument(telemetry.options(Default::default()))
        .expect("Failed to instrument");
    instrumentor
        .instrument(telemetry.options(Default::default()))
        .expect("Failed to instrument again");

    client
        .collections()
        .list_all()
        .await
        .expect("Failed to list");

    let spans = telemetry.spans();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].name, "list_collections");

    instrumentor.uninstrument();
}

#[tokio::test]
async fn uninstrument_restores_the_original_handles() {
    let TestClient { instrumentor, .. } = TestClient::in_memory();
    let table = Arc::clone(instrumentor.table());

    let originals: Vec<_> = names::ALL
        .iter()
        .map(|name| (*name, handle(&table, name)))
        .collect();

    instrumentor
        .instrument(InstrumentOptions::new().with_config(InstrumentationConfig::default()))
        .expect("Failed to instrument");
    for (name, original) in &originals {
        assert!(!Arc::ptr_eq(&handle(&table, name), original), "{name}");
    }

    instrumentor.uninstrument();
    instrumentor.uninstrument();
    for (name, original) in &originals {
        assert!(Arc::ptr_eq(&handle(&table, name), original), "{name}");
    }
}

#[tokio::test]
async fn missing_operations_do_not_stop_the_others() {
    let telemetry = TestTelemetry::start();
    let table = OperationTable::builder()
        .with_standard_operations()
        .without_operation(names::QUERY_BM25)
        .build();
    let TestClient {
        client,
        instrumentor,
    } = TestClient::with_table(table, Arc::new(InMemoryTransport::new()));

    instrumentor
        .instrument(telemetry.options(Default::default()))
        .expect("Partial instrumentation is not an error");

    let report = instrumentor.patch_report().expect("Missing patch report");
    assert_eq!(report.missing, vec![names::QUERY_BM25]);
    assert_eq!(report.patched.len(), names::ALL.len() - 1);

    let products = client
        .collections()
        .create(CollectionConfig::new("Product"))
        .await
        .expect("Failed to create collection");
    products
        .data()
        .insert(article("Acme", "red shoes"))
        .await
        .expect("Failed to insert");
    products
        .query()
        .near_text("shoes", None)
        .await
        .expect("Failed to search");
    assert!(products.query().bm25("shoes", None).await.is_err());

    assert_eq!(
        span_names(&telemetry.spans()),
        vec![
            "create_collection Product",
            "insert Product",
            "near_text Product"
        ]
    );

    instrumentor.uninstrument();
}

#[tokio::test]
async fn operation_spans_nest_under_the_callers_span() {
    use tracing::Instrument;

    let telemetry = TestTelemetry::start();
    let TestClient {
        client,
        instrumentor,
    } = TestClient::in_memory();
    (&instrumentor)
        .instrument(telemetry.options(Default::default()))
        .expect("Failed to instrument");

    async {
        client
            .collections()
            .list_all()
            .await
            .expect("Failed to list");
    }
    .instrument(tracing::info_span!("handle_request"))
    .await;

    let spans = telemetry.spans();
    assert_eq!(spans.len(), 2);
    let operation = spans
        .iter()
        .find(|span| span.name == "list_collections")
        .expect("Missing operation span");
    let parent = spans
        .iter()
        .find(|span| span.name == "handle_request")
        .expect("Missing parent span");

    assert_eq!(operation.parent_span_id, parent.span_context.span_id());
    assert_eq!(
        operation.span_context.trace_id(),
        parent.span_context.trace_id()
    );
    assert_eq!(
        attribute(operation, attributes::DB_SYSTEM_NAME),
        Some(&"weaviate".into())
    );

    instrumentor.uninstrument();
}

#[tokio::test]
async fn concurrent_calls_get_their_own_spans() {
    let telemetry = TestTelemetry::start();
    let TestClient {
        client,
        instrumentor,
    } = TestClient::in_memory();
    instrumentor
        .instrument(telemetry.options(Default::default()))
        .expect("Failed to instrument");

    let products = client
        .collections()
        .create(CollectionConfig::new("Product"))
        .await
        .expect("Failed to create collection");
    telemetry.reset_spans();

    let inserts = (0..16).map(|i| {
        let products = &products;
        async move {
            products
                .data()
                .insert(article("Acme", &format!("item {i}")))
                .await
        }
    });
    let results = futures::future::join_all(inserts).await;
    assert!(results.iter().all(Result::is_ok));

    let spans = telemetry.spans();
    assert_eq!(spans.len(), 16);
    assert!(spans.iter().all(|span| span.name == "insert Product"));
    assert!(spans
        .iter()
        .all(|span| span.parent_span_id == opentelemetry::trace::SpanId::INVALID));

    instrumentor.uninstrument();
}
