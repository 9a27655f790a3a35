use std::sync::Arc;

use vector_client::CollectionConfig;
use vector_instrumentation::metrics::catalog::{labels, names};

use crate::testkit::{article, label, TestClient, TestTelemetry, TimingOutTransport};

#[tokio::test]
async fn every_call_records_one_duration_sample() {
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
    for text in ["red shoes", "blue shoes"] {
        products
            .data()
            .insert(article("Acme", text))
            .await
            .expect("Failed to insert");
    }
    products
        .query()
        .near_text("shoes", None)
        .await
        .expect("Failed to search");

    let durations = telemetry.histogram_counts(names::DB_CLIENT_OPERATION_DURATION);
    let total: u64 = durations.iter().map(|(_, count)| count).sum();
    assert_eq!(total, 4);

    let inserts = durations
        .iter()
        .find(|(labels_set, _)| {
            label(labels_set, labels::DB_OPERATION_NAME) == Some(&"insert".into())
        })
        .expect("Missing insert samples");
    assert_eq!(inserts.1, 2);
    assert_eq!(
        label(&inserts.0, labels::OPERATION_CATEGORY),
        Some(&"create".into())
    );
    assert_eq!(
        label(&inserts.0, labels::OPERATION_SUCCESS),
        Some(&true.into())
    );
    assert_eq!(
        label(&inserts.0, labels::DB_SYSTEM_NAME),
        Some(&"weaviate".into())
    );

    let rows = telemetry.histogram_counts(names::DB_CLIENT_RESPONSE_RETURNED_ROWS);
    let searches = rows
        .iter()
        .find(|(labels_set, _)| {
            label(labels_set, labels::OPERATION_CATEGORY) == Some(&"search".into())
        })
        .expect("Missing search rows");
    assert_eq!(searches.1, 1);

    instrumentor.uninstrument();
}

#[tokio::test]
async fn failed_calls_are_tagged_unsuccessful() {
    let telemetry = TestTelemetry::start();
    let TestClient {
        client,
        instrumentor,
    } = TestClient::with_transport(Arc::new(TimingOutTransport));
    instrumentor
        .instrument(telemetry.options(Default::default()))
        .expect("Failed to instrument");

    let _ = client.collections().list_all().await;
    let _ = client.collection("Product").query().bm25("shoes", None).await;

    let durations = telemetry.histogram_counts(names::DB_CLIENT_OPERATION_DURATION);
    assert_eq!(durations.len(), 2);
    for (labels_set, count) in &durations {
        assert_eq!(*count, 1);
        assert_eq!(
            label(labels_set, labels::OPERATION_SUCCESS),
            Some(&false.into())
        );
        assert_eq!(
            label(labels_set, labels::ERROR_TYPE),
            Some(&"ConnectionTimeout".into())
        );
    }
    assert!(telemetry
        .histogram_counts(names::DB_CLIENT_RESPONSE_RETURNED_ROWS)
        .is_empty());

    instrumentor.uninstrument();
}
