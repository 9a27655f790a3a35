use std::sync::Arc;

use opentelemetry::trace::Status;
use vector_client::{ClientError, Collection};
use vector_instrumentation::spans::attributes;

use crate::testkit::{
    article, attribute, TestClient, TestTelemetry, TimingOutTransport, TIMEOUT,
};

async fn create(articles: &Collection<'_>) -> Result<(), ClientError> {
    articles
        .data()
        .insert(article("Robert", "lost in transit"))
        .await
        .map(|_| ())
}

async fn read(articles: &Collection<'_>) -> Result<(), ClientError> {
    articles
        .query()
        .fetch_object_by_id(uuid::Uuid::nil())
        .await
        .map(|_| ())
}

async fn search(articles: &Collection<'_>) -> Result<(), ClientError> {
    articles
        .query()
        .near_text("shoes", None)
        .await
        .map(|_| ())
}

async fn delete(articles: &Collection<'_>) -> Result<(), ClientError> {
    articles
        .data()
        .delete_by_id(uuid::Uuid::nil())
        .await
        .map(|_| ())
}

#[tokio::test]
async fn failing_calls_mark_the_span_and_return_the_same_error() {
    let telemetry = TestTelemetry::start();
    let TestClient {
        client,
        instrumentor,
    } = TestClient::with_transport(Arc::new(TimingOutTransport));
    instrumentor
        .instrument(telemetry.options(Default::default()))
        .expect("Failed to instrument");

    let articles = client.collection("Article");
    let expected = ClientError::ConnectionTimeout(TIMEOUT);

    let cases = [
        ("create", "insert Article", create(&articles).await),
        ("read", "fetch_object_by_id Article", read(&articles).await),
        ("search", "near_text Article", search(&articles).await),
        ("delete", "delete_by_id Article", delete(&articles).await),
    ];

    let spans = telemetry.spans();
    assert_eq!(spans.len(), cases.len());

    for ((category, span_name, result), span) in cases.iter().zip(&spans) {
        assert_eq!(result.as_ref(), Err(&expected), "{category}");

        assert_eq!(span.name, *span_name);
        assert_eq!(
            span.status,
            Status::Error {
                description: expected.to_string().into()
            },
            "{category}"
        );
        assert_eq!(
            attribute(span, attributes::WEAVIATE_OPERATION_CATEGORY),
            Some(&(*category).into())
        );
        assert_eq!(
            attribute(span, attributes::ERROR_TYPE),
            Some(&"ConnectionTimeout".into())
        );
        assert_eq!(
            attribute(span, attributes::WEAVIATE_OPERATION_SUCCESS),
            Some(&false.into())
        );
        assert!(attribute(span, attributes::WEAVIATE_OBJECT_COUNT).is_none());
    }

    instrumentor.uninstrument();
}

#[tokio::test]
async fn database_errors_keep_their_variant() {
    let telemetry = TestTelemetry::start();
    let TestClient {
        client,
        instrumentor,
    } = TestClient::in_memory();
    instrumentor
        .instrument(telemetry.options(Default::default()))
        .expect("Failed to instrument");

    let err = client
        .collections()
        .get("Missing")
        .await
        .expect_err("collection does not exist");
    assert_eq!(err, ClientError::CollectionNotFound("Missing".into()));

    let spans = telemetry.spans();
    assert_eq!(spans.len(), 1);
    assert_eq!(
        attribute(&spans[0], attributes::ERROR_TYPE),
        Some(&"CollectionNotFound".into())
    );
    assert_eq!(
        attribute(&spans[0], attributes::ERROR_MESSAGE),
        Some(&err.to_string().into())
    );

    instrumentor.uninstrument();
}
