use std::sync::Arc;

use serde_json::json;
use tracing::{info, info_span, Instrument};
use vector_client::{
    Client, CollectionConfig, DataObject, Filter, InMemoryTransport, Properties,
};
use vector_instrumentation::{instrument, telemetry, uninstrument, InstrumentOptions};
use vector_instrumentation_config::load_config;

const CLASS_NAME: &str = "Article";

fn article(author: &str, text: &str) -> DataObject {
    let mut properties = Properties::new();
    properties.insert("author".into(), json!(author));
    properties.insert("text".into(), json!(text));
    DataObject::new(properties)
}

async fn run(client: &Client) -> anyhow::Result<()> {
    let articles = client
        .collections()
        .create(
            CollectionConfig::new(CLASS_NAME)
                .with_description("An Article class to store a text")
                .with_vectorizer("text2vec-ollama"),
        )
        .await?;

    let uuid = articles
        .data()
        .insert(article("Robert", "Once upon a time, someone wrote a book..."))
        .await?;
    info!(%uuid, "object created");

    let batch = articles
        .batch()
        .add_objects(vec![
            article("Robert", "Once upon a time, R. wrote a book..."),
            article("Johnson", "Once upon a time, J. wrote some news..."),
            article("Maverick", "Never again, M. will write a book..."),
            article("Wilson", "Lost in the island, W. did not write anything..."),
        ])
        .await?;
    info!(
        created = batch.uuids.len(),
        failed = batch.errors.len(),
        "batch imported"
    );

    let fetched = articles.query().fetch_object_by_id(uuid).await?;
    info!(found = fetched.is_some(), "object fetched");

    let books = articles.query().near_text("book", Some(2)).await?;
    info!(results = books.objects.len(), "near_text search done");

    let news = articles.query().bm25("news", None).await?;
    info!(results = news.objects.len(), "bm25 search done");

    let total = articles.aggregate().over_all().await?;
    info!(total = total.total_count, "collection aggregated");

    let deleted = articles
        .data()
        .delete_many(Filter::by_property("author", "Wilson"))
        .await?;
    info!(deleted = deleted.successful, "objects deleted by filter");

    articles.data().delete_by_id(uuid).await?;
    client.collections().delete(CLASS_NAME).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config(None)?;
    let providers = telemetry::init(&config)?;

    let mut options = InstrumentOptions::new().with_config(config);
    if let Some(meter) = providers.meter() {
        options = options.with_meter(meter);
    }
    instrument(options)?;

    let client = Client::connect("http://localhost:8080", Arc::new(InMemoryTransport::new()))?;
    let result = run(&client).instrument(info_span!("demo")).await;

    uninstrument();
    providers.graceful_shutdown().await;

    result
}
