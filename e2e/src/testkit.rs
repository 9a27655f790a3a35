use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use opentelemetry::{
    metrics::{Meter, MeterProvider},
    trace::TracerProvider,
    KeyValue, Value,
};
use opentelemetry_sdk::{
    metrics::{
        data::{AggregatedMetrics, MetricData},
        InMemoryMetricExporter, PeriodicReader, SdkMeterProvider,
    },
    trace::{
        InMemorySpanExporter, InMemorySpanExporterBuilder, SdkTracerProvider, SimpleSpanProcessor,
        SpanData,
    },
};
use serde_json::json;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::layer::SubscriberExt;
use vector_client::{
    Client, ClientError, DataObject, InMemoryTransport, OperationTable, Properties, Request,
    Response, Transport,
};
use vector_instrumentation::{InstrumentOptions, Instrumentor};
use vector_instrumentation_config::InstrumentationConfig;

pub const WEAVIATE_URL: &str = "http://weaviate.test:8080";

/// In-memory span and metric pipelines, with a `tracing` subscriber installed for the
/// current thread until dropped.
pub struct TestTelemetry {
    tracer_provider: SdkTracerProvider,
    span_exporter: InMemorySpanExporter,
    meter_provider: SdkMeterProvider,
    metric_exporter: InMemoryMetricExporter,
    _subscriber_guard: DefaultGuard,
}

impl TestTelemetry {
    pub fn start() -> Self {
        let span_exporter = InMemorySpanExporterBuilder::new().build();
        let tracer_provider = SdkTracerProvider::builder()
            .with_span_processor(SimpleSpanProcessor::new(span_exporter.clone()))
            .build();

        let metric_exporter = InMemoryMetricExporter::default();
        let meter_provider = SdkMeterProvider::builder()
            .with_reader(PeriodicReader::builder(metric_exporter.clone()).build())
            .build();

        let subscriber = tracing_subscriber::registry().with(
            tracing_opentelemetry::layer().with_tracer(tracer_provider.tracer("e2e")),
        );
        let subscriber_guard = tracing::subscriber::set_default(subscriber);

        Self {
            tracer_provider,
            span_exporter,
            meter_provider,
            metric_exporter,
            _subscriber_guard: subscriber_guard,
        }
    }

    pub fn meter(&self) -> Meter {
        self.meter_provider.meter("e2e")
    }

    pub fn options(&self, config: InstrumentationConfig) -> InstrumentOptions {
        InstrumentOptions::new()
            .with_config(config)
            .with_meter(self.meter())
    }

    /// Finished spans, in the order they ended.
    pub fn spans(&self) -> Vec<SpanData> {
        self.tracer_provider.force_flush().expect("Failed to flush spans");
        self.span_exporter
            .get_finished_spans()
            .expect("Failed to read spans")
    }

    pub fn reset_spans(&self) {
        self.span_exporter.reset();
    }

    /// Number of samples recorded per attribute set of a histogram.
    pub fn histogram_counts(&self, metric_name: &str) -> Vec<(Vec<KeyValue>, u64)> {
        self.meter_provider
            .force_flush()
            .expect("Failed to flush metrics");
        let exported = self
            .metric_exporter
            .get_finished_metrics()
            .expect("Failed to read metrics");

        // the reader exports cumulative data, the last export holds every sample
        let Some(last) = exported.last() else {
            return Vec::new();
        };

        let mut counts = Vec::new();
        for scope in last.scope_metrics() {
            for metric in scope.metrics().filter(|metric| metric.name() == metric_name) {
                match metric.data() {
                    AggregatedMetrics::F64(MetricData::Histogram(histogram)) => {
                        counts.extend(histogram.data_points().map(|point| {
                            (point.attributes().cloned().collect(), point.count())
                        }))
                    }
                    AggregatedMetrics::U64(MetricData::Histogram(histogram)) => {
                        counts.extend(histogram.data_points().map(|point| {
                            (point.attributes().cloned().collect(), point.count())
                        }))
                    }
                    _ => {}
                }
            }
        }
        counts
    }
}

pub fn attribute<'a>(span: &'a SpanData, key: &str) -> Option<&'a Value> {
    span.attributes
        .iter()
        .find(|kv| kv.key.as_str() == key)
        .map(|kv| &kv.value)
}

pub fn label<'a>(labels: &'a [KeyValue], key: &str) -> Option<&'a Value> {
    labels
        .iter()
        .find(|kv| kv.key.as_str() == key)
        .map(|kv| &kv.value)
}

/// Every string recorded on the span, as attribute or event attribute.
pub fn recorded_strings(span: &SpanData) -> Vec<String> {
    let event_attributes = span
        .events
        .events
        .iter()
        .flat_map(|event| event.attributes.iter());

    span.attributes
        .iter()
        .chain(event_attributes)
        .filter_map(|kv| match &kv.value {
            Value::String(value) => Some(value.as_str().to_string()),
            _ => None,
        })
        .collect()
}

pub fn span_names(spans: &[SpanData]) -> Vec<String> {
    spans.iter().map(|span| span.name.to_string()).collect()
}

pub fn article(author: &str, text: &str) -> DataObject {
    let mut properties = Properties::new();
    properties.insert("author".into(), json!(author));
    properties.insert("text".into(), json!(text));
    DataObject::new(properties)
}

/// A client with its own operation table and an instrumentor bound to it.
pub struct TestClient {
    pub client: Client,
    pub instrumentor: Instrumentor,
}

impl TestClient {
    pub fn in_memory() -> Self {
        Self::with_table(OperationTable::standard(), Arc::new(InMemoryTransport::new()))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self::with_table(OperationTable::standard(), transport)
    }

    pub fn with_table(table: OperationTable, transport: Arc<dyn Transport>) -> Self {
        let table = Arc::new(table);
        let client = Client::with_operations(WEAVIATE_URL, transport, Arc::clone(&table))
            .expect("Failed to create client");

        Self {
            client,
            instrumentor: Instrumentor::new(table),
        }
    }
}

/// A transport whose every request times out.
pub struct TimingOutTransport;

pub const TIMEOUT: Duration = Duration::from_secs(5);

#[async_trait]
impl Transport for TimingOutTransport {
    async fn execute(&self, _request: Request) -> Result<Response, ClientError> {
        Err(ClientError::ConnectionTimeout(TIMEOUT))
    }
}

pub fn capture_enabled() -> InstrumentationConfig {
    let mut config = InstrumentationConfig::default();
    config.capture.enabled = true;
    config
}
