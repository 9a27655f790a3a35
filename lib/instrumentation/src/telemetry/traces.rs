use opentelemetry_otlp::{
    Protocol, SpanExporter, WithExportConfig, WithHttpConfig, WithTonicConfig,
};
use opentelemetry_sdk::{
    runtime,
    trace::{span_processor_with_async_runtime::BatchSpanProcessor, SdkTracerProvider},
    Resource,
};
use vector_instrumentation_config::exporter::{ExporterConfig, ExporterKind, OtlpProtocol};

use crate::telemetry::{
    error::TelemetryError,
    utils::{build_metadata, signal_endpoint},
};

/// Builds the tracer provider, `None` when traces are not exported.
pub(super) fn build_tracer_provider(
    config: &ExporterConfig,
    resource: Resource,
) -> Result<Option<SdkTracerProvider>, TelemetryError> {
    let builder = SdkTracerProvider::builder().with_resource(resource);

    let builder = match config.traces {
        ExporterKind::None => return Ok(None),
        ExporterKind::Console => {
            builder.with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
        }
        ExporterKind::Otlp => {
            let exporter = build_otlp_exporter(config)?;
            builder.with_span_processor(BatchSpanProcessor::builder(exporter, runtime::Tokio).build())
        }
    };

    Ok(Some(builder.build()))
}

fn build_otlp_exporter(config: &ExporterConfig) -> Result<SpanExporter, TelemetryError> {
    match config.protocol {
        OtlpProtocol::Grpc => SpanExporter::builder()
            .with_tonic()
            .with_endpoint(config.endpoint.as_str())
            .with_timeout(config.timeout)
            .with_metadata(build_metadata(&config.headers)?)
            .build(),
        OtlpProtocol::HttpProtobuf => SpanExporter::builder()
            .with_http()
            .with_endpoint(signal_endpoint(&config.endpoint, "traces"))
            .with_timeout(config.timeout)
            .with_headers(config.headers.clone())
            .with_protocol(Protocol::HttpBinary)
            .build(),
    }
    .map_err(|e| TelemetryError::SpanExporterSetup(e.to_string()))
}
