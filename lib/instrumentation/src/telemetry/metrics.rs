use opentelemetry_otlp::{
    MetricExporter, Protocol, WithExportConfig, WithHttpConfig, WithTonicConfig,
};
use opentelemetry_sdk::{
    metrics::{periodic_reader_with_async_runtime::PeriodicReader, SdkMeterProvider},
    runtime, Resource,
};
use vector_instrumentation_config::exporter::{ExporterConfig, ExporterKind, OtlpProtocol};

use crate::telemetry::{
    error::TelemetryError,
    utils::{build_metadata, signal_endpoint},
};

/// Builds the meter provider, `None` when metrics are not exported.
pub(super) fn build_meter_provider(
    config: &ExporterConfig,
    resource: Resource,
) -> Result<Option<SdkMeterProvider>, TelemetryError> {
    let builder = SdkMeterProvider::builder().with_resource(resource);

    let builder = match config.metrics {
        ExporterKind::None => return Ok(None),
        ExporterKind::Console => builder.with_reader(
            PeriodicReader::builder(opentelemetry_stdout::MetricExporter::default(), runtime::Tokio)
                .build(),
        ),
        ExporterKind::Otlp => builder.with_reader(
            PeriodicReader::builder(build_otlp_exporter(config)?, runtime::Tokio)
                .with_timeout(config.timeout)
                .build(),
        ),
    };

    Ok(Some(builder.build()))
}

fn build_otlp_exporter(config: &ExporterConfig) -> Result<MetricExporter, TelemetryError> {
    match config.protocol {
        OtlpProtocol::Grpc => MetricExporter::builder()
            .with_tonic()
            .with_endpoint(config.endpoint.as_str())
            .with_timeout(config.timeout)
            .with_metadata(build_metadata(&config.headers)?)
            .build(),
        OtlpProtocol::HttpProtobuf => MetricExporter::builder()
            .with_http()
            .with_endpoint(signal_endpoint(&config.endpoint, "metrics"))
            .with_timeout(config.timeout)
            .with_headers(config.headers.clone())
            .with_protocol(Protocol::HttpBinary)
            .build(),
    }
    .map_err(|e| TelemetryError::MetricsExporterSetup(e.to_string()))
}
