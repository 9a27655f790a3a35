use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::{LogExporter, Protocol, WithExportConfig, WithHttpConfig, WithTonicConfig};
use opentelemetry_sdk::{
    logs::{log_processor_with_async_runtime::BatchLogProcessor, SdkLogger, SdkLoggerProvider},
    runtime, Resource,
};
use vector_instrumentation_config::exporter::{ExporterConfig, ExporterKind, OtlpProtocol};

use crate::telemetry::{
    error::TelemetryError,
    utils::{build_metadata, signal_endpoint},
};

pub struct Logger {
    pub layer: OpenTelemetryTracingBridge<SdkLoggerProvider, SdkLogger>,
    pub provider: SdkLoggerProvider,
}

impl Logger {
    fn new(provider: SdkLoggerProvider) -> Self {
        Self {
            layer: OpenTelemetryTracingBridge::new(&provider),
            provider,
        }
    }
}

/// Builds the logger provider and its `tracing` bridge, `None` when logs are not exported.
pub(super) fn build_logger(
    config: &ExporterConfig,
    resource: Resource,
) -> Result<Option<Logger>, TelemetryError> {
    let builder = SdkLoggerProvider::builder().with_resource(resource);

    let builder = match config.logs {
        ExporterKind::None => return Ok(None),
        ExporterKind::Console => {
            builder.with_simple_exporter(opentelemetry_stdout::LogExporter::default())
        }
        ExporterKind::Otlp => builder.with_log_processor(
            BatchLogProcessor::builder(build_otlp_exporter(config)?, runtime::Tokio).build(),
        ),
    };

    Ok(Some(Logger::new(builder.build())))
}

fn build_otlp_exporter(config: &ExporterConfig) -> Result<LogExporter, TelemetryError> {
    match config.protocol {
        OtlpProtocol::Grpc => LogExporter::builder()
            .with_tonic()
            .with_endpoint(config.endpoint.as_str())
            .with_timeout(config.timeout)
            .with_metadata(build_metadata(&config.headers)?)
            .build(),
        OtlpProtocol::HttpProtobuf => LogExporter::builder()
            .with_http()
            .with_endpoint(signal_endpoint(&config.endpoint, "logs"))
            .with_timeout(config.timeout)
            .with_headers(config.headers.clone())
            .with_protocol(Protocol::HttpBinary)
            .build(),
    }
    .map_err(|e| TelemetryError::LogsExporterSetup(e.to_string()))
}
