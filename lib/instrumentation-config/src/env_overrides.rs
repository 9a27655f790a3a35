use config::{builder::BuilderState, ConfigBuilder, ConfigError};
use envconfig::Envconfig;
use tracing::debug;

use crate::{
    exporter::{parse_headers, ExporterKind, OtlpProtocol},
    log::{LogFormat, LogLevel},
};

#[derive(Envconfig)]
pub struct EnvVarOverrides {
    // Logger overrides
    #[envconfig(from = "LOG_LEVEL")]
    pub log_level: Option<LogLevel>,
    #[envconfig(from = "LOG_FORMAT")]
    pub log_format: Option<LogFormat>,
    #[envconfig(from = "LOG_FILTER")]
    pub log_filter: Option<String>,

    // Content capture overrides
    #[envconfig(from = "OTEL_INSTRUMENTATION_GENAI_CAPTURE_MESSAGE_CONTENT")]
    pub capture_message_content: Option<String>,
    #[envconfig(from = "OTEL_INSTRUMENTATION_WEAVIATE_MAX_DOCUMENTS")]
    pub capture_max_documents: Option<usize>,
    #[envconfig(from = "OTEL_INSTRUMENTATION_WEAVIATE_CONTENT_MAX_LENGTH")]
    pub capture_max_content_length: Option<usize>,

    // Exporter overrides
    #[envconfig(from = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
    #[envconfig(from = "OTEL_EXPORTER_OTLP_PROTOCOL")]
    pub otlp_protocol: Option<OtlpProtocol>,
    #[envconfig(from = "OTEL_EXPORTER_OTLP_HEADERS")]
    pub otlp_headers: Option<String>,
    #[envconfig(from = "OTEL_TRACES_EXPORTER")]
    pub traces_exporter: Option<ExporterKind>,
    #[envconfig(from = "OTEL_METRICS_EXPORTER")]
    pub metrics_exporter: Option<ExporterKind>,
    #[envconfig(from = "OTEL_LOGS_EXPORTER")]
    pub logs_exporter: Option<ExporterKind>,

    #[envconfig(from = "OTEL_SERVICE_NAME")]
    pub service_name: Option<String>,

    #[envconfig(from = "VECTOR_INSTRUMENTATION_CONFIG_FILE_PATH")]
    pub config_file_path: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum EnvVarOverridesError {
    #[error("Failed to override configuration: {0}")]
    FailedToOverrideConfig(#[from] ConfigError),
    #[error("Invalid value for OTEL_EXPORTER_OTLP_HEADERS: {0}")]
    InvalidHeaders(String),
}

impl EnvVarOverrides {
    pub fn apply_overrides<T: BuilderState>(
        mut self,
        mut config: ConfigBuilder<T>,
    ) -> Result<ConfigBuilder<T>, EnvVarOverridesError> {
        if let Some(log_level) = self.log_level.take() {
            debug!("[config-override] 'log.level' = {:?}", log_level);
            config = config.set_override("log.level", <&'static str>::from(log_level))?;
        }
        if let Some(log_format) = self.log_format.take() {
            debug!("[config-override] 'log.format' = {:?}", log_format);
            config = config.set_override("log.format", <&'static str>::from(log_format))?;
        }
        if let Some(log_filter) = self.log_filter.take() {
            debug!("[config-override] 'log.filter' = {:?}", log_filter);
            config = config.set_override("log.filter", log_filter)?;
        }

        if let Some(raw) = self.capture_message_content.take() {
            let enabled = raw.trim().eq_ignore_ascii_case("true");
            debug!("[config-override] 'capture.enabled' = {}", enabled);
            config = config.set_override("capture.enabled", enabled)?;
        }
        if let Some(max_documents) = self.capture_max_documents.take() {
            debug!("[config-override] 'capture.max_documents' = {}", max_documents);
            config = config.set_override("capture.max_documents", max_documents as u64)?;
        }
        if let Some(max_length) = self.capture_max_content_length.take() {
            debug!("[config-override] 'capture.max_content_length' = {}", max_length);
            config = config.set_override("capture.max_content_length", max_length as u64)?;
        }

        if let Some(endpoint) = self.otlp_endpoint.take() {
            debug!("[config-override] 'exporter.endpoint' = {}", endpoint);
            config = config.set_override("exporter.endpoint", endpoint)?;
        }
        if let Some(protocol) = self.otlp_protocol.take() {
            debug!("[config-override] 'exporter.protocol' = {:?}", protocol);
            config = config.set_override("exporter.protocol", protocol.as_str())?;
        }
        if let Some(raw) = self.otlp_headers.take() {
            let headers = parse_headers(&raw).map_err(EnvVarOverridesError::InvalidHeaders)?;
            // Header values are secrets, only keys are logged.
            debug!(
                "[config-override] 'exporter.headers' = {:?}",
                headers.keys().collect::<Vec<_>>()
            );
            config = config.set_override("exporter.headers", headers)?;
        }
        if let Some(kind) = self.traces_exporter.take() {
            config = config.set_override("exporter.traces", kind.as_str())?;
        }
        if let Some(kind) = self.metrics_exporter.take() {
            config = config.set_override("exporter.metrics", kind.as_str())?;
        }
        if let Some(kind) = self.logs_exporter.take() {
            config = config.set_override("exporter.logs", kind.as_str())?;
        }

        if let Some(service_name) = self.service_name.take() {
            config = config.set_override("service_name", service_name)?;
        }

        Ok(config)
    }
}
