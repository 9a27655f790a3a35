#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("internal error: {0}")]
    Internal(String),
    #[error("unable to configure span exporter: {0}")]
    SpanExporterSetup(String),
    #[error("unable to configure metrics exporter: {0}")]
    MetricsExporterSetup(String),
    #[error("unable to configure logs exporter: {0}")]
    LogsExporterSetup(String),
    #[error("unable to install the tracing subscriber: {0}")]
    SubscriberSetup(String),
}

