//! Pipeline setup for hosts that do not bring their own OpenTelemetry providers.
//!
//! [`init`] builds the tracer, meter and logger providers described by the exporter
//! configuration, installs them globally and installs the `tracing` subscriber stack.
//! The instrumentation itself only talks to `tracing` and the global meter provider, so
//! it works the same with any other pipeline.
use std::io::IsTerminal;

use opentelemetry::{
    global,
    metrics::{Meter, MeterProvider},
    trace::TracerProvider,
    InstrumentationScope,
};
use opentelemetry_sdk::{
    logs::SdkLoggerProvider, metrics::SdkMeterProvider, trace::SdkTracerProvider, Resource,
};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::{filter_fn, Targets},
    fmt::{self, time::UtcTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};
use vector_instrumentation_config::{
    log::{LogFormat, LoggingConfig},
    InstrumentationConfig,
};

use crate::spans::TARGET_NAME;

pub mod error;
mod logs;
mod metrics;
mod traces;
mod utils;

pub use error::TelemetryError;

pub struct TelemetryProviders {
    pub tracer: Option<SdkTracerProvider>,
    pub meter: Option<SdkMeterProvider>,
    pub logger: Option<SdkLoggerProvider>,
    _stdout_guard: WorkerGuard,
}

impl TelemetryProviders {
    /// A meter of this pipeline, for [`InstrumentOptions::with_meter`](crate::InstrumentOptions::with_meter).
    pub fn meter(&self) -> Option<Meter> {
        self.meter
            .as_ref()
            .map(|provider| provider.meter_with_scope(instrumentation_scope()))
    }

    pub async fn graceful_shutdown(self) {
        use tokio::task::spawn_blocking;

        let tracer = self.tracer;
        let shutdown_tracer = spawn_blocking(|| {
            if let Some(provider) = tracer {
                let _ = provider.shutdown();
            }
        });

        let meter = self.meter;
        let shutdown_meter = spawn_blocking(|| {
            if let Some(provider) = meter {
                let _ = provider.shutdown();
            }
        });

        let logger = self.logger;
        let shutdown_logger = spawn_blocking(|| {
            if let Some(provider) = logger {
                let _ = provider.shutdown();
            }
        });

        let _ = tokio::join!(shutdown_tracer, shutdown_meter, shutdown_logger);
    }
}

fn instrumentation_scope() -> InstrumentationScope {
    InstrumentationScope::builder(TARGET_NAME)
        .with_version(env!("CARGO_PKG_VERSION"))
        .build()
}

fn build_resource(config: &InstrumentationConfig) -> Resource {
    Resource::builder()
        .with_service_name(config.service_name.clone())
        .build()
}

/// Directives of the log output. Operation spans are admitted by their own filter, so
/// `LOG_LEVEL` only decides what gets logged.
fn log_filter(log: &LoggingConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from(log.level).into())
        .parse(log.filter.as_deref().unwrap_or_default())
        .map_err(|e| TelemetryError::SubscriberSetup(format!("invalid log filter: {e}")))
}

/// Builds the providers, sets them as the global tracer and meter providers and installs
/// the process-wide `tracing` subscriber. Must run inside a Tokio runtime.
pub fn init(config: &InstrumentationConfig) -> Result<TelemetryProviders, TelemetryError> {
    let stdout_filter = log_filter(&config.log)?;
    let export_filter = log_filter(&config.log)?;

    let resource = build_resource(config);
    let tracer_provider = traces::build_tracer_provider(&config.exporter, resource.clone())?;
    let meter_provider = metrics::build_meter_provider(&config.exporter, resource.clone())?;
    let logger = logs::build_logger(&config.exporter, resource)?;
    let logger_provider = logger.as_ref().map(|logger| logger.provider.clone());

    let traces_layer = tracer_provider.as_ref().map(|provider| {
        let target_filter = Targets::new()
            .with_target(TARGET_NAME, LevelFilter::INFO)
            .with_default(LevelFilter::INFO);

        tracing_opentelemetry::layer()
            .with_tracer(provider.tracer_with_scope(instrumentation_scope()))
            .with_tracked_inactivity(false)
            .with_location(false)
            .with_threads(false)
            .with_filter(target_filter)
            // Drop events from tracing macros (info!, warn!, etc.),
            // but accept those from span.add_event()
            .with_filter(filter_fn(|metadata| metadata.is_span()))
    });

    // Exporter internals must not feed back into the log pipeline.
    let logs_layer = logger.map(|logger| {
        logger
            .layer
            .with_filter(
                Targets::new()
                    .with_target("h2", LevelFilter::OFF)
                    .with_target("hyper", LevelFilter::OFF)
                    .with_target("tonic", LevelFilter::OFF)
                    .with_target("reqwest", LevelFilter::OFF)
                    .with_target("opentelemetry", LevelFilter::OFF)
                    .with_default(LevelFilter::TRACE),
            )
            .with_filter(export_filter)
    });

    let stdout = std::io::stdout();
    let is_terminal = stdout.is_terminal();
    let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(stdout);
    let timer = UtcTime::rfc_3339();

    let stdout_layer = match config.log.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(stdout_writer)
            .with_timer(timer)
            .with_thread_ids(false)
            .flatten_event(true)
            .with_filter(stdout_filter)
            .boxed(),
        LogFormat::Text => fmt::layer()
            .compact()
            .with_writer(stdout_writer)
            .with_ansi(is_terminal)
            .with_timer(timer)
            .with_thread_ids(false)
            .with_filter(stdout_filter)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(traces_layer)
        .with(logs_layer)
        .with(stdout_layer)
        .try_init()
        .map_err(|e| TelemetryError::SubscriberSetup(e.to_string()))?;

    if let Some(provider) = &tracer_provider {
        global::set_tracer_provider(provider.clone());
    }
    if let Some(provider) = &meter_provider {
        global::set_meter_provider(provider.clone());
    }

    Ok(TelemetryProviders {
        tracer: tracer_provider,
        meter: meter_provider,
        logger: logger_provider,
        _stdout_guard: stdout_guard,
    })
}
