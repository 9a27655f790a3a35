pub mod capture;
mod env_overrides;
pub mod exporter;
pub mod log;

use std::{collections::HashMap, path::PathBuf};

use config::{Config, File, FileFormat, FileSourceFile};
use envconfig::Envconfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;

pub use crate::env_overrides::{EnvVarOverrides, EnvVarOverridesError};
use crate::{capture::ContentCaptureConfig, exporter::ExporterConfig, log::LoggingConfig};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct InstrumentationConfig {
    /// Can also be set via the `OTEL_SERVICE_NAME` environment variable.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// The logger configuration.
    #[serde(default)]
    pub log: LoggingConfig,

    /// Content capture policy for spans. Disabled by default.
    #[serde(default)]
    pub capture: ContentCaptureConfig,

    /// Telemetry export configuration.
    #[serde(default)]
    pub exporter: ExporterConfig,
}

fn default_service_name() -> String {
    "vector-instrumentation".to_string()
}

impl Default for InstrumentationConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            log: LoggingConfig::default(),
            capture: ContentCaptureConfig::default(),
            exporter: ExporterConfig::default(),
        }
    }
}

impl InstrumentationConfig {
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.exporter.endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            endpoint: self.exporter.endpoint.clone(),
            reason: e.to_string(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    ConfigLoadError(#[from] config::ConfigError),
    #[error("Failed to apply configuration overrides: {0}")]
    EnvVarOverridesError(#[from] EnvVarOverridesError),
    #[error("Failed to load the environment variables: {0}")]
    EnvVarLoadError(#[from] envconfig::Error),
    #[error("Invalid exporter endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

static DEFAULT_FILE_NAMES: &[&str] = &[
    "vector-instrumentation.yaml",
    "vector-instrumentation.yml",
    "vector-instrumentation.json",
    "vector-instrumentation.json5",
];

/// Loads the configuration from the process environment and an optional file.
///
/// The file is `override_config_path` when given, then
/// `VECTOR_INSTRUMENTATION_CONFIG_FILE_PATH`, then the first of the default file names
/// found in the current directory. Environment variables take precedence over the file.
pub fn load_config(
    override_config_path: Option<String>,
) -> Result<InstrumentationConfig, ConfigError> {
    load_config_with(EnvVarOverrides::init_from_env()?, override_config_path)
}

/// Same as [`load_config`] with the environment given as a map.
pub fn load_config_from_vars(
    vars: &HashMap<String, String>,
    override_config_path: Option<String>,
) -> Result<InstrumentationConfig, ConfigError> {
    load_config_with(EnvVarOverrides::init_from_hashmap(vars)?, override_config_path)
}

pub fn load_config_with(
    mut env_overrides: EnvVarOverrides,
    override_config_path: Option<String>,
) -> Result<InstrumentationConfig, ConfigError> {
    let mut config = Config::builder();

    match override_config_path.or_else(|| env_overrides.config_file_path.take()) {
        Some(path) => {
            let as_file: File<FileSourceFile, _> = PathBuf::from(path).into();
            config = config.add_source(as_file.required(true));
        }
        None => {
            for name in DEFAULT_FILE_NAMES {
                config = config.add_source(File::with_name(name).required(false));
            }
        }
    }

    config = env_overrides.apply_overrides(config)?;

    let loaded = config.build()?.try_deserialize::<InstrumentationConfig>()?;
    loaded.endpoint_url()?;

    Ok(loaded)
}

pub fn parse_yaml_config(config_raw: &str) -> Result<InstrumentationConfig, ConfigError> {
    let loaded = Config::builder()
        .add_source(File::from_str(config_raw, FileFormat::Yaml))
        .build()?
        .try_deserialize::<InstrumentationConfig>()?;
    loaded.endpoint_url()?;

    Ok(loaded)
}
