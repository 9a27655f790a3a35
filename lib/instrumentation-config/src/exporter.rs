use std::{collections::HashMap, str::FromStr, time::Duration};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    /// The OTLP collector endpoint.
    ///
    /// Can also be set via the `OTEL_EXPORTER_OTLP_ENDPOINT` environment variable.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Can also be set via the `OTEL_EXPORTER_OTLP_PROTOCOL` environment variable.
    #[serde(default)]
    pub protocol: OtlpProtocol,

    /// Extra headers (HTTP) or metadata (gRPC) sent with every export.
    ///
    /// Can also be set via the `OTEL_EXPORTER_OTLP_HEADERS` environment variable,
    /// formatted as `key=value,key2=value2`.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,

    #[serde(
        default = "default_timeout",
        deserialize_with = "humantime_serde::deserialize",
        serialize_with = "humantime_serde::serialize"
    )]
    #[schemars(with = "String")]
    pub timeout: Duration,

    /// Can also be set via the `OTEL_TRACES_EXPORTER` environment variable.
    #[serde(default)]
    pub traces: ExporterKind,

    /// Can also be set via the `OTEL_METRICS_EXPORTER` environment variable.
    #[serde(default)]
    pub metrics: ExporterKind,

    /// Can also be set via the `OTEL_LOGS_EXPORTER` environment variable.
    #[serde(default)]
    pub logs: ExporterKind,
}

fn default_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            protocol: OtlpProtocol::default(),
            headers: HashMap::new(),
            timeout: default_timeout(),
            traces: ExporterKind::default(),
            metrics: ExporterKind::default(),
            logs: ExporterKind::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub enum OtlpProtocol {
    #[default]
    #[serde(rename = "grpc")]
    Grpc,
    #[serde(rename = "http/protobuf")]
    HttpProtobuf,
}

impl OtlpProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtlpProtocol::Grpc => "grpc",
            OtlpProtocol::HttpProtobuf => "http/protobuf",
        }
    }
}

impl FromStr for OtlpProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "grpc" => Ok(OtlpProtocol::Grpc),
            "http/protobuf" | "http" => Ok(OtlpProtocol::HttpProtobuf),
            _ => Err(format!("Invalid OTLP protocol: {}", s)),
        }
    }
}

/// Where a telemetry signal is sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExporterKind {
    #[default]
    Otlp,
    Console,
    None,
}

impl ExporterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExporterKind::Otlp => "otlp",
            ExporterKind::Console => "console",
            ExporterKind::None => "none",
        }
    }
}

impl FromStr for ExporterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "otlp" => Ok(ExporterKind::Otlp),
            "console" | "stdout" => Ok(ExporterKind::Console),
            "none" => Ok(ExporterKind::None),
            _ => Err(format!("Invalid exporter: {}", s)),
        }
    }
}

/// Parses `key=value,key2=value2`. Whitespace around keys and values is trimmed and
/// empty segments are skipped.
pub fn parse_headers(raw: &str) -> Result<HashMap<String, String>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(format!("Invalid header '{}', expected key=value", pair)),
        })
        .collect()
}
