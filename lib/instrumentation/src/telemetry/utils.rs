use std::{collections::HashMap, str::FromStr};

use tonic::metadata::{MetadataKey, MetadataMap};

use crate::telemetry::error::TelemetryError;

pub(super) fn build_metadata(
    headers: &HashMap<String, String>,
) -> Result<MetadataMap, TelemetryError> {
    let metadata = MetadataMap::with_capacity(headers.len());

    headers
        .iter()
        .try_fold(metadata, |mut acc, (header_name, header_value)| {
            let key = MetadataKey::from_str(header_name.as_str()).map_err(|e| {
                TelemetryError::Internal(format!("Invalid metadata key '{}': {}", header_name, e))
            })?;
            acc.insert(
                key,
                header_value.as_str().parse().map_err(|e| {
                    TelemetryError::Internal(format!(
                        "Invalid metadata value for key '{}': {}",
                        header_name, e
                    ))
                })?,
            );
            Ok(acc)
        })
}

/// OTLP/HTTP exporters take the full URL of one signal, `{endpoint}/v1/{signal}`.
pub(super) fn signal_endpoint(endpoint: &str, signal: &str) -> String {
    let base = endpoint.trim_end_matches('/');
    let suffix = format!("/v1/{signal}");
    if base.ends_with(&suffix) {
        base.to_string()
    } else {
        format!("{base}{suffix}")
    }
}
