use std::collections::HashMap;

use vector_instrumentation_config::{load_config, ConfigError, InstrumentationConfig};

/// Per-session content capture policy and exporter settings.
///
/// Built once when instrumentation is applied and shared read-only by every wrapped
/// operation of that session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    pub capture_content: bool,
    pub max_documents: usize,
    pub max_content_length: usize,
    pub endpoint: String,
    pub exporter_options: HashMap<String, String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self::from_config(&InstrumentationConfig::default())
    }
}

impl CaptureConfig {
    pub fn from_config(config: &InstrumentationConfig) -> Self {
        Self {
            capture_content: config.capture.enabled,
            max_documents: config.capture.max_documents,
            max_content_length: config.capture.max_content_length,
            endpoint: config.exporter.endpoint.clone(),
            exporter_options: config.exporter.headers.clone(),
        }
    }

    /// Reads the environment and the optional configuration file.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_config(None).map(|config| Self::from_config(&config))
    }

    pub fn with_content_capture(mut self, enabled: bool) -> Self {
        self.capture_content = enabled;
        self
    }

    /// Cuts `content` down to `max_content_length` characters.
    pub fn truncate(&self, content: &str) -> String {
        match content.char_indices().nth(self.max_content_length) {
            Some((end, _)) => content[..end].to_string(),
            None => content.to_string(),
        }
    }
}
