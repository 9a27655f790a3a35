use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Controls whether request and response content is recorded on spans.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ContentCaptureConfig {
    /// Record query text and returned documents.
    ///
    /// Can also be set via the `OTEL_INSTRUMENTATION_GENAI_CAPTURE_MESSAGE_CONTENT`
    /// environment variable. Only the value `true` (any case) enables it.
    #[serde(default)]
    pub enabled: bool,

    /// Maximum number of `weaviate.document` events recorded on a single span.
    #[serde(default = "default_max_documents")]
    pub max_documents: usize,

    /// Document content longer than this many characters is truncated.
    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,
}

fn default_max_documents() -> usize {
    10
}

fn default_max_content_length() -> usize {
    1024
}

impl Default for ContentCaptureConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_documents: default_max_documents(),
            max_content_length: default_max_content_length(),
        }
    }
}
