use opentelemetry::{KeyValue, Value};
use tracing::{field::Empty, info_span, Span};
use tracing_opentelemetry::OpenTelemetrySpanExt;
use vector_client::{ClientError, Connection};

use crate::{
    registry::OperationDescriptor,
    spans::{attributes, SPAN_NAME, TARGET_NAME},
};

/// The client span of one traced operation call.
#[derive(Clone)]
pub struct OperationSpan {
    pub span: Span,
}

impl std::ops::Deref for OperationSpan {
    type Target = Span;
    fn deref(&self) -> &Self::Target {
        &self.span
    }
}

impl OperationSpan {
    pub fn new(
        descriptor: &OperationDescriptor,
        connection: &Connection,
        collection: Option<&str>,
    ) -> Self {
        let name = descriptor.span_name_for(collection);

        let span = info_span!(
            target: TARGET_NAME,
            SPAN_NAME,
            "otel.name" = name.as_str(),
            "otel.kind" = "Client",
            "otel.status_code" = Empty,
            "otel.status_message" = Empty,
            "error.type" = Empty,
            "error.message" = Empty,

            // Stable Attributes
            "db.system.name" = attributes::DB_SYSTEM_WEAVIATE,
            "db.operation.name" = descriptor.operation_name,
            "db.collection.name" = collection,
            "server.address" = connection.host(),
            "server.port" = connection.port(),
            "db.operation.batch.size" = Empty,
            "db.query.text" = Empty,

            // Weaviate Attributes
            "db.weaviate.operation.category" = descriptor.category.as_str(),
            "db.weaviate.operation.success" = Empty,
            "db.weaviate.object.count" = Empty,
            "db.weaviate.query.limit" = Empty,
        );

        OperationSpan { span }
    }

    /// Records extractor output. Keys declared on the span are recorded as fields, any
    /// other key is attached directly to the OpenTelemetry span.
    pub fn record_attributes(&self, attributes: &[KeyValue]) {
        for attribute in attributes {
            let key = attribute.key.as_str();
            if self.span.field(key).is_none() {
                self.span
                    .set_attribute(attribute.key.clone(), attribute.value.clone());
                continue;
            }

            match &attribute.value {
                Value::Bool(value) => {
                    self.span.record(key, *value);
                }
                Value::I64(value) => {
                    self.span.record(key, *value);
                }
                Value::F64(value) => {
                    self.span.record(key, *value);
                }
                Value::String(value) => {
                    self.span.record(key, value.as_str());
                }
                _ => self
                    .span
                    .set_attribute(attribute.key.clone(), attribute.value.clone()),
            }
        }
    }

    pub fn record_documents(&self, documents: Vec<Vec<KeyValue>>) {
        for document in documents {
            self.span
                .add_event(attributes::DOCUMENT_EVENT_NAME, document);
        }
    }

    pub fn record_success(&self) {
        self.record(attributes::OTEL_STATUS_CODE, "Ok");
        self.record(attributes::WEAVIATE_OPERATION_SUCCESS, true);
    }

    pub fn record_error(&self, error: &ClientError) {
        let message = error.to_string();
        self.record(attributes::OTEL_STATUS_CODE, "Error");
        self.record(attributes::OTEL_STATUS_MESSAGE, message.as_str());
        self.record(attributes::ERROR_TYPE, error.kind());
        self.record(attributes::ERROR_MESSAGE, message.as_str());
        self.record(attributes::WEAVIATE_OPERATION_SUCCESS, false);
    }
}
