use std::sync::Arc;

use async_trait::async_trait;
use opentelemetry::{metrics::Meter, Context};
use tracing::Instrument;
use vector_client::{ClientError, Connection, Operation, OperationHandle, Request, Response};

use crate::{
    capture::CaptureConfig,
    extract::{request_fields, response_fields},
    metrics::OperationMetrics,
    registry::OperationDescriptor,
    spans::operation::OperationSpan,
};

/// Produces the wrapped handles of one instrumentation session. Every handle it wraps
/// shares the session's capture policy and metric instruments.
#[derive(Clone)]
pub struct Emitter {
    capture: Arc<CaptureConfig>,
    metrics: Arc<OperationMetrics>,
}

impl Emitter {
    pub fn new(capture: CaptureConfig, meter: Option<&Meter>) -> Self {
        Self {
            capture: Arc::new(capture),
            metrics: Arc::new(OperationMetrics::new(meter)),
        }
    }

    pub fn wrap(
        &self,
        original: OperationHandle,
        descriptor: &'static OperationDescriptor,
    ) -> OperationHandle {
        Arc::new(TracedOperation {
            original,
            descriptor,
            capture: Arc::clone(&self.capture),
            metrics: Arc::clone(&self.metrics),
        })
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("capture", &self.capture)
            .finish_non_exhaustive()
    }
}

struct TracedOperation {
    original: OperationHandle,
    descriptor: &'static OperationDescriptor,
    capture: Arc<CaptureConfig>,
    metrics: Arc<OperationMetrics>,
}

#[async_trait]
impl Operation for TracedOperation {
    async fn invoke(
        &self,
        connection: &Connection,
        request: Request,
    ) -> Result<Response, ClientError> {
        // Calls made inside `Context::enter_telemetry_suppressed_scope` go straight through.
        if Context::is_current_telemetry_suppressed() {
            return self.original.invoke(connection, request).await;
        }

        let span = OperationSpan::new(self.descriptor, connection, request.collection());
        let request_fields = request_fields(self.descriptor, &request, &self.capture);
        span.record_attributes(&request_fields.attributes);

        let metrics = self.metrics.capture_operation(self.descriptor);
        let result = self
            .original
            .invoke(connection, request)
            .instrument(span.span.clone())
            .await;

        match &result {
            Ok(response) => {
                let fields =
                    response_fields(self.descriptor, response, &request_fields, &self.capture);
                span.record_attributes(&fields.attributes);
                span.record_documents(fields.documents);
                span.record_success();
                metrics.finish_ok(fields.object_count);
            }
            Err(error) => {
                span.record_error(error);
                metrics.finish_error(error.kind());
            }
        }

        result
    }

    fn is_instrumented(&self) -> bool {
        true
    }
}
