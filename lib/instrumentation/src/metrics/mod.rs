mod capture;
pub mod catalog;

pub use capture::Capture;

use std::time::Instant;

use opentelemetry::{
    metrics::{Histogram, Meter},
    KeyValue,
};

#[cfg(debug_assertions)]
use crate::metrics::catalog::debug_assert_attrs;
use crate::{
    metrics::catalog::{labels, names},
    registry::OperationDescriptor,
    spans::attributes::DB_SYSTEM_WEAVIATE,
};

/// Instruments recorded for every traced operation call.
#[derive(Clone)]
pub struct OperationMetrics {
    duration: Option<Histogram<f64>>,
    returned_rows: Option<Histogram<u64>>,
}

pub struct OperationState<'a> {
    metrics: &'a OperationMetrics,
    descriptor: &'a OperationDescriptor,
    started_at: Instant,
}

impl OperationMetrics {
    pub fn new(meter: Option<&Meter>) -> Self {
        let duration = meter.map(|meter| {
            meter
                .f64_histogram(names::DB_CLIENT_OPERATION_DURATION)
                .with_unit("s")
                .with_description("Duration of vector database client operations")
                .build()
        });
        let returned_rows = meter.map(|meter| {
            meter
                .u64_histogram(names::DB_CLIENT_RESPONSE_RETURNED_ROWS)
                .with_unit("{row}")
                .with_description("Number of objects returned or affected by an operation")
                .build()
        });

        Self {
            duration,
            returned_rows,
        }
    }

    pub fn disabled() -> Self {
        Self::new(None)
    }

    fn is_enabled(&self) -> bool {
        self.duration.is_some() || self.returned_rows.is_some()
    }

    pub fn capture_operation<'a>(
        &'a self,
        descriptor: &'a OperationDescriptor,
    ) -> Capture<OperationState<'a>> {
        if !self.is_enabled() {
            return Capture::disabled();
        }

        Capture::enabled(OperationState {
            metrics: self,
            descriptor,
            started_at: Instant::now(),
        })
    }
}

fn base_attributes(descriptor: &OperationDescriptor) -> Vec<KeyValue> {
    vec![
        KeyValue::new(labels::DB_SYSTEM_NAME, DB_SYSTEM_WEAVIATE),
        KeyValue::new(labels::DB_OPERATION_NAME, descriptor.operation_name),
        KeyValue::new(labels::OPERATION_CATEGORY, descriptor.category.as_str()),
    ]
}

impl Capture<OperationState<'_>> {
    pub fn finish_ok(self, object_count: Option<u64>) {
        let Some(state) = self.take() else {
            return;
        };

        if let (Some(histogram), Some(rows)) = (&state.metrics.returned_rows, object_count) {
            let attributes = base_attributes(state.descriptor);
            #[cfg(debug_assertions)]
            debug_assert_attrs(names::DB_CLIENT_RESPONSE_RETURNED_ROWS, &attributes);
            histogram.record(rows, &attributes);
        }

        state.record_duration(true, None);
    }

    pub fn finish_error(self, error_type: &'static str) {
        let Some(state) = self.take() else {
            return;
        };

        state.record_duration(false, Some(error_type));
    }
}

impl OperationState<'_> {
    fn record_duration(&self, success: bool, error_type: Option<&'static str>) {
        let Some(histogram) = &self.metrics.duration else {
            return;
        };

        let mut attributes = base_attributes(self.descriptor);
        attributes.push(KeyValue::new(labels::OPERATION_SUCCESS, success));
        if let Some(error_type) = error_type {
            attributes.push(KeyValue::new(labels::ERROR_TYPE, error_type));
        }

        #[cfg(debug_assertions)]
        debug_assert_attrs(names::DB_CLIENT_OPERATION_DURATION, &attributes);
        histogram.record(self.started_at.elapsed().as_secs_f64(), &attributes);
    }
}
