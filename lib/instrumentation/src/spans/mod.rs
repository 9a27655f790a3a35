//! Operation spans are created through the [`operation::OperationSpan`] wrapper rather than
//! ad-hoc `tracing` calls, so every traced client call carries the same field set.
//!
//! Attribute keys live in `attributes` as `const` values and are shared with the
//! extractors and the metrics catalog.
pub const TARGET_NAME: &str = "vector-instrumentation";
pub const SPAN_NAME: &str = "db.weaviate.operation";

pub mod attributes;
pub mod operation;
