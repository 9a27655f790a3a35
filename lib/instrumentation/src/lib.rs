//! OpenTelemetry tracing and metrics for the vector database client.
//!
//! [`instrument`] swaps every operation slot of the process-wide
//! [`OperationTable`](vector_client::OperationTable) for a traced wrapper and
//! [`uninstrument`] puts the original handles back. Clients built with
//! [`Client::connect`](vector_client::Client::connect) dispatch through that table, so their
//! call sites stay unchanged.
pub mod capture;
pub mod emitter;
pub mod extract;
pub mod instrumentor;
pub mod metrics;
pub mod patch;
pub mod registry;
pub mod spans;
pub mod telemetry;

pub use capture::CaptureConfig;
pub use emitter::Emitter;
pub use instrumentor::{
    instrument, uninstrument, InstrumentOptions, InstrumentationError, Instrumentor,
};
pub use patch::{PatchManager, PatchRecord, PatchReport};
pub use registry::{OperationCategory, OperationDescriptor, REGISTRY};
