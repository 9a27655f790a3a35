/// OpenTelemetry standard attributes
pub const OTEL_NAME: &str = "otel.name";
pub const OTEL_KIND: &str = "otel.kind";
pub const OTEL_STATUS_CODE: &str = "otel.status_code";
pub const OTEL_STATUS_MESSAGE: &str = "otel.status_message";

/// OpenTelemetry standard attributes for errors
pub const ERROR_TYPE: &str = "error.type";
pub const ERROR_MESSAGE: &str = "error.message";

/// Server attributes (OpenTelemetry Semantic Conventions)
pub const SERVER_ADDRESS: &str = "server.address";
pub const SERVER_PORT: &str = "server.port";

/// Database client attributes (OpenTelemetry Semantic Conventions)
pub const DB_SYSTEM_NAME: &str = "db.system.name";
pub const DB_OPERATION_NAME: &str = "db.operation.name";
pub const DB_COLLECTION_NAME: &str = "db.collection.name";
pub const DB_OPERATION_BATCH_SIZE: &str = "db.operation.batch.size";
pub const DB_QUERY_TEXT: &str = "db.query.text";

/// Weaviate-specific attributes
pub const WEAVIATE_OPERATION_CATEGORY: &str = "db.weaviate.operation.category";
pub const WEAVIATE_OPERATION_SUCCESS: &str = "db.weaviate.operation.success";
pub const WEAVIATE_OBJECT_COUNT: &str = "db.weaviate.object.count";
pub const WEAVIATE_QUERY_LIMIT: &str = "db.weaviate.query.limit";
pub const WEAVIATE_QUERY_VECTOR_DIMENSIONS: &str = "db.weaviate.query.vector.dimensions";
pub const WEAVIATE_BATCH_ERROR_COUNT: &str = "db.weaviate.batch.error.count";
pub const WEAVIATE_DELETE_MATCHES: &str = "db.weaviate.delete.matches";
pub const WEAVIATE_DELETE_FAILED: &str = "db.weaviate.delete.failed";
pub const WEAVIATE_AGGREGATE_TOTAL_COUNT: &str = "db.weaviate.aggregate.total_count";

/// Attributes of `weaviate.document` span events
pub const WEAVIATE_DOCUMENT_ID: &str = "db.weaviate.document.id";
pub const WEAVIATE_DOCUMENT_CONTENT: &str = "db.weaviate.document.content";
pub const WEAVIATE_DOCUMENT_DISTANCE: &str = "db.weaviate.document.distance";
pub const WEAVIATE_DOCUMENT_CERTAINTY: &str = "db.weaviate.document.certainty";
pub const WEAVIATE_DOCUMENT_SCORE: &str = "db.weaviate.document.score";
pub const WEAVIATE_DOCUMENT_QUERY: &str = "db.weaviate.document.query";

pub const DB_SYSTEM_WEAVIATE: &str = "weaviate";
pub const DOCUMENT_EVENT_NAME: &str = "weaviate.document";
