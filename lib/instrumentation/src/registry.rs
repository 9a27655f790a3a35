use vector_client::names;

use crate::extract::{
    AggregateExtractor, AttributeExtractor, CollectionsExtractor, DeleteManyExtractor,
    LookupExtractor, QueryExtractor, WriteExtractor,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum OperationCategory {
    Create,
    Read,
    Search,
    Delete,
    Batch,
    Other,
}

impl OperationCategory {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

const COLLECTION_PLACEHOLDER: &str = "{collection}";

/// Declares how one client operation is traced.
pub struct OperationDescriptor {
    /// Slot name in the client's operation table.
    pub qualified_name: &'static str,
    /// Value of `db.operation.name`.
    pub operation_name: &'static str,
    pub category: OperationCategory,
    /// Span name template. `{collection}` is replaced by the target collection.
    pub span_name: &'static str,
    pub extractor: &'static dyn AttributeExtractor,
}

impl OperationDescriptor {
    /// Renders the span name. Without a collection the placeholder is dropped along with
    /// the whitespace around it.
    pub fn span_name_for(&self, collection: Option<&str>) -> String {
        match collection {
            Some(collection) => self.span_name.replace(COLLECTION_PLACEHOLDER, collection),
            None => self
                .span_name
                .replace(COLLECTION_PLACEHOLDER, "")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl std::fmt::Debug for OperationDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationDescriptor")
            .field("qualified_name", &self.qualified_name)
            .field("operation_name", &self.operation_name)
            .field("category", &self.category)
            .field("span_name", &self.span_name)
            .finish_non_exhaustive()
    }
}

macro_rules! descriptor {
    ($qualified:expr, $operation:literal, $category:ident, $span:literal, $extractor:expr) => {
        OperationDescriptor {
            qualified_name: $qualified,
            operation_name: $operation,
            category: OperationCategory::$category,
            span_name: $span,
            extractor: &$extractor,
        }
    };
}

/// Every operation the instrumentation knows how to trace.
pub static REGISTRY: &[OperationDescriptor] = &[
    descriptor!(
        names::COLLECTIONS_CREATE,
        "create_collection",
        Create,
        "create_collection {collection}",
        CollectionsExtractor
    ),
    descriptor!(
        names::COLLECTIONS_GET,
        "get_collection",
        Read,
        "get_collection {collection}",
        CollectionsExtractor
    ),
    descriptor!(
        names::COLLECTIONS_LIST_ALL,
        "list_collections",
        Read,
        "list_collections",
        CollectionsExtractor
    ),
    descriptor!(
        names::COLLECTIONS_DELETE,
        "delete_collection",
        Delete,
        "delete_collection {collection}",
        CollectionsExtractor
    ),
    descriptor!(
        names::COLLECTIONS_DELETE_ALL,
        "delete_all_collections",
        Delete,
        "delete_all_collections",
        CollectionsExtractor
    ),
    descriptor!(
        names::DATA_INSERT,
        "insert",
        Create,
        "insert {collection}",
        WriteExtractor
    ),
    descriptor!(
        names::DATA_INSERT_MANY,
        "insert_many",
        Batch,
        "insert_many {collection}",
        WriteExtractor
    ),
    descriptor!(
        names::DATA_REPLACE,
        "replace",
        Other,
        "replace {collection}",
        WriteExtractor
    ),
    descriptor!(
        names::DATA_UPDATE,
        "update",
        Other,
        "update {collection}",
        WriteExtractor
    ),
    descriptor!(
        names::DATA_EXISTS,
        "exists",
        Read,
        "exists {collection}",
        LookupExtractor
    ),
    descriptor!(
        names::DATA_DELETE_BY_ID,
        "delete_by_id",
        Delete,
        "delete_by_id {collection}",
        LookupExtractor
    ),
    descriptor!(
        names::DATA_DELETE_MANY,
        "delete_many",
        Delete,
        "delete_many {collection}",
        DeleteManyExtractor
    ),
    descriptor!(
        names::QUERY_FETCH_OBJECT_BY_ID,
        "fetch_object_by_id",
        Read,
        "fetch_object_by_id {collection}",
        LookupExtractor
    ),
    descriptor!(
        names::QUERY_FETCH_OBJECTS,
        "fetch_objects",
        Read,
        "fetch_objects {collection}",
        QueryExtractor
    ),
    descriptor!(
        names::QUERY_NEAR_TEXT,
        "near_text",
        Search,
        "near_text {collection}",
        QueryExtractor
    ),
    descriptor!(
        names::QUERY_NEAR_VECTOR,
        "near_vector",
        Search,
        "near_vector {collection}",
        QueryExtractor
    ),
    descriptor!(
        names::QUERY_BM25,
        "bm25",
        Search,
        "bm25 {collection}",
        QueryExtractor
    ),
    descriptor!(
        names::AGGREGATE_OVER_ALL,
        "aggregate",
        Read,
        "aggregate {collection}",
        AggregateExtractor
    ),
    descriptor!(
        names::BATCH_ADD_OBJECTS,
        "batch_add_objects",
        Batch,
        "batch_add_objects {collection}",
        WriteExtractor
    ),
];

pub fn find(qualified_name: &str) -> Option<&'static OperationDescriptor> {
    REGISTRY
        .iter()
        .find(|descriptor| descriptor.qualified_name == qualified_name)
}
