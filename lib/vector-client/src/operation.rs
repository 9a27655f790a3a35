use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    connection::Connection,
    error::ClientError,
    model::{
        AggregateReturn, BatchReturn, CollectionConfig, DataObject, DeleteManyReturn, Filter,
        Properties, QueryObject, QueryReturn,
    },
};

/// Qualified names of the operation slots a client dispatches through.
pub mod names {
    pub const COLLECTIONS_CREATE: &str = "collections.create";
    pub const COLLECTIONS_GET: &str = "collections.get";
    pub const COLLECTIONS_LIST_ALL: &str = "collections.list_all";
    pub const COLLECTIONS_DELETE: &str = "collections.delete";
    pub const COLLECTIONS_DELETE_ALL: &str = "collections.delete_all";
    pub const DATA_INSERT: &str = "collections.data.insert";
    pub const DATA_INSERT_MANY: &str = "collections.data.insert_many";
    pub const DATA_REPLACE: &str = "collections.data.replace";
    pub const DATA_UPDATE: &str = "collections.data.update";
    pub const DATA_EXISTS: &str = "collections.data.exists";
    pub const DATA_DELETE_BY_ID: &str = "collections.data.delete_by_id";
    pub const DATA_DELETE_MANY: &str = "collections.data.delete_many";
    pub const QUERY_FETCH_OBJECT_BY_ID: &str = "collections.query.fetch_object_by_id";
    pub const QUERY_FETCH_OBJECTS: &str = "collections.query.fetch_objects";
    pub const QUERY_NEAR_TEXT: &str = "collections.query.near_text";
    pub const QUERY_NEAR_VECTOR: &str = "collections.query.near_vector";
    pub const QUERY_BM25: &str = "collections.query.bm25";
    pub const AGGREGATE_OVER_ALL: &str = "collections.aggregate.over_all";
    pub const BATCH_ADD_OBJECTS: &str = "collections.batch.add_objects";

    pub const ALL: &[&str] = &[
        COLLECTIONS_CREATE,
        COLLECTIONS_GET,
        COLLECTIONS_LIST_ALL,
        COLLECTIONS_DELETE,
        COLLECTIONS_DELETE_ALL,
        DATA_INSERT,
        DATA_INSERT_MANY,
        DATA_REPLACE,
        DATA_UPDATE,
        DATA_EXISTS,
        DATA_DELETE_BY_ID,
        DATA_DELETE_MANY,
        QUERY_FETCH_OBJECT_BY_ID,
        QUERY_FETCH_OBJECTS,
        QUERY_NEAR_TEXT,
        QUERY_NEAR_VECTOR,
        QUERY_BM25,
        AGGREGATE_OVER_ALL,
        BATCH_ADD_OBJECTS,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    CreateCollection {
        config: CollectionConfig,
    },
    GetCollection {
        name: String,
    },
    ListCollections,
    DeleteCollection {
        name: String,
    },
    DeleteAllCollections,
    Insert {
        collection: String,
        object: DataObject,
    },
    InsertMany {
        collection: String,
        objects: Vec<DataObject>,
    },
    Replace {
        collection: String,
        uuid: Uuid,
        properties: Properties,
    },
    Update {
        collection: String,
        uuid: Uuid,
        properties: Properties,
    },
    Exists {
        collection: String,
        uuid: Uuid,
    },
    DeleteById {
        collection: String,
        uuid: Uuid,
    },
    DeleteMany {
        collection: String,
        filter: Filter,
    },
    FetchObjectById {
        collection: String,
        uuid: Uuid,
    },
    FetchObjects {
        collection: String,
        limit: Option<usize>,
    },
    NearText {
        collection: String,
        query: String,
        limit: Option<usize>,
    },
    NearVector {
        collection: String,
        vector: Vec<f32>,
        limit: Option<usize>,
    },
    Bm25 {
        collection: String,
        query: String,
        limit: Option<usize>,
    },
    Aggregate {
        collection: String,
    },
    BatchObjects {
        collection: String,
        objects: Vec<DataObject>,
    },
}

impl Request {
    /// The collection the request targets, if it targets exactly one.
    pub fn collection(&self) -> Option<&str> {
        match self {
            Request::CreateCollection { config } => Some(&config.name),
            Request::GetCollection { name } | Request::DeleteCollection { name } => Some(name),
            Request::ListCollections | Request::DeleteAllCollections => None,
            Request::Insert { collection, .. }
            | Request::InsertMany { collection, .. }
            | Request::Replace { collection, .. }
            | Request::Update { collection, .. }
            | Request::Exists { collection, .. }
            | Request::DeleteById { collection, .. }
            | Request::DeleteMany { collection, .. }
            | Request::FetchObjectById { collection, .. }
            | Request::FetchObjects { collection, .. }
            | Request::NearText { collection, .. }
            | Request::NearVector { collection, .. }
            | Request::Bm25 { collection, .. }
            | Request::Aggregate { collection }
            | Request::BatchObjects { collection, .. } => Some(collection),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Collection(CollectionConfig),
    Collections(Vec<CollectionConfig>),
    Uuid(Uuid),
    Batch(BatchReturn),
    Bool(bool),
    Object(Option<QueryObject>),
    Objects(QueryReturn),
    Deleted(DeleteManyReturn),
    Aggregate(AggregateReturn),
    Unit,
}

/// A single client entry point. Every client call resolves one of these from the
/// client's [`OperationTable`](crate::OperationTable) and invokes it.
#[async_trait]
pub trait Operation: Send + Sync + 'static {
    async fn invoke(
        &self,
        connection: &Connection,
        request: Request,
    ) -> Result<Response, ClientError>;

    /// `true` when this handle wraps another one with instrumentation.
    fn is_instrumented(&self) -> bool {
        false
    }
}

pub type OperationHandle = Arc<dyn Operation>;

/// Forwards the request to the connection's transport unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransportOperation;

#[async_trait]
impl Operation for TransportOperation {
    async fn invoke(
        &self,
        connection: &Connection,
        request: Request,
    ) -> Result<Response, ClientError> {
        connection.transport().execute(request).await
    }
}
