use std::sync::Arc;

use uuid::Uuid;

use crate::{
    connection::{Connection, Transport},
    error::ClientError,
    model::{
        AggregateReturn, BatchReturn, CollectionConfig, DataObject, DeleteManyReturn, Filter,
        Properties, QueryObject, QueryReturn,
    },
    operation::{names, Request, Response},
    table::{OperationTable, Resolution},
};

/// Entry point of the client. Every call resolves its operation from the client's
/// [`OperationTable`] at call time.
#[derive(Clone, Debug)]
pub struct Client {
    connection: Connection,
    operations: Arc<OperationTable>,
}

impl Client {
    /// Connects through the process-wide [`OperationTable::global`].
    pub fn connect(url: &str, transport: Arc<dyn Transport>) -> Result<Self, ClientError> {
        Self::with_operations(url, transport, OperationTable::global())
    }

    pub fn with_operations(
        url: &str,
        transport: Arc<dyn Transport>,
        operations: Arc<OperationTable>,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            connection: Connection::new(url, transport)?,
            operations,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn operations(&self) -> &Arc<OperationTable> {
        &self.operations
    }

    /// Runs the operation stored in slot `name`.
    pub async fn execute(
        &self,
        name: &'static str,
        request: Request,
    ) -> Result<Response, ClientError> {
        match self.operations.resolve(name) {
            Resolution::Found(operation) => operation.invoke(&self.connection, request).await,
            Resolution::NotFound => Err(ClientError::UnsupportedOperation(name)),
        }
    }

    pub fn collections(&self) -> Collections<'_> {
        Collections { client: self }
    }

    /// A handle on a collection. No request is made until an operation runs.
    pub fn collection(&self, name: impl Into<String>) -> Collection<'_> {
        Collection {
            client: self,
            name: name.into(),
        }
    }
}

pub struct Collections<'a> {
    client: &'a Client,
}

impl<'a> Collections<'a> {
    pub async fn create(&self, config: CollectionConfig) -> Result<Collection<'a>, ClientError> {
        match self
            .client
            .execute(names::COLLECTIONS_CREATE, Request::CreateCollection { config })
            .await?
        {
            Response::Collection(created) => Ok(self.client.collection(created.name)),
            _ => Err(ClientError::UnexpectedResponse(names::COLLECTIONS_CREATE)),
        }
    }

    pub async fn get(&self, name: &str) -> Result<CollectionConfig, ClientError> {
        let request = Request::GetCollection {
            name: name.to_string(),
        };
        match self.client.execute(names::COLLECTIONS_GET, request).await? {
            Response::Collection(config) => Ok(config),
            _ => Err(ClientError::UnexpectedResponse(names::COLLECTIONS_GET)),
        }
    }

    pub async fn list_all(&self) -> Result<Vec<CollectionConfig>, ClientError> {
        match self
            .client
            .execute(names::COLLECTIONS_LIST_ALL, Request::ListCollections)
            .await?
        {
            Response::Collections(configs) => Ok(configs),
            _ => Err(ClientError::UnexpectedResponse(names::COLLECTIONS_LIST_ALL)),
        }
    }

    pub async fn delete(&self, name: &str) -> Result<(), ClientError> {
        let request = Request::DeleteCollection {
            name: name.to_string(),
        };
        match self.client.execute(names::COLLECTIONS_DELETE, request).await? {
            Response::Unit => Ok(()),
            _ => Err(ClientError::UnexpectedResponse(names::COLLECTIONS_DELETE)),
        }
    }

    pub async fn delete_all(&self) -> Result<(), ClientError> {
        match self
            .client
            .execute(names::COLLECTIONS_DELETE_ALL, Request::DeleteAllCollections)
            .await?
        {
            Response::Unit => Ok(()),
            _ => Err(ClientError::UnexpectedResponse(names::COLLECTIONS_DELETE_ALL)),
        }
    }
}

pub struct Collection<'a> {
    client: &'a Client,
    name: String,
}

impl<'a> Collection<'a> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> Data<'_> {
        Data { collection: self }
    }

    pub fn query(&self) -> Query<'_> {
        Query { collection: self }
    }

    pub fn aggregate(&self) -> Aggregate<'_> {
        Aggregate { collection: self }
    }

    pub fn batch(&self) -> Batch<'_> {
        Batch { collection: self }
    }

    async fn execute(&self, name: &'static str, request: Request) -> Result<Response, ClientError> {
        self.client.execute(name, request).await
    }
}

pub struct Data<'a> {
    collection: &'a Collection<'a>,
}

impl Data<'_> {
    pub async fn insert(&self, object: DataObject) -> Result<Uuid, ClientError> {
        let request = Request::Insert {
            collection: self.collection.name.clone(),
            object,
        };
        match self.collection.execute(names::DATA_INSERT, request).await? {
            Response::Uuid(uuid) => Ok(uuid),
            _ => Err(ClientError::UnexpectedResponse(names::DATA_INSERT)),
        }
    }

    pub async fn insert_many(&self, objects: Vec<DataObject>) -> Result<BatchReturn, ClientError> {
        let request = Request::InsertMany {
            collection: self.collection.name.clone(),
            objects,
        };
        match self
            .collection
            .execute(names::DATA_INSERT_MANY, request)
            .await?
        {
            Response::Batch(result) => Ok(result),
            _ => Err(ClientError::UnexpectedResponse(names::DATA_INSERT_MANY)),
        }
    }

    /// Overwrites every property of the object.
    pub async fn replace(&self, uuid: Uuid, properties: Properties) -> Result<(), ClientError> {
        let request = Request::Replace {
            collection: self.collection.name.clone(),
            uuid,
            properties,
        };
        match self.collection.execute(names::DATA_REPLACE, request).await? {
            Response::Unit => Ok(()),
            _ => Err(ClientError::UnexpectedResponse(names::DATA_REPLACE)),
        }
    }

    /// Merges `properties` into the object.
    pub async fn update(&self, uuid: Uuid, properties: Properties) -> Result<(), ClientError> {
        let request = Request::Update {
            collection: self.collection.name.clone(),
            uuid,
            properties,
        };
        match self.collection.execute(names::DATA_UPDATE, request).await? {
            Response::Unit => Ok(()),
            _ => Err(ClientError::UnexpectedResponse(names::DATA_UPDATE)),
        }
    }

    pub async fn exists(&self, uuid: Uuid) -> Result<bool, ClientError> {
        let request = Request::Exists {
            collection: self.collection.name.clone(),
            uuid,
        };
        match self.collection.execute(names::DATA_EXISTS, request).await? {
            Response::Bool(exists) => Ok(exists),
            _ => Err(ClientError::UnexpectedResponse(names::DATA_EXISTS)),
        }
    }

    /// Returns `false` when no object had that id.
    pub async fn delete_by_id(&self, uuid: Uuid) -> Result<bool, ClientError> {
        let request = Request::DeleteById {
            collection: self.collection.name.clone(),
            uuid,
        };
        match self
            .collection
            .execute(names::DATA_DELETE_BY_ID, request)
            .await?
        {
            Response::Bool(deleted) => Ok(deleted),
            _ => Err(ClientError::UnexpectedResponse(names::DATA_DELETE_BY_ID)),
        }
    }

    pub async fn delete_many(&self, filter: Filter) -> Result<DeleteManyReturn, ClientError> {
        let request = Request::DeleteMany {
            collection: self.collection.name.clone(),
            filter,
        };
        match self
            .collection
            .execute(names::DATA_DELETE_MANY, request)
            .await?
        {
            Response::Deleted(result) => Ok(result),
            _ => Err(ClientError::UnexpectedResponse(names::DATA_DELETE_MANY)),
        }
    }
}

pub struct Query<'a> {
    collection: &'a Collection<'a>,
}

impl Query<'_> {
    pub async fn fetch_object_by_id(&self, uuid: Uuid) -> Result<Option<QueryObject>, ClientError> {
        let request = Request::FetchObjectById {
            collection: self.collection.name.clone(),
            uuid,
        };
        match self
            .collection
            .execute(names::QUERY_FETCH_OBJECT_BY_ID, request)
            .await?
        {
            Response::Object(object) => Ok(object),
            _ => Err(ClientError::UnexpectedResponse(
                names::QUERY_FETCH_OBJECT_BY_ID,
            )),
        }
    }

    pub async fn fetch_objects(&self, limit: Option<usize>) -> Result<QueryReturn, ClientError> {
        let request = Request::FetchObjects {
            collection: self.collection.name.clone(),
            limit,
        };
        self.objects(names::QUERY_FETCH_OBJECTS, request).await
    }

    pub async fn near_text(
        &self,
        query: impl Into<String>,
        limit: Option<usize>,
    ) -> Result<QueryReturn, ClientError> {
        let request = Request::NearText {
            collection: self.collection.name.clone(),
            query: query.into(),
            limit,
        };
        self.objects(names::QUERY_NEAR_TEXT, request).await
    }

    pub async fn near_vector(
        &self,
        vector: Vec<f32>,
        limit: Option<usize>,
    ) -> Result<QueryReturn, ClientError> {
        let request = Request::NearVector {
            collection: self.collection.name.clone(),
            vector,
            limit,
        };
        self.objects(names::QUERY_NEAR_VECTOR, request).await
    }

    pub async fn bm25(
        &self,
        query: impl Into<String>,
        limit: Option<usize>,
    ) -> Result<QueryReturn, ClientError> {
        let request = Request::Bm25 {
            collection: self.collection.name.clone(),
            query: query.into(),
            limit,
        };
        self.objects(names::QUERY_BM25, request).await
    }

    async fn objects(
        &self,
        name: &'static str,
        request: Request,
    ) -> Result<QueryReturn, ClientError> {
        match self.collection.execute(name, request).await? {
            Response::Objects(result) => Ok(result),
            _ => Err(ClientError::UnexpectedResponse(name)),
        }
    }
}

pub struct Aggregate<'a> {
    collection: &'a Collection<'a>,
}

impl Aggregate<'_> {
    pub async fn over_all(&self) -> Result<AggregateReturn, ClientError> {
        let request = Request::Aggregate {
            collection: self.collection.name.clone(),
        };
        match self
            .collection
            .execute(names::AGGREGATE_OVER_ALL, request)
            .await?
        {
            Response::Aggregate(result) => Ok(result),
            _ => Err(ClientError::UnexpectedResponse(names::AGGREGATE_OVER_ALL)),
        }
    }
}

pub struct Batch<'a> {
    collection: &'a Collection<'a>,
}

impl Batch<'_> {
    pub async fn add_objects(&self, objects: Vec<DataObject>) -> Result<BatchReturn, ClientError> {
        let request = Request::BatchObjects {
            collection: self.collection.name.clone(),
            objects,
        };
        match self
            .collection
            .execute(names::BATCH_ADD_OBJECTS, request)
            .await?
        {
            Response::Batch(result) => Ok(result),
            _ => Err(ClientError::UnexpectedResponse(names::BATCH_ADD_OBJECTS)),
        }
    }
}
