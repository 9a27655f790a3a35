//! An in-process [`Transport`] keeping collections in memory.
//!
//! Text search is lexical: an object matches a `near_text` or `bm25` query when its string
//! properties contain query terms. Vector search uses cosine distance over the vectors
//! supplied at insert time.

use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use serde_json::Value;
use tracing::trace;
use uuid::Uuid;

use crate::{
    connection::Transport,
    error::ClientError,
    model::{
        AggregateReturn, BatchError, BatchReturn, CollectionConfig, DataObject, DeleteManyReturn,
        Filter, ObjectMetadata, Properties, QueryObject, QueryReturn,
    },
    operation::{Request, Response},
};

#[derive(Clone)]
struct StoredObject {
    uuid: Uuid,
    properties: Properties,
    vector: Option<Vec<f32>>,
}

impl StoredObject {
    fn to_query_object(&self, metadata: ObjectMetadata) -> QueryObject {
        QueryObject {
            uuid: self.uuid,
            properties: self.properties.clone(),
            metadata,
        }
    }

    fn terms(&self) -> Vec<String> {
        self.properties
            .values()
            .filter_map(Value::as_str)
            .flat_map(tokenize)
            .collect()
    }
}

struct StoredCollection {
    config: CollectionConfig,
    objects: Vec<StoredObject>,
}

#[derive(Default)]
pub struct InMemoryTransport {
    collections: DashMap<String, StoredCollection>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_collection<T>(
        &self,
        name: &str,
        f: impl FnOnce(&StoredCollection) -> T,
    ) -> Result<T, ClientError> {
        self.collections
            .get(name)
            .map(|collection| f(&collection))
            .ok_or_else(|| ClientError::CollectionNotFound(name.to_string()))
    }

    fn with_collection_mut<T>(
        &self,
        name: &str,
        f: impl FnOnce(&mut StoredCollection) -> T,
    ) -> Result<T, ClientError> {
        self.collections
            .get_mut(name)
            .map(|mut collection| f(&mut collection))
            .ok_or_else(|| ClientError::CollectionNotFound(name.to_string()))
    }

    fn create_collection(&self, config: CollectionConfig) -> Result<Response, ClientError> {
        match self.collections.entry(config.name.clone()) {
            Entry::Occupied(_) => Err(ClientError::CollectionAlreadyExists(config.name)),
            Entry::Vacant(slot) => {
                slot.insert(StoredCollection {
                    config: config.clone(),
                    objects: Vec::new(),
                });
                Ok(Response::Collection(config))
            }
        }
    }

    fn list_collections(&self) -> Response {
        let mut configs: Vec<CollectionConfig> = self
            .collections
            .iter()
            .map(|entry| entry.config.clone())
            .collect();
        configs.sort_by(|a, b| a.name.cmp(&b.name));
        Response::Collections(configs)
    }

    fn insert_many(
        &self,
        collection: &str,
        objects: Vec<DataObject>,
    ) -> Result<Response, ClientError> {
        self.with_collection_mut(collection, |stored| {
            let mut result = BatchReturn::default();
            for (index, object) in objects.into_iter().enumerate() {
                match insert_object(stored, object) {
                    Ok(uuid) => result.uuids.push(uuid),
                    Err(err) => result.errors.push(BatchError {
                        index,
                        message: err.to_string(),
                    }),
                }
            }
            Response::Batch(result)
        })
    }

    fn write_properties(
        &self,
        collection: &str,
        uuid: Uuid,
        properties: Properties,
        merge: bool,
    ) -> Result<Response, ClientError> {
        self.with_collection_mut(collection, |stored| {
            let object = stored
                .objects
                .iter_mut()
                .find(|object| object.uuid == uuid)
                .ok_or_else(|| ClientError::ObjectNotFound {
                    collection: collection.to_string(),
                    uuid,
                })?;

            if merge {
                object.properties.extend(properties);
            } else {
                object.properties = properties;
            }

            Ok(Response::Unit)
        })?
    }

    fn delete_many(&self, collection: &str, filter: &Filter) -> Result<Response, ClientError> {
        self.with_collection_mut(collection, |stored| {
            let before = stored.objects.len();
            stored
                .objects
                .retain(|object| !filter.matches(&object.properties));
            let removed = before - stored.objects.len();

            Response::Deleted(DeleteManyReturn {
                matches: removed,
                successful: removed,
                failed: 0,
            })
        })
    }

    fn fetch_objects(&self, collection: &str, limit: Option<usize>) -> Result<Response, ClientError> {
        self.with_collection(collection, |stored| {
            let objects = stored
                .objects
                .iter()
                .take(limit.unwrap_or(usize::MAX))
                .map(|object| object.to_query_object(ObjectMetadata::default()))
                .collect();
            Response::Objects(QueryReturn { objects })
        })
    }

    fn near_text(
        &self,
        collection: &str,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Response, ClientError> {
        let query_terms = tokenize(query);
        if query_terms.is_empty() {
            return Err(ClientError::InvalidRequest(
                "near_text query must contain at least one term".to_string(),
            ));
        }

        self.with_collection(collection, |stored| {
            let mut scored: Vec<(f32, &StoredObject)> = stored
                .objects
                .iter()
                .filter_map(|object| {
                    let terms = object.terms();
                    let matched = query_terms
                        .iter()
                        .filter(|term| terms.contains(*term))
                        .count();
                    (matched > 0)
                        .then(|| (1.0 - matched as f32 / query_terms.len() as f32, object))
                })
                .collect();
            scored.sort_by(|a, b| a.0.total_cmp(&b.0));

            let objects = scored
                .into_iter()
                .take(limit.unwrap_or(usize::MAX))
                .map(|(distance, object)| {
                    object.to_query_object(ObjectMetadata {
                        distance: Some(distance),
                        certainty: Some(1.0 - distance / 2.0),
                        score: None,
                    })
                })
                .collect();
            Response::Objects(QueryReturn { objects })
        })
    }

    fn near_vector(
        &self,
        collection: &str,
        vector: &[f32],
        limit: Option<usize>,
    ) -> Result<Response, ClientError> {
        if vector.is_empty() {
            return Err(ClientError::InvalidRequest(
                "near_vector requires a non-empty vector".to_string(),
            ));
        }

        self.with_collection(collection, |stored| {
            let mut scored: Vec<(f32, &StoredObject)> = stored
                .objects
                .iter()
                .filter_map(|object| {
                    let candidate = object.vector.as_deref()?;
                    cosine_distance(vector, candidate).map(|distance| (distance, object))
                })
                .collect();
            scored.sort_by(|a, b| a.0.total_cmp(&b.0));

            let objects = scored
                .into_iter()
                .take(limit.unwrap_or(usize::MAX))
                .map(|(distance, object)| {
                    object.to_query_object(ObjectMetadata {
                        distance: Some(distance),
                        certainty: Some(1.0 - distance / 2.0),
                        score: None,
                    })
                })
                .collect();
            Response::Objects(QueryReturn { objects })
        })
    }

    fn bm25(&self, collection: &str, query: &str, limit: Option<usize>) -> Result<Response, ClientError> {
        let query_terms = tokenize(query);

        self.with_collection(collection, |stored| {
            let mut scored: Vec<(f32, &StoredObject)> = stored
                .objects
                .iter()
                .filter_map(|object| {
                    let terms = object.terms();
                    let hits = terms
                        .iter()
                        .filter(|term| query_terms.contains(*term))
                        .count();
                    (hits > 0).then_some((hits as f32, object))
                })
                .collect();
            scored.sort_by(|a, b| b.0.total_cmp(&a.0));

            let objects = scored
                .into_iter()
                .take(limit.unwrap_or(usize::MAX))
                .map(|(score, object)| {
                    object.to_query_object(ObjectMetadata {
                        score: Some(score),
                        ..Default::default()
                    })
                })
                .collect();
            Response::Objects(QueryReturn { objects })
        })
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn execute(&self, request: Request) -> Result<Response, ClientError> {
        trace!(?request, "in-memory transport request");

        match request {
            Request::CreateCollection { config } => self.create_collection(config),
            Request::GetCollection { name } => self
                .with_collection(&name, |stored| Response::Collection(stored.config.clone())),
            Request::ListCollections => Ok(self.list_collections()),
            Request::DeleteCollection { name } => {
                self.collections.remove(&name);
                Ok(Response::Unit)
            }
            Request::DeleteAllCollections => {
                self.collections.clear();
                Ok(Response::Unit)
            }
            Request::Insert { collection, object } => self
                .with_collection_mut(&collection, |stored| insert_object(stored, object))?
                .map(Response::Uuid),
            Request::InsertMany {
                collection,
                objects,
            }
            | Request::BatchObjects {
                collection,
                objects,
            } => self.insert_many(&collection, objects),
            Request::Replace {
                collection,
                uuid,
                properties,
            } => self.write_properties(&collection, uuid, properties, false),
            Request::Update {
                collection,
                uuid,
                properties,
            } => self.write_properties(&collection, uuid, properties, true),
            Request::Exists { collection, uuid } => self.with_collection(&collection, |stored| {
                Response::Bool(stored.objects.iter().any(|object| object.uuid == uuid))
            }),
            Request::DeleteById { collection, uuid } => {
                self.with_collection_mut(&collection, |stored| {
                    let before = stored.objects.len();
                    stored.objects.retain(|object| object.uuid != uuid);
                    Response::Bool(stored.objects.len() != before)
                })
            }
            Request::DeleteMany { collection, filter } => self.delete_many(&collection, &filter),
            Request::FetchObjectById { collection, uuid } => {
                self.with_collection(&collection, |stored| {
                    Response::Object(
                        stored
                            .objects
                            .iter()
                            .find(|object| object.uuid == uuid)
                            .map(|object| object.to_query_object(ObjectMetadata::default())),
                    )
                })
            }
            Request::FetchObjects { collection, limit } => self.fetch_objects(&collection, limit),
            Request::NearText {
                collection,
                query,
                limit,
            } => self.near_text(&collection, &query, limit),
            Request::NearVector {
                collection,
                vector,
                limit,
            } => self.near_vector(&collection, &vector, limit),
            Request::Bm25 {
                collection,
                query,
                limit,
            } => self.bm25(&collection, &query, limit),
            Request::Aggregate { collection } => self.with_collection(&collection, |stored| {
                Response::Aggregate(AggregateReturn {
                    total_count: stored.objects.len(),
                })
            }),
        }
    }
}

fn insert_object(stored: &mut StoredCollection, object: DataObject) -> Result<Uuid, ClientError> {
    let uuid = object.uuid.unwrap_or_else(Uuid::new_v4);
    if stored.objects.iter().any(|existing| existing.uuid == uuid) {
        return Err(ClientError::InvalidRequest(format!(
            "object '{uuid}' already exists in collection '{}'",
            stored.config.name
        )));
    }

    stored.objects.push(StoredObject {
        uuid,
        properties: object.properties,
        vector: object.vector,
    });

    Ok(uuid)
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn cosine_distance(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() {
        return None;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }

    Some(1.0 - dot / (norm_a * norm_b))
}
