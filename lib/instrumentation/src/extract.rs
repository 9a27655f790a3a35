//! Attribute extraction for traced operations.
//!
//! Extractors are pure: they read a request or response and describe what should be
//! recorded. Content (query text, returned documents) is only described when the session's
//! [`CaptureConfig`] enables it. Extractors run behind [`request_fields`] and
//! [`response_fields`], which contain panics so a faulty extractor costs its attributes and
//! never the call.

use std::panic::{catch_unwind, AssertUnwindSafe};

use opentelemetry::KeyValue;
use tracing::debug;
use vector_client::{QueryObject, Request, Response};

use crate::{capture::CaptureConfig, registry::OperationDescriptor, spans::attributes};

/// What the request phase found.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RequestFields {
    pub attributes: Vec<KeyValue>,
    /// Query text, kept only when content capture is on.
    pub query_text: Option<String>,
}

/// What the response phase found.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResponseFields {
    pub attributes: Vec<KeyValue>,
    /// Attributes of each `weaviate.document` event, at most `max_documents`.
    pub documents: Vec<Vec<KeyValue>>,
    /// Number of objects the operation returned or affected.
    pub object_count: Option<u64>,
}

pub trait AttributeExtractor: Send + Sync {
    fn request(&self, _request: &Request, _capture: &CaptureConfig) -> RequestFields {
        RequestFields::default()
    }

    fn response(
        &self,
        _response: &Response,
        _request: &RequestFields,
        _capture: &CaptureConfig,
    ) -> ResponseFields {
        ResponseFields::default()
    }
}

pub fn request_fields(
    descriptor: &OperationDescriptor,
    request: &Request,
    capture: &CaptureConfig,
) -> RequestFields {
    guarded(descriptor, "request", || {
        descriptor.extractor.request(request, capture)
    })
}

pub fn response_fields(
    descriptor: &OperationDescriptor,
    response: &Response,
    request: &RequestFields,
    capture: &CaptureConfig,
) -> ResponseFields {
    guarded(descriptor, "response", || {
        descriptor.extractor.response(response, request, capture)
    })
}

fn guarded<T: Default>(
    descriptor: &OperationDescriptor,
    phase: &'static str,
    extract: impl FnOnce() -> T,
) -> T {
    match catch_unwind(AssertUnwindSafe(extract)) {
        Ok(fields) => fields,
        Err(_) => {
            debug!(
                operation = descriptor.qualified_name,
                phase, "attribute extractor panicked, attributes dropped"
            );
            T::default()
        }
    }
}

fn count(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn with_object_count(mut fields: ResponseFields, object_count: usize) -> ResponseFields {
    fields.attributes.push(KeyValue::new(
        attributes::WEAVIATE_OBJECT_COUNT,
        count(object_count),
    ));
    fields.object_count = Some(object_count as u64);
    fields
}

fn document_event(
    object: &QueryObject,
    request: &RequestFields,
    capture: &CaptureConfig,
) -> Vec<KeyValue> {
    let content = serde_json::to_string(&object.properties).unwrap_or_default();
    let mut event = vec![
        KeyValue::new(attributes::WEAVIATE_DOCUMENT_ID, object.uuid.to_string()),
        KeyValue::new(
            attributes::WEAVIATE_DOCUMENT_CONTENT,
            capture.truncate(&content),
        ),
    ];

    if let Some(distance) = object.metadata.distance {
        event.push(KeyValue::new(
            attributes::WEAVIATE_DOCUMENT_DISTANCE,
            f64::from(distance),
        ));
    }
    if let Some(certainty) = object.metadata.certainty {
        event.push(KeyValue::new(
            attributes::WEAVIATE_DOCUMENT_CERTAINTY,
            f64::from(certainty),
        ));
    }
    if let Some(score) = object.metadata.score {
        event.push(KeyValue::new(
            attributes::WEAVIATE_DOCUMENT_SCORE,
            f64::from(score),
        ));
    }
    if let Some(query) = &request.query_text {
        event.push(KeyValue::new(
            attributes::WEAVIATE_DOCUMENT_QUERY,
            capture.truncate(query),
        ));
    }

    event
}

fn documents<'a>(
    objects: impl IntoIterator<Item = &'a QueryObject>,
    request: &RequestFields,
    capture: &CaptureConfig,
) -> Vec<Vec<KeyValue>> {
    if !capture.capture_content {
        return Vec::new();
    }

    objects
        .into_iter()
        .take(capture.max_documents)
        .map(|object| document_event(object, request, capture))
        .collect()
}

/// Collection management: create, get, list and delete collections.
pub struct CollectionsExtractor;

impl AttributeExtractor for CollectionsExtractor {
    fn response(
        &self,
        response: &Response,
        _request: &RequestFields,
        _capture: &CaptureConfig,
    ) -> ResponseFields {
        match response {
            Response::Collection(_) => with_object_count(ResponseFields::default(), 1),
            Response::Collections(collections) => {
                with_object_count(ResponseFields::default(), collections.len())
            }
            _ => ResponseFields::default(),
        }
    }
}

/// Object writes: insert, insert_many, replace, update and batch imports.
pub struct WriteExtractor;

impl AttributeExtractor for WriteExtractor {
    fn request(&self, request: &Request, _capture: &CaptureConfig) -> RequestFields {
        let mut fields = RequestFields::default();
        if let Request::InsertMany { objects, .. } | Request::BatchObjects { objects, .. } =
            request
        {
            fields.attributes.push(KeyValue::new(
                attributes::DB_OPERATION_BATCH_SIZE,
                count(objects.len()),
            ));
        }
        fields
    }

    fn response(
        &self,
        response: &Response,
        _request: &RequestFields,
        _capture: &CaptureConfig,
    ) -> ResponseFields {
        match response {
            Response::Uuid(_) | Response::Unit => with_object_count(ResponseFields::default(), 1),
            Response::Batch(result) => {
                let mut fields = ResponseFields::default();
                fields.attributes.push(KeyValue::new(
                    attributes::WEAVIATE_BATCH_ERROR_COUNT,
                    count(result.errors.len()),
                ));
                with_object_count(fields, result.uuids.len())
            }
            _ => ResponseFields::default(),
        }
    }
}

/// Single-object lookups by id: exists, delete_by_id and fetch_object_by_id.
pub struct LookupExtractor;

impl AttributeExtractor for LookupExtractor {
    fn response(
        &self,
        response: &Response,
        request: &RequestFields,
        capture: &CaptureConfig,
    ) -> ResponseFields {
        match response {
            Response::Bool(found) => {
                with_object_count(ResponseFields::default(), usize::from(*found))
            }
            Response::Object(object) => {
                let fields = ResponseFields {
                    documents: documents(object.iter(), request, capture),
                    ..Default::default()
                };
                with_object_count(fields, usize::from(object.is_some()))
            }
            _ => ResponseFields::default(),
        }
    }
}

pub struct DeleteManyExtractor;

impl AttributeExtractor for DeleteManyExtractor {
    fn response(
        &self,
        response: &Response,
        _request: &RequestFields,
        _capture: &CaptureConfig,
    ) -> ResponseFields {
        let Response::Deleted(result) = response else {
            return ResponseFields::default();
        };

        let mut fields = ResponseFields::default();
        fields.attributes.push(KeyValue::new(
            attributes::WEAVIATE_DELETE_MATCHES,
            count(result.matches),
        ));
        fields.attributes.push(KeyValue::new(
            attributes::WEAVIATE_DELETE_FAILED,
            count(result.failed),
        ));
        with_object_count(fields, result.successful)
    }
}

/// Queries returning object lists: fetch_objects, near_text, near_vector and bm25.
pub struct QueryExtractor;

impl AttributeExtractor for QueryExtractor {
    fn request(&self, request: &Request, capture: &CaptureConfig) -> RequestFields {
        let mut fields = RequestFields::default();

        let (limit, query) = match request {
            Request::FetchObjects { limit, .. } => (*limit, None),
            Request::NearText { query, limit, .. } | Request::Bm25 { query, limit, .. } => {
                (*limit, Some(query))
            }
            Request::NearVector { vector, limit, .. } => {
                fields.attributes.push(KeyValue::new(
                    attributes::WEAVIATE_QUERY_VECTOR_DIMENSIONS,
                    count(vector.len()),
                ));
                (*limit, None)
            }
            _ => (None, None),
        };

        if let Some(limit) = limit {
            fields
                .attributes
                .push(KeyValue::new(attributes::WEAVIATE_QUERY_LIMIT, count(limit)));
        }

        if capture.capture_content {
            if let Some(query) = query {
                fields.attributes.push(KeyValue::new(
                    attributes::DB_QUERY_TEXT,
                    capture.truncate(query),
                ));
                fields.query_text = Some(query.clone());
            }
        }

        fields
    }

    fn response(
        &self,
        response: &Response,
        request: &RequestFields,
        capture: &CaptureConfig,
    ) -> ResponseFields {
        let Response::Objects(result) = response else {
            return ResponseFields::default();
        };

        let fields = ResponseFields {
            documents: documents(&result.objects, request, capture),
            ..Default::default()
        };
        with_object_count(fields, result.objects.len())
    }
}

pub struct AggregateExtractor;

impl AttributeExtractor for AggregateExtractor {
    fn response(
        &self,
        response: &Response,
        _request: &RequestFields,
        _capture: &CaptureConfig,
    ) -> ResponseFields {
        let Response::Aggregate(result) = response else {
            return ResponseFields::default();
        };

        let mut fields = ResponseFields::default();
        fields.attributes.push(KeyValue::new(
            attributes::WEAVIATE_AGGREGATE_TOTAL_COUNT,
            count(result.total_count),
        ));
        fields
    }
}
