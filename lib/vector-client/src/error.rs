use std::time::Duration;

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, thiserror::Error, strum::IntoStaticStr)]
pub enum ClientError {
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("connection timed out after {0:?}")]
    ConnectionTimeout(Duration),
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("collection '{0}' not found")]
    CollectionNotFound(String),
    #[error("collection '{0}' already exists")]
    CollectionAlreadyExists(String),
    #[error("object '{uuid}' not found in collection '{collection}'")]
    ObjectNotFound { collection: String, uuid: Uuid },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("operation '{0}' is not supported by this client")]
    UnsupportedOperation(&'static str),
    #[error("unexpected response for operation '{0}'")]
    UnexpectedResponse(&'static str),
}

impl ClientError {
    /// Stable name of the error variant, suitable for `error.type`.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}
