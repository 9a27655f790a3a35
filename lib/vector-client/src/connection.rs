use std::{fmt, sync::Arc};

use async_trait::async_trait;
use url::Url;

use crate::{
    error::ClientError,
    operation::{Request, Response},
};

/// The wire seam of the client. Implementations own serialization and I/O.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn execute(&self, request: Request) -> Result<Response, ClientError>;
}

#[derive(Clone)]
pub struct Connection {
    url: Url,
    transport: Arc<dyn Transport>,
}

impl Connection {
    pub fn new(url: &str, transport: Arc<dyn Transport>) -> Result<Self, ClientError> {
        let parsed = Url::parse(url).map_err(|e| ClientError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            url: parsed,
            transport,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    pub fn port(&self) -> Option<u16> {
        self.url.port_or_known_default()
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}
