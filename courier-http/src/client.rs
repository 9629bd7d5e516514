//! HTTP client implementation.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::encode::encode;
use crate::envelope::{decode_into, decode_success};
use crate::pool::global_pool;
use crate::transport::default_transport;
use crate::{
    AsyncPool, HttpRequest, ReqwestTransport, RequestError, ResponseError, Result, Transport,
    TransportConfig,
};

/// Runs [`HttpRequest`]s, directly or through an async pool.
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    pool: Option<AsyncPool>,
}

impl HttpClient {
    /// Create a client over `transport`.
    ///
    /// Async requests go to the process-wide pool unless
    /// [`with_pool`](Self::with_pool) is used.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            pool: None,
        }
    }

    /// Create a client with a reqwest transport built from `config`.
    pub fn with_config(config: &TransportConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(ReqwestTransport::new(config)?)))
    }

    /// Send async requests to `pool` instead of the process-wide one.
    pub fn with_pool(mut self, pool: AsyncPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Get the transport.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// The pool async requests are queued on, if any.
    pub fn pool(&self) -> Option<&AsyncPool> {
        match &self.pool {
            Some(pool) => Some(pool),
            None => global_pool(),
        }
    }

    /// Send `request` and return the raw response body.
    ///
    /// Async requests are queued and answered with the accepted envelope
    /// right away; their real outcome never comes back here.
    pub async fn response(&self, request: HttpRequest) -> Result<Bytes> {
        if request.is_async() {
            let pool = self.pool().ok_or(RequestError::PoolNotInitialized)?;
            return pool.dispatch(request).await;
        }
        self.execute(&request).await
    }

    /// Send `request` and report the envelope's `success` flag.
    pub async fn success(&self, request: HttpRequest) -> Result<bool> {
        let body = self.response(request).await?;
        decode_success(&body)
    }

    /// Send `request` and decode the envelope's `data` into `target`.
    ///
    /// On an application-level failure the envelope's `error` is returned
    /// and `target` is left untouched.
    pub async fn unmarshal<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
        target: &mut T,
    ) -> Result<Option<ResponseError>> {
        let body = self.response(request).await?;
        decode_into(&body, target)
    }

    /// Encode and send `request` right now, ignoring its async flag.
    pub async fn execute(&self, request: &HttpRequest) -> Result<Bytes> {
        execute(self.transport.as_ref(), request).await
    }
}

/// Encode, send, and accept only a 200 response.
pub(crate) async fn execute(transport: &dyn Transport, request: &HttpRequest) -> Result<Bytes> {
    let encoded = encode(request)?;

    debug!(
        method = %encoded.method(),
        url = %encoded.uri(),
        "Sending HTTP request"
    );

    let response = transport.execute(encoded, request.get_timeout()).await?;

    debug!(
        status = %response.status(),
        bytes = response.bytes().len(),
        "Received HTTP response"
    );

    response.into_ok_body()
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(default_transport())
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}
