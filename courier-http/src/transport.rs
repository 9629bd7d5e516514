//! The network boundary.
//!
//! Encoding produces an `http::Request<RequestBody>`; a [`Transport`] sends
//! it and hands back status, headers and the whole body. Swapping the transport is
//! how tests observe requests without a network.

use async_trait::async_trait;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::warn;

use crate::{RawResponse, RequestBody, RequestError, Result, TransportConfig};

/// Executes encoded requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and read the full response, giving up after `timeout`.
    async fn execute(
        &self,
        request: http::Request<RequestBody>,
        timeout: Duration,
    ) -> Result<RawResponse>;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport from `config`.
    pub fn new(config: &TransportConfig) -> Result<Self> {
        let redirect = if config.follow_redirects {
            reqwest::redirect::Policy::limited(config.max_redirects)
        } else {
            reqwest::redirect::Policy::none()
        };

        let inner = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .redirect(redirect)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()?;

        Ok(Self { inner })
    }

    /// Wrap an existing client.
    pub fn from_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Get the underlying reqwest client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(
        &self,
        request: http::Request<RequestBody>,
        timeout: Duration,
    ) -> Result<RawResponse> {
        let (parts, body) = request.into_parts();
        let builder = self.inner.request(parts.method, parts.uri.to_string());
        let builder = match body {
            RequestBody::Bytes(bytes) => builder.body(bytes),
            RequestBody::Multipart(form) => builder.multipart(form),
        };

        // Encoded headers replace the ones `multipart` adds, so a caller's
        // Content-Type still wins.
        let request = builder
            .headers(parts.headers)
            .timeout(timeout)
            .build()
            .map_err(|e| RequestError::RequestBuild(e.to_string()))?;

        let response = self
            .inner
            .execute(request)
            .await
            .map_err(|e| classify(e, timeout))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| classify(e, timeout))?;

        Ok(RawResponse::new(status, headers, body))
    }
}

fn classify(error: reqwest::Error, timeout: Duration) -> RequestError {
    if error.is_timeout() {
        RequestError::Timeout(timeout)
    } else if error.is_connect() {
        RequestError::Connection(error.to_string())
    } else {
        RequestError::Http(error)
    }
}

static DEFAULT_TRANSPORT: LazyLock<Arc<dyn Transport>> = LazyLock::new(|| {
    match ReqwestTransport::new(&TransportConfig::default()) {
        Ok(transport) => Arc::new(transport),
        Err(e) => {
            warn!(error = %e, "Failed to build configured transport, using reqwest defaults");
            Arc::new(ReqwestTransport::from_client(reqwest::Client::new()))
        }
    }
});

/// The process-wide transport used by [`HttpClient::default`](crate::HttpClient).
pub fn default_transport() -> Arc<dyn Transport> {
    Arc::clone(&DEFAULT_TRANSPORT)
}
