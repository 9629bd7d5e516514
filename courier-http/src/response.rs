//! Raw transport response.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};

use crate::{RequestError, Result};

/// Status, headers and fully-read body returned by a transport.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl RawResponse {
    /// Create a response.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Whether the status is exactly 200 OK.
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Get the response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the response body.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Consume the response and return the body if the status is 200,
    /// otherwise a [`RequestError::Status`].
    pub fn into_ok_body(self) -> Result<Bytes> {
        if self.is_ok() {
            Ok(self.body)
        } else {
            Err(RequestError::Status {
                status: self.status.as_u16(),
            })
        }
    }
}
