//! Request error types.

use std::time::Duration;
use thiserror::Error;

/// Result type for request operations.
pub type Result<T> = std::result::Result<T, RequestError>;

/// Errors produced while encoding, sending or decoding a request.
#[derive(Debug, Error)]
pub enum RequestError {
    /// A parameter value has a shape no encoding supports.
    #[error("bad params struct")]
    BadParams,

    /// A file entry has a shape the multipart encoder does not support.
    #[error("bad file params")]
    BadFiles,

    /// The method has no body-less encoding (only GET and POST do).
    #[error("bad request method: {0}")]
    BadMethod(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request building error.
    #[error("Failed to build request: {0}")]
    RequestBuild(String),

    /// Reading an upload source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Request timed out.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Underlying HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with anything but 200.
    #[error("status code:{status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// An async request was issued before the pool was started.
    #[error("async request pool not init")]
    PoolNotInitialized,

    /// The async queue stayed full for the whole request timeout.
    #[error("async request timeout after {0:?}")]
    EnqueueTimeout(Duration),

    /// The async worker could not be started.
    #[error("failed to start async request worker: {0}")]
    PoolStart(String),

    /// The async worker is gone and nothing drains the queue.
    #[error("async request pool closed")]
    PoolClosed,

    /// The response body is not a valid envelope.
    #[error("Envelope decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RequestError {
    /// Check if this is a timeout error, either while sending or while
    /// waiting for queue space.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::EnqueueTimeout(_))
            || matches!(self, Self::Http(e) if e.is_timeout())
    }

    /// Check if this is a connection error.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_)) || matches!(self, Self::Http(e) if e.is_connect())
    }

    /// Check if the request was rejected before anything was sent because
    /// its configuration could not be encoded.
    pub fn is_encoding(&self) -> bool {
        matches!(
            self,
            Self::BadParams | Self::BadFiles | Self::BadMethod(_) | Self::Io(_)
        )
    }

    /// Get the HTTP status code if this is a status error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
