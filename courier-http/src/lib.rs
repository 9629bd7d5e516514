//! # Courier HTTP
//!
//! Outbound HTTP requests configured in one place and encoded one of four
//! ways, sent either directly or through a bounded fire-and-forget queue.
//!
//! ## Features
//!
//! - **Form POST**: parameters as an `application/x-www-form-urlencoded` body
//! - **Query GET**: scalar parameters appended to the URL
//! - **Raw body**: caller bytes sent verbatim
//! - **Multipart upload**: parameters plus files from disk or memory
//! - **Async pool**: bounded queue with one background worker
//! - **Envelope decoding**: `{success, data, error}` responses
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use courier_http::{HttpRequest, ParamValue};
//! use serde::Deserialize;
//! use std::collections::BTreeMap;
//!
//! #[derive(Debug, Default, Deserialize)]
//! struct User {
//!     first: String,
//!     second: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut params = BTreeMap::new();
//!     params.insert("id".to_string(), ParamValue::from(2341));
//!
//!     let mut user = User::default();
//!     let failure = HttpRequest::new("http://127.0.0.1/get.test")
//!         .method("get")
//!         .params(params)
//!         .unmarshal(&mut user)
//!         .await?;
//!
//!     match failure {
//!         Some(error) => println!("failed: {} {}", error.code, error.message),
//!         None => println!("user: {:?}", user),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Fire-and-Forget
//!
//! ```rust,no_run
//! use courier_http::{init_async_pool, HttpRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_async_pool(10);
//!
//!     // `true` means the request was queued, not that it succeeded.
//!     let queued = HttpRequest::new("http://127.0.0.1/post.test")
//!         .set_async(true)
//!         .success()
//!         .await?;
//!
//!     assert!(queued);
//!     Ok(())
//! }
//! ```

mod body;
mod client;
mod config;
mod encode;
mod envelope;
mod error;
mod pool;
mod request;
mod response;
mod transport;
mod value;

pub use body::RequestBody;
pub use client::HttpClient;
pub use config::{
    CompletionHook, DEFAULT_POOL_CAPACITY, POOL_SIZE_ENV, PoolConfig, TransportConfig,
    TransportConfigBuilder,
};
pub use encode::{DEFAULT_USER_AGENT, Encoding, encode};
pub use envelope::{ResponseEnvelope, ResponseError, decode_into, decode_success};
pub use error::{RequestError, Result};
pub use pool::{AsyncPool, global_pool, init_async_pool, init_async_pool_with};
pub use request::{DEFAULT_TIMEOUT, HttpRequest};
pub use response::RawResponse;
pub use transport::{ReqwestTransport, Transport, default_transport};
pub use value::{FileSource, ParamValue, format_float};

// Re-export common types
pub use bytes::Bytes;
pub use http::{HeaderMap, Method, StatusCode};

/// Prelude for common imports.
///
/// ```
/// use courier_http::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::HttpClient;
    pub use crate::config::{PoolConfig, TransportConfig};
    pub use crate::envelope::{ResponseEnvelope, ResponseError};
    pub use crate::error::{RequestError, Result};
    pub use crate::pool::{AsyncPool, init_async_pool};
    pub use crate::request::HttpRequest;
    pub use crate::transport::Transport;
    pub use crate::value::{FileSource, ParamValue};
}
