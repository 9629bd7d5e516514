// Courier - outbound HTTP requests for Rust
//
// This library configures a request in one place, encodes it as a form,
// query string, raw body or multipart upload, and sends it either directly
// or through a bounded fire-and-forget queue.

// Re-export core functionality
pub use courier_http::*;

// Re-export the runtime the async API is built on
pub use async_trait::async_trait;
pub use tokio;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        FileSource,
        HttpClient,
        HttpRequest,
        ParamValue,
        PoolConfig,
        RequestError,
        ResponseEnvelope,
        ResponseError,
        Result,
        Transport,
        TransportConfig,
        // Async queue
        init_async_pool,
        init_async_pool_with,
    };
}
