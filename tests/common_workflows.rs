//! Integration tests for common Courier workflows.
//!
//! These tests go through the facade crate with an in-process transport, so
//! nothing here touches the network.

use courier::prelude::*;
use courier::{AsyncPool, RawResponse, RequestBody, async_trait};
use http::{HeaderMap, StatusCode};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Answers every request with a fixed body and remembers what it was sent.
struct EchoTransport {
    body: &'static str,
    sent: Mutex<Vec<http::Request<RequestBody>>>,
}

impl EchoTransport {
    fn new(body: &'static str) -> Arc<Self> {
        Arc::new(Self {
            body,
            sent: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Transport for EchoTransport {
    async fn execute(
        &self,
        request: http::Request<RequestBody>,
        _timeout: Duration,
    ) -> Result<RawResponse> {
        self.sent.lock().unwrap().push(request);
        Ok(RawResponse::new(StatusCode::OK, HeaderMap::new(), self.body))
    }
}

#[derive(Debug, Default, Deserialize)]
struct Profile {
    name: String,
    age: u32,
}

// =============================================================================
// Sending requests
// =============================================================================

#[tokio::test]
async fn test_form_post_workflow() {
    let transport = EchoTransport::new(r#"{"success":true}"#);
    let client = HttpClient::new(transport.clone());

    let request = HttpRequest::new("http://service.local/users")
        .params_json(serde_json::json!({"name": "ada", "tags": ["x", "y"]}))
        .unwrap();
    assert!(client.success(request).await.unwrap());

    let sent = transport.sent.lock().unwrap();
    assert_eq!(sent[0].method(), http::Method::POST);
    assert_eq!(
        sent[0].headers()["content-type"],
        "application/x-www-form-urlencoded"
    );
    assert_eq!(
        sent[0].body().as_bytes().map(|b| b.as_ref()),
        Some(&b"name=ada&tags=x&tags=y"[..])
    );
}

#[tokio::test]
async fn test_query_get_workflow() {
    let transport = EchoTransport::new(r#"{"success":true,"data":{"name":"ada","age":36}}"#);
    let client = HttpClient::new(transport.clone());

    let mut params = BTreeMap::new();
    params.insert("id".to_string(), ParamValue::from(7));
    let mut profile = Profile::default();
    let failure = client
        .unmarshal(
            HttpRequest::new("http://service.local/users?v=2")
                .method("get")
                .params(params),
            &mut profile,
        )
        .await
        .unwrap();

    assert!(failure.is_none());
    assert_eq!(profile.name, "ada");
    assert_eq!(profile.age, 36);

    let sent = transport.sent.lock().unwrap();
    assert_eq!(sent[0].uri(), "http://service.local/users?v=2&id=7");
    assert!(sent[0].body().as_bytes().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_envelope_workflow() {
    let client = HttpClient::new(EchoTransport::new(
        r#"{"success":false,"error":{"code":404,"message":"no such user"}}"#,
    ));

    let mut profile = Profile::default();
    let failure = client
        .unmarshal(HttpRequest::new("http://service.local/users"), &mut profile)
        .await
        .unwrap();

    assert_eq!(
        failure,
        Some(ResponseError {
            code: 404,
            message: "no such user".into()
        })
    );
    assert!(profile.name.is_empty());
}

// =============================================================================
// Async queue
// =============================================================================

#[tokio::test]
async fn test_private_pool_workflow() {
    let transport = EchoTransport::new("ignored");
    let (done_tx, mut done_rx) = tokio::sync::mpsc::unbounded_channel();
    let pool = AsyncPool::start(
        PoolConfig::new(8).on_complete(move |request, result| {
            let _ = done_tx.send((request.url().to_string(), result.is_ok()));
        }),
        transport.clone(),
    )
    .unwrap();
    let client = HttpClient::new(transport.clone()).with_pool(pool);

    let queued = client
        .success(HttpRequest::new("http://service.local/events").set_async(true))
        .await
        .unwrap();
    assert!(queued);

    let (url, ok) = done_rx.recv().await.unwrap();
    assert_eq!(url, "http://service.local/events");
    assert!(ok);
    assert_eq!(transport.sent.lock().unwrap().len(), 1);
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_unsupported_method_workflow() {
    let client = HttpClient::new(EchoTransport::new("{}"));
    let err = client
        .response(HttpRequest::new("http://service.local/").method("delete"))
        .await
        .unwrap_err();

    assert!(matches!(err, RequestError::BadMethod(ref m) if m == "DELETE"));
    assert!(err.is_encoding());
}
