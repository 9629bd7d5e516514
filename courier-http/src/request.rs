//! Request configuration.

use bytes::Bytes;
use http::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::{FileSource, HttpClient, ParamValue, RequestError, ResponseError, Result};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for one outbound request.
///
/// Every setter replaces its field wholesale; nothing is merged and nothing
/// is validated until the request is encoded. The encoding is picked from
/// what is set: files win over a raw body, a raw body wins over the method.
///
/// ```
/// use courier_http::{HttpRequest, ParamValue};
/// use std::collections::BTreeMap;
/// use std::time::Duration;
///
/// let mut params = BTreeMap::new();
/// params.insert("first".to_string(), ParamValue::from("kaka"));
/// params.insert("second".to_string(), ParamValue::from(2341));
///
/// let request = HttpRequest::new("http://127.0.0.1/get.test")
///     .method("get")
///     .params(params)
///     .timeout(Duration::from_secs(3));
///
/// assert_eq!(request.get_method(), "GET");
/// assert!(!request.is_async());
/// ```
#[derive(Debug, Clone)]
pub struct HttpRequest {
    url: String,
    method: String,
    is_async: bool,
    body: Option<Bytes>,
    params: BTreeMap<String, ParamValue>,
    headers: BTreeMap<String, String>,
    files: BTreeMap<String, FileSource>,
    timeout: Duration,
}

impl HttpRequest {
    /// Create a POST request to `url` with a 10 second timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::POST.to_string(),
            is_async: false,
            body: None,
            params: BTreeMap::new(),
            headers: BTreeMap::new(),
            files: BTreeMap::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the HTTP method. The name is upper-cased, so `"get"` means GET.
    pub fn method(mut self, method: impl AsRef<str>) -> Self {
        self.method = method.as_ref().to_ascii_uppercase();
        self
    }

    /// Queue the request on the async pool instead of waiting for it.
    pub fn set_async(mut self, on: bool) -> Self {
        self.is_async = on;
        self
    }

    /// Set the request parameters.
    pub fn params(mut self, params: BTreeMap<String, ParamValue>) -> Self {
        self.params = params;
        self
    }

    /// Set the request parameters from an untyped JSON object.
    ///
    /// Fails with [`RequestError::BadParams`] if `params` is not an object
    /// or holds a value no encoding supports.
    pub fn params_json(mut self, params: Value) -> Result<Self> {
        let Value::Object(map) = params else {
            return Err(RequestError::BadParams);
        };
        self.params = map
            .into_iter()
            .map(|(key, value)| ParamValue::try_from(value).map(|value| (key, value)))
            .collect::<Result<_>>()?;
        Ok(self)
    }

    /// Set the request headers. These are applied last and win over the
    /// headers the encoder sets itself.
    pub fn headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Set the files to upload. Any file turns the request into a
    /// multipart upload.
    pub fn files(mut self, files: BTreeMap<String, FileSource>) -> Self {
        self.files = files;
        self
    }

    /// Set a raw body, sent verbatim in place of the parameters.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the timeout. It bounds the whole round trip of a direct request
    /// and the wait for queue space of an async one.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Target URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Configured method.
    pub fn get_method(&self) -> &str {
        &self.method
    }

    /// Whether the request goes through the async pool.
    pub fn is_async(&self) -> bool {
        self.is_async
    }

    /// Raw body, if set.
    pub fn get_body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Request parameters.
    pub fn get_params(&self) -> &BTreeMap<String, ParamValue> {
        &self.params
    }

    /// Caller headers.
    pub fn get_headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Upload sources.
    pub fn get_files(&self) -> &BTreeMap<String, FileSource> {
        &self.files
    }

    /// Configured timeout.
    pub fn get_timeout(&self) -> Duration {
        self.timeout
    }

    /// Send through the default client and return the raw response body.
    pub async fn response(self) -> Result<Bytes> {
        HttpClient::default().response(self).await
    }

    /// Send through the default client and report the envelope's `success`.
    pub async fn success(self) -> Result<bool> {
        HttpClient::default().success(self).await
    }

    /// Send through the default client and decode the envelope's `data`
    /// into `target`. See [`HttpClient::unmarshal`].
    pub async fn unmarshal<T: DeserializeOwned>(
        self,
        target: &mut T,
    ) -> Result<Option<ResponseError>> {
        HttpClient::default().unmarshal(self, target).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let request = HttpRequest::new("http://example.com");
        assert_eq!(request.url(), "http://example.com");
        assert_eq!(request.get_method(), "POST");
        assert!(!request.is_async());
        assert_eq!(request.get_timeout(), Duration::from_secs(10));
        assert!(request.get_body().is_none());
        assert!(request.get_params().is_empty());
        assert!(request.get_headers().is_empty());
        assert!(request.get_files().is_empty());
    }

    #[test]
    fn test_method_is_upper_cased() {
        let request = HttpRequest::new("http://example.com").method("get");
        assert_eq!(request.get_method(), "GET");

        let request = request.method("Delete");
        assert_eq!(request.get_method(), "DELETE");
    }

    #[test]
    fn test_setters_replace_wholesale() {
        let mut first = BTreeMap::new();
        first.insert("a".to_string(), ParamValue::from("x"));
        let mut second = BTreeMap::new();
        second.insert("b".to_string(), ParamValue::from(1));

        let request = HttpRequest::new("http://example.com")
            .params(first)
            .params(second)
            .body("one")
            .body("two")
            .set_async(true)
            .timeout(Duration::from_millis(250));

        assert_eq!(request.get_params().len(), 1);
        assert!(request.get_params().contains_key("b"));
        assert_eq!(request.get_body().map(|b| &b[..]), Some(&b"two"[..]));
        assert!(request.is_async());
        assert_eq!(request.get_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_params_json() {
        let request = HttpRequest::new("http://example.com")
            .params_json(json!({"a": "x", "b": [1, 2]}))
            .unwrap();
        assert_eq!(request.get_params()["a"], ParamValue::String("x".into()));
        assert_eq!(request.get_params()["b"], ParamValue::IntList(vec![1, 2]));
    }

    #[test]
    fn test_params_json_rejects_bad_values() {
        let result = HttpRequest::new("http://example.com").params_json(json!({"flag": true}));
        assert!(matches!(result, Err(RequestError::BadParams)));

        let result = HttpRequest::new("http://example.com").params_json(json!(["a"]));
        assert!(matches!(result, Err(RequestError::BadParams)));
    }
}
