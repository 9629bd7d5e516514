//! Turning an [`HttpRequest`] into a transport-ready `http::Request`.
//!
//! Exactly one encoding applies per request:
//!
//! 1. any files: `multipart/form-data` upload (always POST)
//! 2. a raw body: the bytes verbatim, no `Content-Type` (always POST)
//! 3. otherwise by method: POST sends an urlencoded form, GET appends a
//!    query string, anything else is rejected
//!
//! Every encoding then sets [`DEFAULT_USER_AGENT`] and applies the caller's
//! headers on top, so callers can override both `User-Agent` and
//! `Content-Type`.

use http::header::{CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use reqwest::multipart::{Form, Part};
use std::path::Path;
use url::Url;

use crate::{FileSource, HttpRequest, RequestBody, RequestError, Result};

/// `User-Agent` sent unless the caller sets one.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.14; rv:60.0) Gecko/20100101 Firefox/60.0";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

const FILE_CONTENT_TYPE: &str = "application/octet-stream";

/// The encoding chosen for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// `multipart/form-data` with fields and file parts.
    Multipart,
    /// Caller-supplied body bytes.
    Raw,
    /// `application/x-www-form-urlencoded` POST body.
    Form,
    /// Literal `key=value` pairs appended to the URL.
    Query,
}

impl Encoding {
    /// Pick the encoding for `request`.
    pub fn select(request: &HttpRequest) -> Result<Self> {
        if !request.get_files().is_empty() {
            return Ok(Self::Multipart);
        }
        if request.get_body().is_some() {
            return Ok(Self::Raw);
        }
        match request.get_method() {
            "POST" => Ok(Self::Form),
            "GET" => Ok(Self::Query),
            other => Err(RequestError::BadMethod(other.to_string())),
        }
    }
}

struct Encoded {
    method: Method,
    url: String,
    content_type: Option<String>,
    body: RequestBody,
}

/// Encode `request` into method, URL, headers and body.
///
/// Upload paths are read here, so I/O failures surface as
/// [`RequestError::Io`].
pub fn encode(request: &HttpRequest) -> Result<http::Request<RequestBody>> {
    let encoded = match Encoding::select(request)? {
        Encoding::Multipart => encode_multipart(request)?,
        Encoding::Raw => Encoded {
            method: Method::POST,
            url: request.url().to_string(),
            content_type: None,
            body: RequestBody::Bytes(request.get_body().cloned().unwrap_or_default()),
        },
        Encoding::Form => encode_form(request)?,
        Encoding::Query => encode_query(request)?,
    };

    build(encoded, request)
}

fn encode_form(request: &HttpRequest) -> Result<Encoded> {
    let mut pairs = Vec::new();
    for (key, value) in request.get_params() {
        for entry in value.to_strings() {
            pairs.push((key.as_str(), entry));
        }
    }

    let body = serde_urlencoded::to_string(&pairs)
        .map_err(|e| RequestError::RequestBuild(e.to_string()))?;

    Ok(Encoded {
        method: Method::POST,
        url: request.url().to_string(),
        content_type: Some(FORM_CONTENT_TYPE.to_string()),
        body: RequestBody::Bytes(body.into()),
    })
}

/// Keys and values are joined without escaping; only bytes that cannot
/// appear in a URI at all are escaped later by URL parsing.
fn encode_query(request: &HttpRequest) -> Result<Encoded> {
    let pairs = request
        .get_params()
        .iter()
        .map(|(key, value)| {
            value
                .scalar()
                .map(|value| format!("{key}={value}"))
                .ok_or(RequestError::BadParams)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut url = request.url().to_string();
    if !pairs.is_empty() {
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(&pairs.join("&"));
    }

    Ok(Encoded {
        method: Method::GET,
        url,
        content_type: None,
        body: RequestBody::default(),
    })
}

fn encode_multipart(request: &HttpRequest) -> Result<Encoded> {
    let mut form = Form::new();

    for (key, value) in request.get_params() {
        for entry in value.to_strings() {
            form = form.text(key.clone(), entry);
        }
    }

    for (field, source) in request.get_files() {
        match source {
            FileSource::Path(path) => form = form.part(field.clone(), path_part(path)?),
            FileSource::Paths(paths) => {
                for path in paths {
                    form = form.part(field.clone(), path_part(path)?);
                }
            }
            FileSource::Bytes(content) => {
                form = form.part(field.clone(), file_part(field.clone(), content.to_vec())?);
            }
        }
    }

    let content_type = format!("multipart/form-data; boundary={}", form.boundary());

    Ok(Encoded {
        method: Method::POST,
        url: request.url().to_string(),
        content_type: Some(content_type),
        body: RequestBody::Multipart(form),
    })
}

fn path_part(path: &Path) -> Result<Part> {
    let content = std::fs::read(path)?;
    file_part(base_name(path), content)
}

fn file_part(filename: String, content: Vec<u8>) -> Result<Part> {
    Part::bytes(content)
        .file_name(filename)
        .mime_str(FILE_CONTENT_TYPE)
        .map_err(|e| RequestError::RequestBuild(e.to_string()))
}

/// Last element of `path`. Trailing separators are ignored, so `..` stays
/// `..` and a bare root stays `/`.
fn base_name(path: &Path) -> String {
    if let Some(name) = path.file_name() {
        return name.to_string_lossy().into_owned();
    }

    let is_separator = |c: char| c == '/' || c == std::path::MAIN_SEPARATOR;
    let text = path.to_string_lossy();
    let trimmed = text.trim_end_matches(is_separator);
    if trimmed.is_empty() {
        return if text.is_empty() { "." } else { "/" }.to_string();
    }
    trimmed
        .rsplit(is_separator)
        .next()
        .unwrap_or(trimmed)
        .to_string()
}

fn build(encoded: Encoded, request: &HttpRequest) -> Result<http::Request<RequestBody>> {
    let url = Url::parse(&encoded.url)
        .map_err(|e| RequestError::InvalidUrl(format!("{}: {}", encoded.url, e)))?;

    let mut headers = HeaderMap::new();
    if let Some(content_type) = &encoded.content_type {
        headers.insert(CONTENT_TYPE, header_value(content_type)?);
    }
    headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    for (name, value) in request.get_headers() {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| RequestError::RequestBuild(format!("header {name}: {e}")))?;
        headers.insert(name, header_value(value)?);
    }

    let mut built = http::Request::builder()
        .method(encoded.method)
        .uri(url.as_str())
        .body(encoded.body)
        .map_err(|e| RequestError::RequestBuild(e.to_string()))?;
    *built.headers_mut() = headers;

    Ok(built)
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| RequestError::RequestBuild(format!("header value {value:?}: {e}")))
}
