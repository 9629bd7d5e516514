//! Outgoing request bodies.

use bytes::Bytes;
use reqwest::multipart::Form;
use std::fmt;

/// The body of an encoded request.
///
/// Form, query and raw encodings produce bytes; uploads produce a
/// `reqwest` multipart form, which is only turned into bytes while it is
/// being sent.
pub enum RequestBody {
    /// A complete in-memory body.
    Bytes(Bytes),
    /// A `multipart/form-data` upload.
    Multipart(Form),
}

impl RequestBody {
    /// The body bytes, `None` for a multipart upload.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            Self::Multipart(_) => None,
        }
    }

    /// Whether this is a multipart upload.
    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }

    /// The multipart boundary, `None` for a byte body.
    pub fn boundary(&self) -> Option<&str> {
        match self {
            Self::Bytes(_) => None,
            Self::Multipart(form) => Some(form.boundary()),
        }
    }
}

impl Default for RequestBody {
    fn default() -> Self {
        Self::Bytes(Bytes::new())
    }
}

impl From<Bytes> for RequestBody {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Form> for RequestBody {
    fn from(form: Form) -> Self {
        Self::Multipart(form)
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Self::Multipart(form) => f
                .debug_struct("Multipart")
                .field("boundary", &form.boundary())
                .finish_non_exhaustive(),
        }
    }
}
