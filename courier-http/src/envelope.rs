//! The `{success, data, error}` response envelope.
//!
//! Services answering these requests wrap every payload as
//!
//! ```json
//! {"success": true, "data": {...}, "error": null}
//! {"success": false, "data": null, "error": {"code": 7, "message": "bad"}}
//! ```
//!
//! [`decode_success`] and [`decode_into`] read that shape back.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;

/// Application-level failure carried by an envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseError {
    /// Application error code.
    #[serde(default)]
    pub code: i64,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}

/// The response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T = Value> {
    /// Whether the call succeeded.
    #[serde(default)]
    pub success: bool,
    /// Payload, meaningful only when `success` is true.
    pub data: Option<T>,
    /// Failure, meaningful only when `success` is false.
    pub error: Option<ResponseError>,
}

impl<T> ResponseEnvelope<T> {
    /// A successful envelope carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// A failed envelope.
    pub fn failure(code: i64, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ResponseError {
                code,
                message: message.into(),
            }),
        }
    }
}

impl ResponseEnvelope {
    /// The envelope returned for a request accepted by the async pool.
    pub fn accepted() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }
}

/// Decode `bytes` as an envelope and return its `success` flag.
pub fn decode_success(bytes: &[u8]) -> Result<bool> {
    let envelope: ResponseEnvelope = serde_json::from_slice(bytes)?;
    Ok(envelope.success)
}

/// Decode `bytes` as an envelope, writing `data` into `target` on success.
///
/// Returns `Ok(None)` when the envelope reports success; `target` is
/// replaced only if `data` is present. When the envelope reports failure,
/// `target` is left untouched and its `error` is returned. Malformed JSON,
/// or a `data` that does not fit `T` on a successful envelope, is an `Err`.
pub fn decode_into<T: DeserializeOwned>(
    bytes: &[u8],
    target: &mut T,
) -> Result<Option<ResponseError>> {
    let envelope: ResponseEnvelope = serde_json::from_slice(bytes)?;

    if !envelope.success {
        return Ok(envelope.error);
    }

    if let Some(data) = envelope.data.filter(|data| !data.is_null()) {
        *target = serde_json::from_value(data)?;
    }

    Ok(None)
}
