//! Response envelope and reply types
//!
//! Every response body has the same shape:
//!
//! ```json
//! { "success": true, "message": "...", "data": { ... } }
//! { "success": false, "message": "...", "error": "Not Found" }
//! ```
//!
//! The HTTP status code never lives inside the body. It travels next to the
//! envelope in a [`Reply`].

use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::Result;

/// Normalized response body.
///
/// `success` is true exactly when `error` is absent, and `data` only exists on
/// successful envelopes. Both rules are upheld by the constructors and checked
/// again when parsing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawEnvelope", bound(deserialize = "T: DeserializeOwned"))]
pub struct Envelope<T = Value> {
    success: bool,
    message: String,
    data: Option<T>,
    error: Option<String>,
}

impl<T> Envelope<T> {
    /// Successful envelope; `None` data is emitted as `null`.
    ///
    /// When parsed back, `null` becomes `Some` for payload types that accept
    /// it (`Value`, `Option<_>`, `()`), and `None` for all others.
    pub fn success(data: Option<T>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            error: None,
        }
    }

    /// Failed envelope carrying an error description
    pub fn failure(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub(crate) fn set_message(&mut self, message: String) {
        self.message = message;
    }

    pub(crate) fn set_error(&mut self, error: String) {
        if !self.success {
            self.error = Some(error);
        }
    }
}

impl<T: Serialize> Envelope<T> {
    /// Encode the envelope as a JSON string, keeping non-ASCII text as-is
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Encode the envelope as a JSON value
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Parse an envelope previously produced by [`Envelope::to_json`]
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Envelope", 3)?;
        state.serialize_field("success", &self.success)?;
        state.serialize_field("message", &self.message)?;
        if self.success {
            state.serialize_field("data", &self.data)?;
            state.skip_field("error")?;
        } else {
            state.skip_field("data")?;
            state.serialize_field("error", &self.error)?;
        }
        state.end()
    }
}

#[derive(Deserialize)]
struct RawEnvelope {
    success: bool,
    message: String,
    // Absent stays `None`; an explicit `null` is kept as a value
    #[serde(default, deserialize_with = "present")]
    data: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl<T: DeserializeOwned> TryFrom<RawEnvelope> for Envelope<T> {
    type Error = String;

    fn try_from(raw: RawEnvelope) -> std::result::Result<Self, Self::Error> {
        let carries_data = matches!(raw.data, Some(ref value) if !value.is_null());
        match (raw.success, raw.error.is_some(), carries_data) {
            (true, true, _) => Err("successful envelope must not carry an error".to_string()),
            (false, false, _) => Err("failed envelope is missing its error".to_string()),
            (false, true, true) => Err("failed envelope must not carry data".to_string()),
            (false, true, false) => Ok(Self {
                success: false,
                message: raw.message,
                data: None,
                error: raw.error,
            }),
            (true, false, _) => {
                let data = match raw.data {
                    None => None,
                    // `null` is a payload for types that accept it, otherwise no data
                    Some(Value::Null) => serde_json::from_value(Value::Null).ok(),
                    Some(value) => Some(serde_json::from_value(value).map_err(|e| e.to_string())?),
                };
                Ok(Self {
                    success: true,
                    message: raw.message,
                    data,
                    error: None,
                })
            }
        }
    }
}

/// An envelope together with the HTTP status code it should be sent with
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T = Value> {
    envelope: Envelope<T>,
    status_code: u16,
}

impl<T> Reply<T> {
    pub fn new(envelope: Envelope<T>, status_code: u16) -> Self {
        Self {
            envelope,
            status_code,
        }
    }

    pub fn envelope(&self) -> &Envelope<T> {
        &self.envelope
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn is_success(&self) -> bool {
        self.envelope.is_success()
    }

    pub fn into_parts(self) -> (Envelope<T>, u16) {
        (self.envelope, self.status_code)
    }

    /// Replace the human-readable message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.envelope.set_message(message.into());
        self
    }

    /// Replace the status code
    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = status_code;
        self
    }

    /// Attach error details. Successful replies are left untouched.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.envelope.set_error(details.into());
        self
    }
}

impl<T: Serialize> Reply<T> {
    /// Encode the envelope (not the status code) as JSON
    pub fn to_json(&self) -> Result<String> {
        self.envelope.to_json()
    }
}

#[cfg(feature = "axum")]
impl<T: Serialize> axum::response::IntoResponse for Reply<T> {
    fn into_response(self) -> axum::response::Response {
        let status = axum::http::StatusCode::from_u16(self.status_code)
            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::Json(self.envelope)).into_response()
    }
}

/// Canonical reason phrase for the status codes services commonly return
pub fn reason_phrase(status_code: u16) -> &'static str {
    match status_code {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        410 => "Gone",
        413 => "Payload Too Large",
        415 => "Unsupported Media Type",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        400..=499 => "Client Error",
        500..=599 => "Server Error",
        _ => "Error",
    }
}
