//! Standardized API replies
//!
//! `ResponseHandler` builds [`Reply`] values with consistent envelopes and
//! status codes. Messages default to the general catalog and can be replaced
//! with [`Reply::with_message`].

use serde::Serialize;
use serde_json::Value;

use crate::domain::{reason_phrase, Envelope, GeneralMessage, Messages, Reply};
use crate::error::Result;

/// Result of an operation handed to [`ResponseHandler::from_result`]
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Plain value, reported as a 200 success
    Value(T),
    /// Value together with the status code the operation chose
    Status(T, u16),
    /// Text together with a status code; on error codes and 201 the text
    /// becomes the reply message
    Message(String, u16),
}

/// Builder for standardized replies
pub struct ResponseHandler;

impl ResponseHandler {
    /// 200 with data and the default success message
    pub fn success<T>(data: T) -> Reply<T> {
        Reply::new(
            Envelope::success(Some(data), GeneralMessage::Success.message()),
            200,
        )
    }

    /// 200 without data (`"data": null`)
    pub fn success_empty() -> Reply {
        Reply::new(
            Envelope::success(Some(Value::Null), GeneralMessage::Success.message()),
            200,
        )
    }

    /// 400 with the given message
    pub fn error(message: impl Into<String>) -> Reply {
        failure(message, 400)
    }

    /// 400 with the default error message
    pub fn error_default() -> Reply {
        failure(GeneralMessage::Error.message(), 400)
    }

    /// 201 with data
    pub fn created<T>(data: T) -> Reply<T> {
        Self::success(data).with_status(201)
    }

    /// 404 naming the missing resource
    pub fn not_found(resource_name: &str) -> Reply {
        failure(format!("{} not found", resource_name), 404)
    }

    /// 403
    pub fn forbidden() -> Reply {
        failure(GeneralMessage::Forbidden.message(), 403)
    }

    /// 401
    pub fn unauthorized() -> Reply {
        failure(GeneralMessage::Unauthorized.message(), 401)
    }

    /// 400
    pub fn bad_request() -> Reply {
        failure(GeneralMessage::BadRequest.message(), 400)
    }

    /// 409, e.g. for duplicates
    pub fn conflict() -> Reply {
        failure(GeneralMessage::Conflict.message(), 409)
    }

    /// 500
    pub fn server_error() -> Reply {
        failure(GeneralMessage::InternalServerError.message(), 500)
    }

    /// Pick the reply that matches an operation's outcome.
    ///
    /// 404 always names `resource_name`; 400, 401, 403, 409 and 500 become
    /// errors (with the outcome's text when it carries a non-blank one); 201
    /// becomes a created reply; any other code is a success with that code and
    /// the message `"Success"`.
    pub fn from_result<T>(outcome: Outcome<T>, resource_name: &str) -> Reply<T> {
        let (data, text, status_code) = match outcome {
            Outcome::Value(data) => return Self::success(data),
            Outcome::Status(data, code) => (Some(data), None, code),
            Outcome::Message(text, code) => (None, Some(text), code),
        };
        // Blank text falls back to the default message
        let text = text.filter(|t| !t.trim().is_empty());

        match status_code {
            404 => failure(format!("{} not found", resource_name), 404),
            409 => failure(
                text.unwrap_or_else(|| format!("{} already exists", resource_name)),
                409,
            ),
            400 | 401 | 403 | 500 => failure(
                text.unwrap_or_else(|| Messages::get_by_code(status_code, None).to_string()),
                status_code,
            ),
            201 => {
                let reply = Reply::new(
                    Envelope::success(data, GeneralMessage::Success.message()),
                    201,
                );
                match text {
                    Some(text) => reply.with_message(text),
                    None => reply,
                }
            }
            code => Reply::new(Envelope::success(data, "Success"), code),
        }
    }

    /// Encode an envelope as a JSON string
    pub fn to_json<T: Serialize>(envelope: &Envelope<T>) -> Result<String> {
        envelope.to_json()
    }
}

// Error replies carry no data, so any payload type fits
fn failure<T>(message: impl Into<String>, status_code: u16) -> Reply<T> {
    Reply::new(
        Envelope::failure(message, reason_phrase(status_code)),
        status_code,
    )
}
