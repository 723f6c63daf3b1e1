//! Response integration tests
//!
//! Envelope shape and status codes as seen by a service serializing replies.

mod envelope_json;
mod handler;
