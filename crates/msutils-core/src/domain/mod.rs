//! Domain types: response envelopes, the message catalog, log records and
//! logger configuration

pub mod config;
mod envelope;
mod log_record;
mod messages;

pub use config::*;
pub use envelope::{reason_phrase, Envelope, Reply};
pub use log_record::*;
pub use messages::*;
