//! # Microservice Utilities
//!
//! Building blocks shared by HTTP microservices.
//!
//! ## Modules
//!
//! - `domain` - Response envelopes, the message catalog, log records and logger config
//! - `service` - `ResponseHandler` and the rotating `FileLogger`
//! - `error` - Crate error type
//!
//! ```
//! use msutils_core::{Outcome, ResponseHandler};
//!
//! let reply = ResponseHandler::from_result(Outcome::Status((), 404), "User");
//! assert_eq!(reply.status_code(), 404);
//! assert_eq!(reply.envelope().message(), "User not found");
//! ```

pub mod domain;
pub mod error;
pub mod service;

pub use domain::*;
pub use error::{Error, Result};
pub use service::*;
