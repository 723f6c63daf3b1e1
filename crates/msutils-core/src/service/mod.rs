//! Services built on the domain types
//!
//! - `response_handler` - standardized API replies
//! - `file_logger` - rotating access/error log files
//! - `log_directory` - log directory resolution and fallbacks
//! - `log_maintenance` - cleanup, permission checks and diagnostics

mod file_logger;
pub mod log_directory;
mod log_maintenance;
mod response_handler;

pub use file_logger::FileLogger;
pub use log_maintenance::*;
pub use response_handler::{Outcome, ResponseHandler};
