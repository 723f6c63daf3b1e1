//! Logging integration tests
//!
//! File routing, line format, rotation and maintenance through the public
//! `FileLogger` API.

mod config;
mod file_logger;
mod rotation;
