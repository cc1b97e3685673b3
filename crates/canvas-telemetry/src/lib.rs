#![forbid(unsafe_code)]
#![deny(unused_must_use, rustdoc::broken_intra_doc_links, missing_docs)]

//! Logging setup shared by the canvas-tools binaries.
//!
//! Logs go to stderr so that command output on stdout (CSV rosters, JSON)
//! stays machine-readable.

pub mod init;

pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
