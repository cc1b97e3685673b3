#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! Command-line tools for administering Canvas LMS courses.
//!
//! Layout:
//! - `cli.rs`: argument parsing and command dispatch
//! - `commands/`: command handlers grouped by resource
//! - `client.rs`: application context and CLI error type
//! - `markdown.rs`: markdown to HTML conversion (built-in or pandoc)
//! - `output.rs`: renderers for text, CSV and JSON output
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod markdown;
pub(crate) mod output;

pub use cli::run;
