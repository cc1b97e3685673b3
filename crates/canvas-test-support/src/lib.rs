#![forbid(unsafe_code)]
#![deny(unused_must_use, missing_docs)]

//! Shared test helpers used across the canvas-tools suites.
//! Layout: fixtures.rs (token files, roster records, mock responses).

pub mod fixtures;
