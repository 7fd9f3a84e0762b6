//! # Impact
//!
//! Library half of the Impact binary: the HTTP API, the CLI commands and
//! layered configuration over `impact-core`.

pub mod api;
pub mod cli;
pub mod config;
