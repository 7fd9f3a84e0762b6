//! # System Module
//!
//! Model metrics.
//!
//! Metrics are pure, deterministic reads of a snapshot. They never gate any
//! operation; they exist for status reporting.

mod metrics;

pub use metrics::*;
