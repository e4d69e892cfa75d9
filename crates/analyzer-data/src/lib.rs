//! Data layer for the chat analyzer.
//!
//! Responsible for locating and reading chat exports, normalising them into
//! typed records, filtering by date range, computing the activity
//! aggregations and running the top-level analysis pipeline.

pub mod aggregator;
pub mod analysis;
pub mod filter;
pub mod reader;

pub use analyzer_core as core;
