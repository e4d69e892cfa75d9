//! Shared building blocks for the chat analyzer.
//!
//! Holds the canonical message/channel record model, the error taxonomy,
//! timestamp parsing, number formatting and the command-line settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{AnalyzerError, Result};
