//! Terminal UI layer for the chat analyzer.
//!
//! Provides themes, chart and table widgets for each report view, a summary
//! panel and the tabbed application loop built on top of [`ratatui`].

pub mod app;
pub mod charts;
pub mod summary_view;
pub mod table_view;
pub mod themes;

pub use analyzer_core as core;
