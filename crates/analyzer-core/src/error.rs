use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the chat analyzer.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An export directory did not contain a `result.json` document.
    #[error("No export document found in {0}")]
    ExportNotFound(PathBuf),

    /// The document is not valid JSON or does not have the export shape.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A message entry failed required-field coercion.
    #[error("Invalid record (message {message_id}): {reason}")]
    InvalidRecord { message_id: String, reason: String },

    /// A caller-supplied parameter violates its contract.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl AnalyzerError {
    /// Build an [`AnalyzerError::InvalidRecord`] for the given message reference.
    pub fn invalid_record(message_id: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalyzerError::InvalidRecord {
            message_id: message_id.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for AnalyzerError {
    fn from(err: serde_json::Error) -> Self {
        AnalyzerError::MalformedInput(err.to_string())
    }
}

/// Convenience alias used throughout the analyzer crates.
pub type Result<T> = std::result::Result<T, AnalyzerError>;
