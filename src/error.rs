//! Error types for docslab.
//!
//! Segmentation itself never fails: degraded input is absorbed and logged.
//! Errors surface only from configuration and from loading a document.

/// Errors that can occur while configuring the segmenter or loading input.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configuration value is out of range.
    #[error("invalid config: {field} {reason}")]
    InvalidConfig {
        /// The offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The extraction collaborator could not produce a document.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// Reading input from disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input or config JSON was malformed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for docslab operations.
pub type Result<T> = std::result::Result<T, Error>;
