//! Error types for loading and validating model documents.

use std::path::PathBuf;

/// Errors that can occur while loading a data model or plugin manifest.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error reading a document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document not found.
    #[error("file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// A feature scope string that is not one of the known scopes.
    #[error("unknown feature scope '{0}'")]
    UnknownScope(String),

    /// Validation error in a plugin manifest.
    #[error("validation error: {detail}")]
    Validation {
        /// Description of the validation failure.
        detail: String,
    },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
