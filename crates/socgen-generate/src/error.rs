//! Generation error types.

use std::path::PathBuf;

use socgen_expr::ExprError;

/// Errors raised while copying files or rendering templates.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("expression error: {0}")]
    Expr(#[from] ExprError),

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("invalid glob '{pattern}': {source}")]
    Glob {
        pattern: String,
        source: regex::Error,
    },

    #[error("Failed to copy from {src} to {dst}: {source}")]
    Copy {
        src: String,
        dst: String,
        source: Box<GenerateError>,
    },

    #[error("Failed to render template from {src} to {dst}: {source}")]
    Render {
        src: String,
        dst: String,
        source: Box<GenerateError>,
    },

    /// The manifest was not loaded from a file, so its sources cannot be located.
    #[error("plugin '{plugin_id}' has no directory to resolve sources against")]
    NoPluginDir { plugin_id: String },

    #[error("template file is not UTF-8: {path}")]
    NotUtf8 { path: PathBuf },
}

/// Result type alias for generation.
pub type Result<T> = std::result::Result<T, GenerateError>;
