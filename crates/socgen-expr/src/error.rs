//! Expression error types.

/// Errors raised while parsing or evaluating an expression.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExprError {
    /// Malformed expression or template.
    #[error("syntax error at offset {offset}: {detail}")]
    Syntax { offset: usize, detail: String },

    /// A name other than `context` was referenced.
    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),

    /// An operation was applied to a value that does not support it.
    #[error("type error: {detail}")]
    Type { detail: String },
}

impl ExprError {
    pub(crate) fn syntax(offset: usize, detail: impl Into<String>) -> Self {
        ExprError::Syntax {
            offset,
            detail: detail.into(),
        }
    }

    pub(crate) fn type_error(detail: impl Into<String>) -> Self {
        ExprError::Type {
            detail: detail.into(),
        }
    }
}

/// Result type alias for expression operations.
pub type Result<T> = std::result::Result<T, ExprError>;
