//! Code generation error types.

/// Errors from RPN evaluation and sequence emission.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// A token that is neither a value, a literal, nor an operator.
    #[error("unrecognized token in expression: \"{remainder}\"")]
    UnrecognizedToken { remainder: String },

    /// A decimal literal that does not fit in 64 bits.
    #[error("invalid literal \"{literal}\": {source}")]
    InvalidLiteral {
        literal: String,
        source: std::num::ParseIntError,
    },

    /// An operator found fewer operands on the stack than it takes.
    #[error("operator '{token}' needs more operands than the stack holds")]
    StackUnderflow { token: String },

    #[error("division by zero")]
    DivisionByZero,

    /// The expression left nothing on the stack.
    #[error("expression produced no value")]
    EmptyExpression,

    /// A sequence step names a field its register does not have.
    #[error("could not find field \"{field}\" in register \"{register}\"")]
    FieldNotFound { register: String, field: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for code generation.
pub type Result<T> = std::result::Result<T, CodegenError>;
