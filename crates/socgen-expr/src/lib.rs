//! Template-literal expression evaluator.
//!
//! Plugin manifests embed small expressions in conditions, defaults, and
//! destination paths, written as JavaScript-style template literals:
//! `"${context.board.toLowerCase()}/src/"`. This crate interprets them over a
//! fixed grammar instead of executing them:
//!
//! - [`lexer`]: tokens with byte offsets
//! - [`ast`]: tagged expression tree
//! - [`parser`]: recursive-descent parser for expressions and template bodies
//! - [`eval`]: evaluator with JavaScript-compatible coercions
//! - [`template`]: `eval_nested_template_literals` and parsed [`Template`]s
//!
//! The only bound name is `context`. Calls are limited to a handful of pure
//! string/array methods; nothing reaches the host.

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod template;

pub use ast::{BinaryOp, Expr, LogicalOp, Method, TemplatePart, UnaryOp};
pub use error::{ExprError, Result};
pub use eval::{eval_expr, Value};
pub use parser::parse_expression;
pub use template::{eval_nested_template_literals, Template};
