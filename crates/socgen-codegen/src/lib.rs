//! Register-sequence code generation.
//!
//! Data models describe how to program a setting as a sequence of register
//! operations whose values are reverse-Polish expressions over the setting's
//! value. [`evaluate_expression`] computes those values and [`gen_code`]
//! turns a sequence into C statements.

pub mod error;
pub mod rpn;
pub mod sequence;

pub use error::{CodegenError, Result};
pub use rpn::evaluate_expression;
pub use sequence::{gen_code, parse_sequence, SequenceStep, StepOperation, StepValue};
