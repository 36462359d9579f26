//! Register operation sequences and their C rendering.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};
use socgen_model::SocDataModel;

use crate::error::{CodegenError, Result};
use crate::rpn::evaluate_expression;

/// What a step does to its register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOperation {
    Read,
    Write,
    Poll,
    /// Continues the previous step's operation; the two fields are written
    /// or polled together.
    WithPrevious,
}

/// A step value: an RPN expression, or a plain number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepValue {
    Expr(String),
    Number(i64),
}

impl StepValue {
    pub fn evaluate(&self, ctrl_value: i64) -> Result<i64> {
        match self {
            StepValue::Expr(expr) => evaluate_expression(expr, ctrl_value),
            StepValue::Number(n) => Ok(*n),
        }
    }
}

impl Default for StepValue {
    fn default() -> Self {
        StepValue::Expr(String::new())
    }
}

/// One register operation of a sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SequenceStep {
    /// Defaults to the register of the previous step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub register: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default)]
    pub value: StepValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<StepOperation>,
    /// Delay emitted after the step, in the target's `sleep` units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait: Option<u64>,
}

/// Parse a JSON array of sequence steps.
pub fn parse_sequence(json: &str) -> Result<Vec<SequenceStep>> {
    Ok(serde_json::from_str(json)?)
}

/// `N` + `U` below ten, hex otherwise.
struct Literal(u32);

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 10 {
            write!(f, "{}U", self.0)
        } else {
            write!(f, "0x{:x}U", self.0)
        }
    }
}

/// Render `sequence` as C statements, each prefixed with `indent`.
///
/// Steps followed by `WithPrevious` steps are merged into a single masked
/// access of the register. Fields are looked up in the registers of `soc`.
pub fn gen_code(soc: &SocDataModel, indent: &str, sequence: &[SequenceStep], ctrl_value: i64) -> Result<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut register = String::from("unknown");
    let mut operation: Option<StepOperation> = None;
    let mut accum_value: u32 = 0;
    let mut accum_mask: u32 = 0;

    for (idx, step) in sequence.iter().enumerate() {
        if step.operation != Some(StepOperation::WithPrevious) {
            operation = step.operation;
        }
        if let Some(name) = &step.register {
            register = name.clone();
        }

        let reg = if soc.is_adsp() {
            format!("*pREG_{register}")
        } else {
            register.clone()
        };

        if operation == Some(StepOperation::Read) {
            lines.push(format!("{indent}{reg};"));
            continue;
        }

        let pending = sequence
            .get(idx + 1)
            .is_some_and(|next| next.operation == Some(StepOperation::WithPrevious));

        let field_name = step.field.as_deref().unwrap_or_default();
        let field = soc
            .register(&register)
            .and_then(|r| r.field(field_name))
            .ok_or_else(|| CodegenError::FieldNotFound {
                register: register.clone(),
                field: field_name.to_string(),
            })?;
        let mask = field.mask();
        let op_value = step.value.evaluate(ctrl_value)? as u32;

        if pending || accum_mask != 0 {
            accum_value |= op_value.checked_shl(field.position).unwrap_or(0);
            accum_mask |= mask.checked_shl(field.position).unwrap_or(0);
        }
        if pending {
            continue;
        }

        let shift = if accum_mask != 0 {
            0
        } else {
            accum_value = op_value;
            accum_mask = mask;
            field.position
        };
        let value = Literal(accum_value);
        let mask = Literal(accum_mask);
        debug!("{register}.{} {operation:?} value={value} shift={shift}", field.name);

        match operation {
            Some(StepOperation::Write) => {
                let statement = if field.length == 32 {
                    format!("{reg} = {value};")
                } else if accum_value != accum_mask && accum_value != 0 {
                    if shift > 0 {
                        format!("{reg} = (({reg} & ~({mask} << {shift})) | ({value} << {shift}));")
                    } else {
                        format!("{reg} = (({reg} & ~{mask}) | {value});")
                    }
                } else if accum_value == 0 {
                    if shift > 0 {
                        format!("{reg} &= ~({mask} << {shift});")
                    } else {
                        format!("{reg} &= ~{mask};")
                    }
                } else if shift > 0 {
                    format!("{reg} |= ({value} << {shift});")
                } else {
                    format!("{reg} |= {value};")
                };
                lines.push(format!("{indent}{statement}"));
            }
            Some(StepOperation::Poll) => {
                let test = if field.length >= 32 {
                    format!("{reg} != {value}")
                } else if shift > 0 {
                    format!("(({reg} >> {shift}) & {mask}) != {value}")
                } else {
                    format!("({reg} & {mask}) != {value}")
                };
                lines.push(format!("{indent}while ({test}) {{\n{indent}}}"));
            }
            _ => {}
        }

        if let Some(wait) = step.wait.filter(|w| *w > 0) {
            lines.push(format!("{indent}sleep({wait});"));
        }

        accum_value = 0;
        accum_mask = 0;
    }

    Ok(lines.join("\n"))
}
