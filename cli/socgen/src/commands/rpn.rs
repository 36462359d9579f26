//! `socgen rpn`: evaluate a register value expression.

use anyhow::{Context, Result};
use socgen_codegen::evaluate_expression;

pub fn run(expr: &str, value: i64) -> Result<()> {
    let result = evaluate_expression(expr, value).with_context(|| format!("evaluating '{expr}'"))?;
    println!("{result}");
    Ok(())
}
