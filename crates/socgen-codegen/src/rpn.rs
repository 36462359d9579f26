//! Reverse-Polish register value expressions.
//!
//! Tokens are separated by whitespace and evaluated over one stack:
//!
//! | Token | Effect |
//! |---|---|
//! | `${Value}` | push the control value |
//! | decimal literal | push it |
//! | `!` `~` | replace the top with its logical / bitwise negation |
//! | `+ - * / = != < > <= >= && \|\| << >> & \| ^` | pop two, push the result |
//! | `?` | pop condition, then-value, else-value; push the selected one |
//!
//! `/` floors, shifts are unsigned 32-bit, bitwise operators work on signed
//! 32-bit values, and comparisons and boolean operators yield 0 or 1.

use crate::error::{CodegenError, Result};

const VALUE_TOKEN: &str = "${Value}";

/// Evaluate `expr` with `ctrl_value` substituted for `${Value}`.
///
/// The result is the bottom of the stack once every token is consumed.
pub fn evaluate_expression(expr: &str, ctrl_value: i64) -> Result<i64> {
    let mut stack: Vec<i64> = Vec::new();
    let mut rest = expr;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let token = &rest[..end];

        if token == VALUE_TOKEN {
            stack.push(ctrl_value);
        } else if let Some(literal) = parse_literal(token) {
            stack.push(literal?);
        } else if let Some(op) = unary(token) {
            let top = stack.last_mut().ok_or_else(|| underflow(token))?;
            *top = op(*top);
        } else if let Some(op) = binary(token) {
            let (b, a) = match (stack.pop(), stack.pop()) {
                (Some(b), Some(a)) => (b, a),
                _ => return Err(underflow(token)),
            };
            stack.push(op(a, b)?);
        } else if token == "?" {
            // Fewer than three operands leaves the stack as it is.
            if stack.len() >= 3 {
                let otherwise = stack.pop().unwrap_or_default();
                let then = stack.pop().unwrap_or_default();
                let condition = stack.pop().unwrap_or_default();
                stack.push(if condition != 0 { then } else { otherwise });
            }
        } else {
            return Err(CodegenError::UnrecognizedToken {
                remainder: rest.trim_end().to_string(),
            });
        }

        rest = &rest[end..];
    }

    stack.first().copied().ok_or(CodegenError::EmptyExpression)
}

/// `None` when `token` is not made of digits.
fn parse_literal(token: &str) -> Option<Result<i64>> {
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(token.parse().map_err(|source| CodegenError::InvalidLiteral {
        literal: token.to_string(),
        source,
    }))
}

fn underflow(token: &str) -> CodegenError {
    CodegenError::StackUnderflow {
        token: token.to_string(),
    }
}

fn unary(token: &str) -> Option<fn(i64) -> i64> {
    let op: fn(i64) -> i64 = match token {
        "!" => |a| i64::from(a == 0),
        "~" => |a| i64::from(!(a as i32)),
        _ => return None,
    };
    Some(op)
}

type BinaryFn = fn(i64, i64) -> Result<i64>;

fn binary(token: &str) -> Option<BinaryFn> {
    let op: BinaryFn = match token {
        "+" => |a, b| Ok(a.wrapping_add(b)),
        "-" => |a, b| Ok(a.wrapping_sub(b)),
        "*" => |a, b| Ok(a.wrapping_mul(b)),
        "/" => |a, b| {
            if b == 0 {
                return Err(CodegenError::DivisionByZero);
            }
            let quotient = a.wrapping_div(b);
            if a.wrapping_rem(b) != 0 && (a < 0) != (b < 0) {
                Ok(quotient - 1)
            } else {
                Ok(quotient)
            }
        },
        "=" => |a, b| Ok(i64::from(a == b)),
        "!=" => |a, b| Ok(i64::from(a != b)),
        "<" => |a, b| Ok(i64::from(a < b)),
        ">" => |a, b| Ok(i64::from(a > b)),
        "<=" => |a, b| Ok(i64::from(a <= b)),
        ">=" => |a, b| Ok(i64::from(a >= b)),
        "&&" => |a, b| Ok(i64::from(a != 0 && b != 0)),
        "||" => |a, b| Ok(i64::from(a != 0 || b != 0)),
        "<<" => |a, b| Ok(i64::from((a as u32).wrapping_shl(b as u32 & 31))),
        ">>" => |a, b| Ok(i64::from((a as u32).wrapping_shr(b as u32 & 31))),
        "&" => |a, b| Ok(i64::from(a as i32 & b as i32)),
        "|" => |a, b| Ok(i64::from(a as i32 | b as i32)),
        "^" => |a, b| Ok(i64::from(a as i32 ^ b as i32)),
        _ => return None,
    };
    Some(op)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_times_literal() {
        assert_eq!(evaluate_expression("${Value} 2 *", 5).unwrap(), 10);
    }

    #[test]
    fn ternary_selects_branch() {
        assert_eq!(evaluate_expression("${Value} 3 < 1 ? 0 ?", 2).unwrap(), 1);
        assert_eq!(evaluate_expression("${Value} 3 < 10 20 ?", 2).unwrap(), 10);
        assert_eq!(evaluate_expression("${Value} 3 < 10 20 ?", 7).unwrap(), 20);
    }

    #[test]
    fn division_floors() {
        assert_eq!(evaluate_expression("5 3 /", 0).unwrap(), 1);
        assert_eq!(evaluate_expression("0 7 - 2 /", 0).unwrap(), -4);
        assert_eq!(evaluate_expression("7 0 2 - /", 0).unwrap(), -4);
        assert_eq!(evaluate_expression("0 7 - 0 2 - /", 0).unwrap(), 3);
        assert_eq!(evaluate_expression("6 3 /", 0).unwrap(), 2);
    }

    #[test]
    fn division_by_zero() {
        assert!(matches!(
            evaluate_expression("1 0 /", 0),
            Err(CodegenError::DivisionByZero)
        ));
    }

    #[test]
    fn oversized_literal_is_not_an_unknown_token() {
        match evaluate_expression("${Value} 99999999999999999999 +", 1) {
            Err(CodegenError::InvalidLiteral { literal, .. }) => assert_eq!(literal, "99999999999999999999"),
            other => panic!("expected an invalid literal, got {other:?}"),
        }
        assert_eq!(evaluate_expression("9223372036854775807", 0).unwrap(), i64::MAX);
    }

    #[test]
    fn unrecognized_token_reports_remainder() {
        match evaluate_expression("@@@", 0) {
            Err(CodegenError::UnrecognizedToken { remainder }) => assert_eq!(remainder, "@@@"),
            other => panic!("expected unrecognized token, got {other:?}"),
        }
        match evaluate_expression("1 2 + foo 3 ", 0) {
            Err(CodegenError::UnrecognizedToken { remainder }) => assert_eq!(remainder, "foo 3"),
            other => panic!("expected unrecognized token, got {other:?}"),
        }
    }

    #[test]
    fn operators_need_whole_tokens() {
        assert!(evaluate_expression("1 2 +3", 0).is_err());
        assert!(evaluate_expression("12abc", 0).is_err());
    }

    #[test]
    fn comparisons_and_logic() {
        assert_eq!(evaluate_expression("3 3 =", 0).unwrap(), 1);
        assert_eq!(evaluate_expression("3 4 !=", 0).unwrap(), 1);
        assert_eq!(evaluate_expression("3 4 >=", 0).unwrap(), 0);
        assert_eq!(evaluate_expression("3 5 &&", 0).unwrap(), 1);
        assert_eq!(evaluate_expression("0 5 ||", 0).unwrap(), 1);
        assert_eq!(evaluate_expression("0 !", 0).unwrap(), 1);
        assert_eq!(evaluate_expression("9 !", 0).unwrap(), 0);
    }

    #[test]
    fn bitwise() {
        assert_eq!(evaluate_expression("${Value} 4 <<", 3).unwrap(), 48);
        assert_eq!(evaluate_expression("48 4 >>", 0).unwrap(), 3);
        assert_eq!(evaluate_expression("1 31 <<", 0).unwrap(), 0x8000_0000);
        assert_eq!(evaluate_expression("12 10 &", 0).unwrap(), 8);
        assert_eq!(evaluate_expression("12 10 |", 0).unwrap(), 14);
        assert_eq!(evaluate_expression("12 10 ^", 0).unwrap(), 6);
        assert_eq!(evaluate_expression("0 ~", 0).unwrap(), -1);
    }

    #[test]
    fn underflow_is_an_error() {
        assert!(matches!(
            evaluate_expression("1 +", 0),
            Err(CodegenError::StackUnderflow { .. })
        ));
        assert!(matches!(
            evaluate_expression("~", 0),
            Err(CodegenError::StackUnderflow { .. })
        ));
    }

    #[test]
    fn result_is_stack_bottom() {
        assert_eq!(evaluate_expression("1 2 3", 0).unwrap(), 1);
        assert!(matches!(
            evaluate_expression("   ", 0),
            Err(CodegenError::EmptyExpression)
        ));
    }
}
