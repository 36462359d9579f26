//! Expression evaluator.
//!
//! Values follow JavaScript coercion rules closely enough that manifest
//! expressions written for a JavaScript host produce the same strings:
//! integral numbers print without a fraction, missing properties are
//! `undefined`, `+` concatenates as soon as either side is a string.

use std::cmp::Ordering;
use std::fmt;

use serde_json::Map;

use crate::ast::{BinaryOp, Expr, LogicalOp, Method, TemplatePart, UnaryOp};
use crate::error::{ExprError, Result};

/// A runtime value. Objects borrow from the evaluation context.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Array(Vec<Value<'a>>),
    Object(&'a Map<String, serde_json::Value>),
}

impl<'a> Value<'a> {
    /// View a JSON value as a runtime value.
    pub fn from_json(json: &'a serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Array(items) => Value::Array(items.iter().map(Value::from_json).collect()),
            serde_json::Value::Object(map) => Value::Object(map),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Numeric coercion.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::Str(s) => string_to_number(s),
            Value::Array(_) => string_to_number(&self.to_string()),
            Value::Object(_) => f64::NAN,
        }
    }

    /// Arrays and objects collapse to their string form; everything else is
    /// already primitive.
    fn to_primitive(&self) -> Value<'a> {
        match self {
            Value::Array(_) | Value::Object(_) => Value::Str(self.to_string()),
            other => other.clone(),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Str(s) => f.write_str(s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if !item.is_nullish() {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            Value::Object(_) => f.write_str("[object Object]"),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{}", n as i128)
    } else {
        format!("{n}")
    }
}

fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).map_or(f64::NAN, |v| v as f64);
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Evaluate an expression with `context` as the only bound name.
pub fn eval_expr<'a>(expr: &Expr, context: &'a serde_json::Value) -> Result<Value<'a>> {
    match expr {
        Expr::Str(s) => Ok(Value::Str(s.clone())),
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Null => Ok(Value::Null),
        Expr::Undefined => Ok(Value::Undefined),
        Expr::Ident(name) if name == "context" => Ok(Value::from_json(context)),
        Expr::Ident(name) => Err(ExprError::UnknownIdentifier(name.clone())),
        Expr::Array(items) => items
            .iter()
            .map(|item| eval_expr(item, context))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Expr::Member { object, property } => {
            let object = eval_expr(object, context)?;
            get_property(&object, property)
        }
        Expr::Index { object, index } => {
            let object = eval_expr(object, context)?;
            let index = eval_expr(index, context)?;
            get_index(&object, &index)
        }
        Expr::Call {
            receiver,
            method,
            args,
        } => {
            let receiver = eval_expr(receiver, context)?;
            let args = args
                .iter()
                .map(|arg| eval_expr(arg, context))
                .collect::<Result<Vec<_>>>()?;
            call_method(&receiver, *method, &args)
        }
        Expr::Unary { op, expr } => {
            let value = eval_expr(expr, context)?;
            Ok(match op {
                UnaryOp::Not => Value::Bool(!value.is_truthy()),
                UnaryOp::Neg => Value::Number(-value.to_number()),
            })
        }
        Expr::Binary { op, left, right } => {
            let left = eval_expr(left, context)?;
            let right = eval_expr(right, context)?;
            Ok(binary(*op, &left, &right))
        }
        Expr::Logical { op, left, right } => {
            let left = eval_expr(left, context)?;
            let take_left = match op {
                LogicalOp::And => !left.is_truthy(),
                LogicalOp::Or => left.is_truthy(),
                LogicalOp::Nullish => !left.is_nullish(),
            };
            if take_left {
                Ok(left)
            } else {
                eval_expr(right, context)
            }
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => {
            if eval_expr(test, context)?.is_truthy() {
                eval_expr(consequent, context)
            } else {
                eval_expr(alternate, context)
            }
        }
        Expr::Template(parts) => render_parts(parts, context).map(Value::Str),
    }
}

/// Concatenate the string forms of each template part.
pub(crate) fn render_parts(parts: &[TemplatePart], context: &serde_json::Value) -> Result<String> {
    let mut out = String::new();
    for part in parts {
        match part {
            TemplatePart::Text(text) => out.push_str(text),
            TemplatePart::Expr(expr) => out.push_str(&eval_expr(expr, context)?.to_string()),
        }
    }
    Ok(out)
}

fn get_property<'a>(object: &Value<'a>, name: &str) -> Result<Value<'a>> {
    match object {
        Value::Undefined | Value::Null => Err(ExprError::type_error(format!(
            "cannot read property '{name}' of {}",
            object.type_name()
        ))),
        Value::Object(map) => {
            let map = *map;
            Ok(map.get(name).map_or(Value::Undefined, Value::from_json))
        }
        Value::Str(s) if name == "length" => Ok(Value::Number(s.chars().count() as f64)),
        Value::Array(items) if name == "length" => Ok(Value::Number(items.len() as f64)),
        _ => Ok(Value::Undefined),
    }
}

fn get_index<'a>(object: &Value<'a>, index: &Value<'a>) -> Result<Value<'a>> {
    if let Value::Number(n) = index {
        let position = (*n >= 0.0 && n.fract() == 0.0).then_some(*n as usize);
        match (object, position) {
            (Value::Array(items), Some(i)) => return Ok(items.get(i).cloned().unwrap_or(Value::Undefined)),
            (Value::Str(s), Some(i)) => {
                return Ok(s
                    .chars()
                    .nth(i)
                    .map_or(Value::Undefined, |c| Value::Str(c.to_string())))
            }
            _ => {}
        }
    }
    get_property(object, &index.to_string())
}

fn call_method<'a>(receiver: &Value<'a>, method: Method, args: &[Value<'a>]) -> Result<Value<'a>> {
    let not_a_function = || {
        ExprError::type_error(format!(
            "{}.{} is not a function",
            receiver.type_name(),
            method.name()
        ))
    };

    match (receiver, method) {
        (Value::Undefined | Value::Null, _) => Err(ExprError::type_error(format!(
            "cannot read property '{}' of {}",
            method.name(),
            receiver.type_name()
        ))),
        (Value::Str(s), Method::ToLowerCase) => Ok(Value::Str(s.to_lowercase())),
        (Value::Str(s), Method::ToUpperCase) => Ok(Value::Str(s.to_uppercase())),
        (Value::Str(s), Method::Trim) => Ok(Value::Str(s.trim().to_string())),
        (Value::Str(s), Method::Includes) => Ok(Value::Bool(s.contains(&arg_string(args)))),
        (Value::Str(s), Method::StartsWith) => Ok(Value::Bool(s.starts_with(&arg_string(args)))),
        (Value::Str(s), Method::EndsWith) => Ok(Value::Bool(s.ends_with(&arg_string(args)))),
        (Value::Array(items), Method::Includes) => {
            let needle = args.first().cloned().unwrap_or(Value::Undefined);
            Ok(Value::Bool(items.iter().any(|item| {
                strict_eq(item, &needle)
                    || matches!((item, &needle), (Value::Number(a), Value::Number(b)) if a.is_nan() && b.is_nan())
            })))
        }
        _ => Err(not_a_function()),
    }
}

fn arg_string(args: &[Value<'_>]) -> String {
    args.first().map_or_else(|| "undefined".to_string(), ToString::to_string)
}

fn binary(op: BinaryOp, left: &Value<'_>, right: &Value<'_>) -> Value<'static> {
    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => Value::Number(left.to_number() - right.to_number()),
        BinaryOp::Mul => Value::Number(left.to_number() * right.to_number()),
        BinaryOp::Div => Value::Number(left.to_number() / right.to_number()),
        BinaryOp::Rem => Value::Number(left.to_number() % right.to_number()),
        BinaryOp::StrictEq => Value::Bool(strict_eq(left, right)),
        BinaryOp::StrictNe => Value::Bool(!strict_eq(left, right)),
        BinaryOp::LooseEq => Value::Bool(loose_eq(left, right)),
        BinaryOp::LooseNe => Value::Bool(!loose_eq(left, right)),
        BinaryOp::Lt => Value::Bool(compare(left, right) == Some(Ordering::Less)),
        BinaryOp::Le => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinaryOp::Gt => Value::Bool(compare(left, right) == Some(Ordering::Greater)),
        BinaryOp::Ge => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        )),
    }
}

fn add(left: &Value<'_>, right: &Value<'_>) -> Value<'static> {
    let (left, right) = (left.to_primitive(), right.to_primitive());
    if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) {
        Value::Str(format!("{left}{right}"))
    } else {
        Value::Number(left.to_number() + right.to_number())
    }
}

fn strict_eq(left: &Value<'_>, right: &Value<'_>) -> bool {
    match (left, right) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Object(a), Value::Object(b)) => std::ptr::eq(*a, *b),
        _ => false,
    }
}

fn loose_eq(left: &Value<'_>, right: &Value<'_>) -> bool {
    match (left, right) {
        (a, b) if a.is_nullish() || b.is_nullish() => a.is_nullish() && b.is_nullish(),
        (Value::Bool(_), _) | (_, Value::Bool(_)) => left.to_number() == right.to_number(),
        (Value::Number(_), Value::Str(_)) | (Value::Str(_), Value::Number(_)) => {
            left.to_number() == right.to_number()
        }
        (Value::Array(_) | Value::Object(_), Value::Array(_) | Value::Object(_)) => strict_eq(left, right),
        (Value::Array(_) | Value::Object(_), _) => loose_eq(&left.to_primitive(), right),
        (_, Value::Array(_) | Value::Object(_)) => loose_eq(left, &right.to_primitive()),
        _ => strict_eq(left, right),
    }
}

/// Relational comparison; `None` when either side is NaN.
fn compare(left: &Value<'_>, right: &Value<'_>) -> Option<Ordering> {
    match (left.to_primitive(), right.to_primitive()) {
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(&b)),
        (a, b) => a.to_number().partial_cmp(&b.to_number()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;
    use serde_json::json;

    fn eval(src: &str, context: &serde_json::Value) -> String {
        let expr = parse_expression(src).unwrap();
        eval_expr(&expr, context).unwrap().to_string()
    }

    #[test]
    fn member_access_and_comparison() {
        let context = json!({ "soc": "MAX32690", "board": { "id": "EvKit_V1" } });
        assert_eq!(eval("context.soc === 'MAX32690'", &context), "true");
        assert_eq!(eval("context.board.id", &context), "EvKit_V1");
        assert_eq!(eval("context.missing", &context), "undefined");
    }

    #[test]
    fn numbers_print_like_javascript() {
        let context = json!({ "n": 4 });
        assert_eq!(eval("context.n * 2", &context), "8");
        assert_eq!(eval("context.n / 8", &context), "0.5");
        assert_eq!(eval("1 / 0", &context), "Infinity");
        assert_eq!(eval("'a' * 2", &context), "NaN");
    }

    #[test]
    fn plus_concatenates_strings() {
        let context = json!({ "name": "blinky", "n": 1 });
        assert_eq!(eval("context.name + '-' + context.n", &context), "blinky-1");
        assert_eq!(eval("context.n + 1", &context), "2");
        assert_eq!(eval("[1, 2] + ''", &context), "1,2");
    }

    #[test]
    fn logical_operators_yield_operands() {
        let context = json!({ "a": "", "b": "fallback", "c": null });
        assert_eq!(eval("context.a || context.b", &context), "fallback");
        assert_eq!(eval("context.b && 'x'", &context), "x");
        assert_eq!(eval("context.c ?? 'none'", &context), "none");
        assert_eq!(eval("context.a ?? 'none'", &context), "");
    }

    #[test]
    fn loose_and_strict_equality() {
        let context = json!({ "n": 1, "s": "1" });
        assert_eq!(eval("context.n == context.s", &context), "true");
        assert_eq!(eval("context.n === context.s", &context), "false");
        assert_eq!(eval("context.missing == null", &context), "true");
        assert_eq!(eval("context.missing === null", &context), "false");
        assert_eq!(eval("true == 1", &context), "true");
    }

    #[test]
    fn relational_comparison() {
        let context = json!({ "v": "10" });
        assert_eq!(eval("context.v > 9", &context), "true");
        assert_eq!(eval("'b' > 'a'", &context), "true");
        assert_eq!(eval("context.missing < 1", &context), "false");
    }

    #[test]
    fn methods() {
        let context = json!({ "soc": "MAX32690", "list": ["a", "b"] });
        assert_eq!(eval("context.soc.toLowerCase()", &context), "max32690");
        assert_eq!(eval("context.soc.startsWith('MAX')", &context), "true");
        assert_eq!(eval("context.list.includes('b')", &context), "true");
        assert_eq!(eval("context.list.length", &context), "2");
        assert_eq!(eval("context.list[1]", &context), "b");
        assert_eq!(eval("'  x '.trim()", &context), "x");
    }

    #[test]
    fn conditional_and_not() {
        let context = json!({ "enabled": false });
        assert_eq!(eval("!context.enabled ? 'off' : 'on'", &context), "off");
    }

    #[test]
    fn nested_template_literal() {
        let context = json!({ "soc": "MAX32690" });
        assert_eq!(eval("`part-${context.soc.toLowerCase()}`", &context), "part-max32690");
    }

    #[test]
    fn object_to_string() {
        let context = json!({ "o": { "a": 1 } });
        assert_eq!(eval("context.o", &context), "[object Object]");
    }

    #[test]
    fn member_of_undefined_is_a_type_error() {
        let expr = parse_expression("context.board.id").unwrap();
        assert!(matches!(
            eval_expr(&expr, &json!({})),
            Err(ExprError::Type { .. })
        ));
    }

    #[test]
    fn method_on_wrong_type_is_a_type_error() {
        let expr = parse_expression("context.n.toLowerCase()").unwrap();
        assert!(matches!(
            eval_expr(&expr, &json!({ "n": 3 })),
            Err(ExprError::Type { .. })
        ));
    }

    #[test]
    fn only_context_resolves() {
        let expr = parse_expression("process.env").unwrap();
        assert_eq!(
            eval_expr(&expr, &json!({})),
            Err(ExprError::UnknownIdentifier("process".into()))
        );
    }
}
