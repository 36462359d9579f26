//! Template literals: text with `${expression}` interpolations.

use crate::ast::TemplatePart;
use crate::error::Result;
use crate::eval::render_parts;
use crate::parser::parse_template_body;

/// A parsed template, reusable across contexts.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    parts: Vec<TemplatePart>,
}

impl Template {
    /// Parse template text. The whole input is the body of a template
    /// literal, so `${...}` interpolates and `` \` `` and `\${` escape.
    pub fn parse(src: &str) -> Result<Self> {
        Ok(Self {
            parts: parse_template_body(src, 0)?,
        })
    }

    /// True when the template has no interpolations.
    pub fn is_literal(&self) -> bool {
        self.parts
            .iter()
            .all(|part| matches!(part, TemplatePart::Text(_)))
    }

    pub fn parts(&self) -> &[TemplatePart] {
        &self.parts
    }

    /// Render against a context object bound as `context`.
    pub fn render(&self, context: &serde_json::Value) -> Result<String> {
        render_parts(&self.parts, context)
    }
}

/// Evaluate `template` as a template literal with `context` in scope.
///
/// ```
/// use serde_json::json;
/// use socgen_expr::eval_nested_template_literals;
///
/// let context = json!({ "soc": "MAX32690" });
/// let out = eval_nested_template_literals("${context.soc === 'MAX32690'}", &context).unwrap();
/// assert_eq!(out, "true");
/// ```
pub fn eval_nested_template_literals(template: &str, context: &serde_json::Value) -> Result<String> {
    Template::parse(template)?.render(context)
}
