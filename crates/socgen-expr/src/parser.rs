//! Recursive-descent parser.
//!
//! Precedence, loosest first: conditional, `||`/`??`, `&&`, equality,
//! relational, additive, multiplicative, unary, postfix (member, index,
//! method call), primary.

use crate::ast::{BinaryOp, Expr, LogicalOp, Method, TemplatePart, UnaryOp};
use crate::error::{ExprError, Result};
use crate::lexer::{scan_interpolation_end, tokenize, unescape, Punct, Token, TokenKind};

/// Parse a single expression such as `context.soc === 'MAX32690'`.
pub fn parse_expression(src: &str) -> Result<Expr> {
    parse_at(src, 0)
}

/// Parse an expression whose text starts at byte `base` of some larger input.
pub(crate) fn parse_at(src: &str, base: usize) -> Result<Expr> {
    let tokens = tokenize(src, base)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: base + src.len(),
    };
    let expr = parser.conditional()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(ExprError::syntax(token.offset, "unexpected trailing input")),
    }
}

/// Split the body of a template literal into text and interpolations.
///
/// `base` is the byte offset of the body within the enclosing input.
pub(crate) fn parse_template_body(body: &str, base: usize) -> Result<Vec<TemplatePart>> {
    let mut parts = Vec::new();
    let mut text = String::new();
    let mut chars = body.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, escaped)) => text.push(unescape(escaped)),
                None => text.push('\\'),
            },
            '$' if body[i + 1..].starts_with('{') => {
                let start = i + 2;
                let end = scan_interpolation_end(body, start)
                    .ok_or_else(|| ExprError::syntax(base + i, "unterminated '${'"))?;
                let source = &body[start..end];
                if source.trim().is_empty() {
                    return Err(ExprError::syntax(base + i, "empty interpolation"));
                }
                if !text.is_empty() {
                    parts.push(TemplatePart::Text(std::mem::take(&mut text)));
                }
                parts.push(TemplatePart::Expr(parse_at(source, base + start)?));
                while chars.peek().is_some_and(|(j, _)| *j <= end) {
                    chars.next();
                }
            }
            _ => text.push(ch),
        }
    }

    if !text.is_empty() {
        parts.push(TemplatePart::Text(text));
    }
    Ok(parts)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Offset reported for errors at end of input.
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_punct(&self) -> Option<Punct> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Punct(p),
                ..
            }) => Some(*p),
            _ => None,
        }
    }

    fn offset(&self) -> usize {
        self.peek().map_or(self.end, |t| t.offset)
    }

    fn eat(&mut self, punct: Punct) -> bool {
        if self.peek_punct() == Some(punct) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, punct: Punct, what: &str) -> Result<()> {
        if self.eat(punct) {
            Ok(())
        } else {
            Err(ExprError::syntax(self.offset(), format!("expected {what}")))
        }
    }

    fn conditional(&mut self) -> Result<Expr> {
        let test = self.logical_or()?;
        if !self.eat(Punct::Question) {
            return Ok(test);
        }
        let consequent = self.conditional()?;
        self.expect(Punct::Colon, "':' in conditional")?;
        let alternate = self.conditional()?;
        Ok(Expr::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    fn logical_or(&mut self) -> Result<Expr> {
        let mut left = self.logical_and()?;
        loop {
            let op = match self.peek_punct() {
                Some(Punct::OrOr) => LogicalOp::Or,
                Some(Punct::QuestionQuestion) => LogicalOp::Nullish,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.logical_and()?;
            left = Expr::Logical {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn logical_and(&mut self) -> Result<Expr> {
        let mut left = self.equality()?;
        while self.eat(Punct::AndAnd) {
            let right = self.equality()?;
            left = Expr::Logical {
                op: LogicalOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn equality(&mut self) -> Result<Expr> {
        self.binary_level(Self::relational, |p| match p {
            Punct::EqEqEq => Some(BinaryOp::StrictEq),
            Punct::BangEqEq => Some(BinaryOp::StrictNe),
            Punct::EqEq => Some(BinaryOp::LooseEq),
            Punct::BangEq => Some(BinaryOp::LooseNe),
            _ => None,
        })
    }

    fn relational(&mut self) -> Result<Expr> {
        self.binary_level(Self::additive, |p| match p {
            Punct::Lt => Some(BinaryOp::Lt),
            Punct::Le => Some(BinaryOp::Le),
            Punct::Gt => Some(BinaryOp::Gt),
            Punct::Ge => Some(BinaryOp::Ge),
            _ => None,
        })
    }

    fn additive(&mut self) -> Result<Expr> {
        self.binary_level(Self::multiplicative, |p| match p {
            Punct::Plus => Some(BinaryOp::Add),
            Punct::Minus => Some(BinaryOp::Sub),
            _ => None,
        })
    }

    fn multiplicative(&mut self) -> Result<Expr> {
        self.binary_level(Self::unary, |p| match p {
            Punct::Star => Some(BinaryOp::Mul),
            Punct::Slash => Some(BinaryOp::Div),
            Punct::Percent => Some(BinaryOp::Rem),
            _ => None,
        })
    }

    /// One left-associative binary precedence level.
    fn binary_level(
        &mut self,
        next: fn(&mut Self) -> Result<Expr>,
        op_for: fn(Punct) -> Option<BinaryOp>,
    ) -> Result<Expr> {
        let mut left = next(self)?;
        while let Some(op) = self.peek_punct().and_then(op_for) {
            self.pos += 1;
            let right = next(self)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr> {
        let op = match self.peek_punct() {
            Some(Punct::Bang) => UnaryOp::Not,
            Some(Punct::Minus) => UnaryOp::Neg,
            _ => return self.postfix(),
        };
        self.pos += 1;
        let expr = self.unary()?;
        Ok(Expr::Unary {
            op,
            expr: Box::new(expr),
        })
    }

    fn postfix(&mut self) -> Result<Expr> {
        let mut expr = self.primary()?;
        loop {
            if self.eat(Punct::Dot) {
                let offset = self.offset();
                let name = match self.peek() {
                    Some(Token {
                        kind: TokenKind::Ident(name),
                        ..
                    }) => name.clone(),
                    _ => return Err(ExprError::syntax(offset, "expected property name after '.'")),
                };
                self.pos += 1;

                if self.eat(Punct::LParen) {
                    let method = Method::from_name(&name).ok_or_else(|| {
                        ExprError::syntax(offset, format!("method '{name}' is not allowed"))
                    })?;
                    let args = self.arguments()?;
                    if args.len() != method.arity() {
                        return Err(ExprError::syntax(
                            offset,
                            format!(
                                "'{}' takes {} argument(s), got {}",
                                method.name(),
                                method.arity(),
                                args.len()
                            ),
                        ));
                    }
                    expr = Expr::Call {
                        receiver: Box::new(expr),
                        method,
                        args,
                    };
                } else {
                    expr = Expr::Member {
                        object: Box::new(expr),
                        property: name,
                    };
                }
            } else if self.eat(Punct::LBracket) {
                let index = self.conditional()?;
                self.expect(Punct::RBracket, "']'")?;
                expr = Expr::Index {
                    object: Box::new(expr),
                    index: Box::new(index),
                };
            } else {
                return Ok(expr);
            }
        }
    }

    /// Comma-separated arguments after an opening parenthesis.
    fn arguments(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if self.eat(Punct::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.conditional()?);
            if self.eat(Punct::RParen) {
                return Ok(args);
            }
            self.expect(Punct::Comma, "',' or ')'")?;
        }
    }

    fn primary(&mut self) -> Result<Expr> {
        let offset = self.offset();
        let token = match self.tokens.get(self.pos) {
            Some(token) => token.kind.clone(),
            None => return Err(ExprError::syntax(offset, "unexpected end of expression")),
        };
        self.pos += 1;

        match token {
            TokenKind::Number(n) => Ok(Expr::Number(n)),
            TokenKind::Str(s) => Ok(Expr::Str(s)),
            TokenKind::Template(body) => Ok(Expr::Template(parse_template_body(&body, offset + 1)?)),
            TokenKind::Ident(name) => Ok(match name.as_str() {
                "true" => Expr::Bool(true),
                "false" => Expr::Bool(false),
                "null" => Expr::Null,
                "undefined" => Expr::Undefined,
                _ => Expr::Ident(name),
            }),
            TokenKind::Punct(Punct::LParen) => {
                let expr = self.conditional()?;
                self.expect(Punct::RParen, "')'")?;
                Ok(expr)
            }
            TokenKind::Punct(Punct::LBracket) => {
                let mut items = Vec::new();
                if self.eat(Punct::RBracket) {
                    return Ok(Expr::Array(items));
                }
                loop {
                    items.push(self.conditional()?);
                    if self.eat(Punct::RBracket) {
                        return Ok(Expr::Array(items));
                    }
                    self.expect(Punct::Comma, "',' or ']'")?;
                }
            }
            TokenKind::Punct(p) => Err(ExprError::syntax(offset, format!("unexpected token {p:?}"))),
        }
    }
}
