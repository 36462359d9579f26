//! Tokenizer for manifest expressions.

use crate::error::{ExprError, Result};

/// Punctuation and operator tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punct {
    Dot,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Question,
    QuestionQuestion,
    Colon,
    Bang,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEqEq,
    BangEqEq,
    EqEq,
    BangEq,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Number(f64),
    Str(String),
    /// Raw body of a backtick literal, escapes and `${}` still unprocessed.
    Template(String),
    Punct(Punct),
}

/// A token and the byte offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

/// Operators ordered longest first so `===` wins over `==` and `=`.
const PUNCTS: &[(&str, Punct)] = &[
    ("===", Punct::EqEqEq),
    ("!==", Punct::BangEqEq),
    ("==", Punct::EqEq),
    ("!=", Punct::BangEq),
    ("<=", Punct::Le),
    (">=", Punct::Ge),
    ("&&", Punct::AndAnd),
    ("||", Punct::OrOr),
    ("??", Punct::QuestionQuestion),
    (".", Punct::Dot),
    (",", Punct::Comma),
    ("(", Punct::LParen),
    (")", Punct::RParen),
    ("[", Punct::LBracket),
    ("]", Punct::RBracket),
    ("?", Punct::Question),
    (":", Punct::Colon),
    ("!", Punct::Bang),
    ("+", Punct::Plus),
    ("-", Punct::Minus),
    ("*", Punct::Star),
    ("/", Punct::Slash),
    ("%", Punct::Percent),
    ("<", Punct::Lt),
    (">", Punct::Gt),
];

/// Split an expression into tokens. `base` is added to every reported offset.
pub fn tokenize(src: &str, base: usize) -> Result<Vec<Token>> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let offset = base + pos;

        if c.is_ascii_digit() || (c == b'.' && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit)) {
            let start = pos;
            while pos < bytes.len() && (bytes[pos].is_ascii_digit() || bytes[pos] == b'.') {
                pos += 1;
            }
            let text = &src[start..pos];
            let value = text
                .parse::<f64>()
                .map_err(|_| ExprError::syntax(offset, format!("invalid number '{text}'")))?;
            tokens.push(Token {
                kind: TokenKind::Number(value),
                offset,
            });
            continue;
        }

        if c.is_ascii_alphabetic() || c == b'_' || c == b'$' {
            let start = pos;
            while pos < bytes.len()
                && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_' || bytes[pos] == b'$')
            {
                pos += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Ident(src[start..pos].to_string()),
                offset,
            });
            continue;
        }

        if c == b'\'' || c == b'"' {
            let (value, end) = scan_string(src, pos, base)?;
            tokens.push(Token {
                kind: TokenKind::Str(value),
                offset,
            });
            pos = end;
            continue;
        }

        if c == b'`' {
            let end = scan_template_end(src, pos + 1)
                .ok_or_else(|| ExprError::syntax(offset, "unterminated template literal"))?;
            tokens.push(Token {
                kind: TokenKind::Template(src[pos + 1..end].to_string()),
                offset,
            });
            pos = end + 1;
            continue;
        }

        let rest = &src[pos..];
        match PUNCTS.iter().find(|(text, _)| rest.starts_with(text)) {
            Some((text, punct)) => {
                tokens.push(Token {
                    kind: TokenKind::Punct(*punct),
                    offset,
                });
                pos += text.len();
            }
            None => {
                let ch = rest.chars().next().unwrap_or('?');
                return Err(ExprError::syntax(offset, format!("unexpected character '{ch}'")));
            }
        }
    }

    Ok(tokens)
}

/// Scan a quoted string starting at the quote at `start`.
///
/// Returns the unescaped value and the index just past the closing quote.
fn scan_string(src: &str, start: usize, base: usize) -> Result<(String, usize)> {
    let quote = src.as_bytes()[start] as char;
    let mut value = String::new();
    let mut chars = src[start + 1..].char_indices();

    while let Some((i, ch)) = chars.next() {
        if ch == quote {
            return Ok((value, start + 1 + i + ch.len_utf8()));
        }
        if ch == '\\' {
            match chars.next() {
                Some((_, escaped)) => value.push(unescape(escaped)),
                None => break,
            }
        } else {
            value.push(ch);
        }
    }

    Err(ExprError::syntax(base + start, "unterminated string literal"))
}

/// The character a backslash escape stands for.
pub(crate) fn unescape(ch: char) -> char {
    match ch {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}

/// Given the index just past an opening backtick, find the closing backtick.
pub(crate) fn scan_template_end(src: &str, start: usize) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut pos = start;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'`' => return Some(pos),
            b'$' if bytes.get(pos + 1) == Some(&b'{') => {
                pos = scan_interpolation_end(src, pos + 2)? + 1;
            }
            _ => pos += 1,
        }
    }
    None
}

/// Given the index just past `${`, find the matching `}`.
///
/// Braces inside string and template literals do not count.
pub(crate) fn scan_interpolation_end(src: &str, start: usize) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut pos = start;
    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => depth += 1,
            b'}' => {
                if depth == 0 {
                    return Some(pos);
                }
                depth -= 1;
            }
            quote @ (b'\'' | b'"') => {
                pos += 1;
                while pos < bytes.len() && bytes[pos] != quote {
                    if bytes[pos] == b'\\' {
                        pos += 1;
                    }
                    pos += 1;
                }
            }
            b'`' => {
                pos = scan_template_end(src, pos + 1)?;
            }
            _ => {}
        }
        pos += 1;
    }
    None
}
