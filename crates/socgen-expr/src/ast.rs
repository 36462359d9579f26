//! Expression tree.

/// A parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// String literal.
    Str(String),
    /// Numeric literal.
    Number(f64),
    /// `true` / `false`.
    Bool(bool),
    /// `null`.
    Null,
    /// `undefined`.
    Undefined,
    /// A bare name; only `context` resolves.
    Ident(String),
    /// `[a, b, ...]`
    Array(Vec<Expr>),
    /// `object.property`
    Member { object: Box<Expr>, property: String },
    /// `object[index]`
    Index { object: Box<Expr>, index: Box<Expr> },
    /// `receiver.method(args...)` for a whitelisted method.
    Call {
        receiver: Box<Expr>,
        method: Method,
        args: Vec<Expr>,
    },
    Unary { op: UnaryOp, expr: Box<Expr> },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Short-circuiting operators, which yield one of their operands.
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `test ? consequent : alternate`
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    /// A nested template literal.
    Template(Vec<TemplatePart>),
}

/// A segment of a template literal.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    Text(String),
    Expr(Expr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `!`
    Not,
    /// `-`
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    /// `===`
    StrictEq,
    /// `!==`
    StrictNe,
    /// `==`
    LooseEq,
    /// `!=`
    LooseNe,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    /// `??`
    Nullish,
}

/// Methods callable from an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    ToLowerCase,
    ToUpperCase,
    Trim,
    Includes,
    StartsWith,
    EndsWith,
}

impl Method {
    /// Resolve a method name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "toLowerCase" => Some(Method::ToLowerCase),
            "toUpperCase" => Some(Method::ToUpperCase),
            "trim" => Some(Method::Trim),
            "includes" => Some(Method::Includes),
            "startsWith" => Some(Method::StartsWith),
            "endsWith" => Some(Method::EndsWith),
            _ => None,
        }
    }

    /// Number of arguments the method takes.
    pub fn arity(&self) -> usize {
        match self {
            Method::ToLowerCase | Method::ToUpperCase | Method::Trim => 0,
            Method::Includes | Method::StartsWith | Method::EndsWith => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Method::ToLowerCase => "toLowerCase",
            Method::ToUpperCase => "toUpperCase",
            Method::Trim => "trim",
            Method::Includes => "includes",
            Method::StartsWith => "startsWith",
            Method::EndsWith => "endsWith",
        }
    }
}
