use std::fmt;

use crate::lexer::Span;

/// The set of binary operators the code generator can lower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub fn from_symbol(symbol: char) -> Option<BinOp> {
        match symbol {
            '+' => Some(BinOp::Add),
            '-' => Some(BinOp::Sub),
            '*' => Some(BinOp::Mul),
            '/' => Some(BinOp::Div),
            _ => None,
        }
    }
}

/// A numeric literal as written in the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Integer(i32),
    Float(f64),
}

impl Literal {
    pub fn is_float(self) -> bool {
        matches!(self, Literal::Float(_))
    }
}

/// The closed set of expression forms.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A constant integer or float.
    Literal(Literal),
    /// A named-value lookup.
    Variable(String),
    /// A binary operation, keyed by its source symbol.
    BinaryOp {
        op: char,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// A function call.
    Call { callee: String, args: Vec<Expr> },
}

/// An expression node together with the source it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn literal(value: Literal, span: Span) -> Self {
        Self {
            kind: ExprKind::Literal(value),
            span,
        }
    }

    pub fn variable(name: impl Into<String>, span: Span) -> Self {
        Self {
            kind: ExprKind::Variable(name.into()),
            span,
        }
    }

    /// Joins two operands; the span runs from the left operand to the right.
    pub fn binary(op: char, left: Expr, right: Expr) -> Self {
        let span = left.span.start..right.span.end;
        Self {
            kind: ExprKind::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        }
    }

    pub fn call(callee: impl Into<String>, args: Vec<Expr>, span: Span) -> Self {
        Self {
            kind: ExprKind::Call {
                callee: callee.into(),
                args,
            },
            span,
        }
    }
}

/// Renders the tree as an s-expression: `(+ 2 (* 3 4))`, `(call f 1 x)`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Literal(Literal::Integer(value)) => write!(f, "{}", value),
            ExprKind::Literal(Literal::Float(value)) => write!(f, "{:?}", value),
            ExprKind::Variable(name) => write!(f, "{}", name),
            ExprKind::BinaryOp { op, left, right } => write!(f, "({} {} {})", op, left, right),
            ExprKind::Call { callee, args } => {
                write!(f, "(call {}", callee)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}
