use thiserror::Error;

use crate::ast::{Expr, Literal};
use crate::error::CompileResult;
use crate::lexer::{Span, Token, TokenKind, Tokenizer};

const EXPRESSION_START: &[&str] = &["integer literal", "float literal", "identifier", "`(`"];

/// Deepest expression the parser accepts. Printing and lowering recurse once
/// per tree level, so this bounds their stack use as well.
pub const MAX_NESTING: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    Unexpected {
        expected: Vec<&'static str>,
        found: String,
    },
    TooDeep,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", describe(.kind, .span))]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl ParseError {
    /// What the parser would have accepted. Empty for nesting errors.
    pub fn expected(&self) -> &[&'static str] {
        match &self.kind {
            ParseErrorKind::Unexpected { expected, .. } => expected,
            ParseErrorKind::TooDeep => &[],
        }
    }

    pub fn found(&self) -> Option<&str> {
        match &self.kind {
            ParseErrorKind::Unexpected { found, .. } => Some(found),
            ParseErrorKind::TooDeep => None,
        }
    }
}

fn describe(kind: &ParseErrorKind, span: &Span) -> String {
    match kind {
        ParseErrorKind::Unexpected { expected, found } => {
            let expected = match expected.as_slice() {
                [] => "nothing".to_string(),
                [single] => single.to_string(),
                [init @ .., last] => format!("one of {} or {}", init.join(", "), last),
            };
            format!("expected {} but found {} at offset {}", expected, found, span.start)
        }
        ParseErrorKind::TooDeep => format!(
            "expression nested deeper than {} levels at offset {}",
            MAX_NESTING, span.start
        ),
    }
}

/// Recursive-descent parser with one token of lookahead.
pub struct Parser<'src> {
    tokens: Tokenizer<'src>,
    current: Token<'src>,
    depth: usize,
}

/// A parsed subtree and its height.
type Parsed = (Expr, usize);

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            tokens: Tokenizer::new(source),
            current: Token {
                kind: TokenKind::Eof,
                lexeme: "",
                span: 0..0,
            },
            depth: 0,
        }
    }

    /// Parses the whole input as a single expression.
    pub fn parse(mut self) -> CompileResult<Expr> {
        self.advance()?;
        let (expr, _) = self.parse_expression()?;
        if self.current.kind != TokenKind::Eof {
            return Err(self.unexpected(&["`+`", "`-`", "`*`", "`/`", "end of input"]));
        }
        Ok(expr)
    }

    fn advance(&mut self) -> CompileResult<()> {
        self.current = self.tokens.next_token()?;
        Ok(())
    }

    fn unexpected(&self, expected: &[&'static str]) -> crate::error::CompileError {
        ParseError {
            kind: ParseErrorKind::Unexpected {
                expected: expected.to_vec(),
                found: self.current.describe(),
            },
            span: self.current.span.clone(),
        }
        .into()
    }

    fn too_deep(span: Span) -> crate::error::CompileError {
        ParseError {
            kind: ParseErrorKind::TooDeep,
            span,
        }
        .into()
    }

    /// Height of a new node over children of height `children`.
    fn node_height(children: usize, span: &Span) -> CompileResult<usize> {
        let height = children + 1;
        if height > MAX_NESTING {
            return Err(Self::too_deep(span.clone()));
        }
        Ok(height)
    }

    fn expect(&mut self, kind: TokenKind, description: &'static str) -> CompileResult<Span> {
        if self.current.kind != kind {
            return Err(self.unexpected(&[description]));
        }
        let span = self.current.span.clone();
        self.advance()?;
        Ok(span)
    }

    fn parse_expression(&mut self) -> CompileResult<Parsed> {
        if self.depth == MAX_NESTING {
            return Err(Self::too_deep(self.current.span.clone()));
        }
        self.depth += 1;
        let (lhs, height) = self.parse_primary()?;
        let parsed = self.parse_binary_rhs(0, lhs, height)?;
        self.depth -= 1;
        Ok(parsed)
    }

    /// Precedence climbing: folds operators binding at least `min_prec`
    /// onto `lhs`, left to right.
    fn parse_binary_rhs(
        &mut self,
        min_prec: u8,
        mut lhs: Expr,
        mut lhs_height: usize,
    ) -> CompileResult<Parsed> {
        loop {
            let Some((op, prec)) = self.current.kind.binary_operator() else {
                return Ok((lhs, lhs_height));
            };
            if prec < min_prec {
                return Ok((lhs, lhs_height));
            }
            let op_span = self.current.span.clone();
            self.advance()?;

            let (mut rhs, mut rhs_height) = self.parse_primary()?;
            if let Some((_, next_prec)) = self.current.kind.binary_operator() {
                if next_prec > prec {
                    (rhs, rhs_height) = self.parse_binary_rhs(prec + 1, rhs, rhs_height)?;
                }
            }

            lhs_height = Self::node_height(lhs_height.max(rhs_height), &op_span)?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn parse_primary(&mut self) -> CompileResult<Parsed> {
        let span = self.current.span.clone();
        match self.current.kind {
            TokenKind::Integer(value) => {
                self.advance()?;
                Ok((Expr::literal(Literal::Integer(value), span), 1))
            }
            TokenKind::Float(value) => {
                self.advance()?;
                Ok((Expr::literal(Literal::Float(value), span), 1))
            }
            TokenKind::Identifier => self.parse_identifier(),
            TokenKind::LParen => {
                self.advance()?;
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen, "`)`")?;
                Ok(inner)
            }
            _ => Err(self.unexpected(EXPRESSION_START)),
        }
    }

    /// A variable reference, or a call when the name is directly followed by `(`.
    fn parse_identifier(&mut self) -> CompileResult<Parsed> {
        let name = self.current.lexeme;
        let start = self.current.span.start;
        let name_span = self.current.span.clone();
        self.advance()?;

        if self.current.kind != TokenKind::LParen {
            return Ok((Expr::variable(name, name_span), 1));
        }
        self.advance()?;

        let mut args = Vec::new();
        let mut tallest = 0;
        if self.current.kind != TokenKind::RParen {
            loop {
                let (arg, height) = self.parse_expression()?;
                args.push(arg);
                tallest = tallest.max(height);
                match self.current.kind {
                    TokenKind::RParen => break,
                    TokenKind::Comma => self.advance()?,
                    _ => return Err(self.unexpected(&["`,`", "`)`"])),
                }
            }
        }
        let close = self.expect(TokenKind::RParen, "`)`")?;

        let span = start..close.end;
        let height = Self::node_height(tallest, &span)?;
        Ok((Expr::call(name, args, span), height))
    }
}

pub fn parse_program(source: &str) -> CompileResult<Expr> {
    Parser::new(source).parse()
}
