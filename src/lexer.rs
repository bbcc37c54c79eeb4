//! Tokenizer
//!
//! Turns source text into [`Token`]s on demand. The only state is the cursor
//! into the source buffer, so two tokenizers over the same text always yield
//! the same sequence.

use std::fmt;
use std::ops::Range;

use thiserror::Error;

/// Byte range into the source text.
pub type Span = Range<usize>;

/// Reserved words. No grammar production consumes them yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Def,
    Extern,
}

impl Keyword {
    fn from_ident(ident: &str) -> Option<Self> {
        match ident {
            "def" => Some(Keyword::Def),
            "extern" => Some(Keyword::Extern),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Def => "def",
            Keyword::Extern => "extern",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    Integer(i32),
    Float(f64),
    Identifier,
    Keyword(Keyword),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Comma,
    Eof,
}

impl TokenKind {
    /// Binding strength of a binary operator token, with the operator symbol
    /// stored in the AST. `None` for every other token.
    pub fn binary_operator(&self) -> Option<(char, u8)> {
        match self {
            TokenKind::Plus => Some(('+', 20)),
            TokenKind::Minus => Some(('-', 20)),
            TokenKind::Star => Some(('*', 40)),
            TokenKind::Slash => Some(('/', 40)),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Integer(_) => write!(f, "integer literal"),
            TokenKind::Float(_) => write!(f, "float literal"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Keyword(kw) => write!(f, "keyword `{}`", kw.as_str()),
            TokenKind::Plus => write!(f, "`+`"),
            TokenKind::Minus => write!(f, "`-`"),
            TokenKind::Star => write!(f, "`*`"),
            TokenKind::Slash => write!(f, "`/`"),
            TokenKind::LParen => write!(f, "`(`"),
            TokenKind::RParen => write!(f, "`)`"),
            TokenKind::Comma => write!(f, "`,`"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

/// A lexed token. The lexeme borrows from the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub lexeme: &'src str,
    pub span: Span,
}

impl Token<'_> {
    /// Human-friendly description used in diagnostics.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Keyword(kw) => format!("keyword `{}`", kw.as_str()),
            _ => format!("`{}`", self.lexeme),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LexErrorKind {
    InvalidCharacter(char),
    MalformedNumber(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", describe(.kind, .offset))]
pub struct LexError {
    pub kind: LexErrorKind,
    pub offset: usize,
}

fn describe(kind: &LexErrorKind, offset: &usize) -> String {
    match kind {
        LexErrorKind::InvalidCharacter(c) => {
            format!("invalid character '{}' at offset {}", c.escape_debug(), offset)
        }
        LexErrorKind::MalformedNumber(text) => {
            format!("malformed number '{}' at offset {}", text, offset)
        }
    }
}

impl LexError {
    /// Source range covered by the offending text.
    pub fn span(&self) -> Span {
        let len = match &self.kind {
            LexErrorKind::InvalidCharacter(c) => c.len_utf8(),
            LexErrorKind::MalformedNumber(text) => text.len(),
        };
        self.offset..self.offset + len
    }
}

pub struct Tokenizer<'src> {
    source: &'src str,
    pos: usize,
}

impl<'src> Tokenizer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self { source, pos: 0 }
    }

    /// Byte offset of the cursor.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.source[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Skip whitespace and `#` line comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => self.pos += c.len_utf8(),
                Some('#') => self.bump_while(|c| c != '\n' && c != '\r'),
                _ => return,
            }
        }
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token<'src> {
        Token {
            kind,
            lexeme: &self.source[start..self.pos],
            span: start..self.pos,
        }
    }

    /// Returns the next token. Past the end of input this keeps returning
    /// `Eof`. After an error the cursor stays on the offending text.
    pub fn next_token(&mut self) -> Result<Token<'src>, LexError> {
        self.skip_trivia();
        let start = self.pos;

        let Some(c) = self.peek() else {
            return Ok(self.token(TokenKind::Eof, start));
        };

        if c.is_ascii_digit() {
            return self.number(start);
        }

        if c.is_ascii_alphabetic() {
            self.bump_while(|c| c.is_ascii_alphanumeric());
            let kind = match Keyword::from_ident(&self.source[start..self.pos]) {
                Some(kw) => TokenKind::Keyword(kw),
                None => TokenKind::Identifier,
            };
            return Ok(self.token(kind, start));
        }

        let kind = match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            other => {
                return Err(LexError {
                    kind: LexErrorKind::InvalidCharacter(other),
                    offset: start,
                })
            }
        };
        self.pos += 1;
        Ok(self.token(kind, start))
    }

    fn number(&mut self, start: usize) -> Result<Token<'src>, LexError> {
        self.bump_while(|c| c.is_ascii_digit());

        if self.peek() != Some('.') {
            let value = self.source[start..self.pos]
                .parse::<i32>()
                .map_err(|_| self.malformed(start, self.pos))?;
            return Ok(self.token(TokenKind::Integer(value), start));
        }

        if !self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            // the dangling '.' belongs to the error
            return Err(self.malformed(start, self.pos + 1));
        }

        self.pos += 1;
        self.bump_while(|c| c.is_ascii_digit());
        let value = self.source[start..self.pos]
            .parse::<f64>()
            .map_err(|_| self.malformed(start, self.pos))?;
        Ok(self.token(TokenKind::Float(value), start))
    }

    fn malformed(&mut self, start: usize, end: usize) -> LexError {
        self.pos = start;
        LexError {
            kind: LexErrorKind::MalformedNumber(self.source[start..end].to_string()),
            offset: start,
        }
    }
}

/// Collects every token up to and including the first `Eof`.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, LexError> {
    let mut tokenizer = Tokenizer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
