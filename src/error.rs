use std::io;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::codegen::CodeGenError;
use crate::lexer::{LexError, Span};
use crate::parser::ParseError;

pub type CompileResult<T> = Result<T, CompileError>;

/// The first failure of a compilation unit, from whichever stage hit it.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    CodeGen(#[from] CodeGenError),
}

impl CompileError {
    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::Lex(err) => Some(err.span()),
            CompileError::Parse(err) => Some(err.span.clone()),
            CompileError::CodeGen(err) => err.span(),
        }
    }

    /// Short name of the error kind, as shown in report headers.
    pub fn kind_name(&self) -> &'static str {
        match self {
            CompileError::Lex(_) => "LexError",
            CompileError::Parse(_) => "ParseError",
            CompileError::CodeGen(err) => match err {
                CodeGenError::UnknownSymbol { .. } => "UnknownSymbol",
                CodeGenError::UnknownFunction { .. } => "UnknownFunction",
                CodeGenError::ArityMismatch { .. } => "ArityMismatch",
                CodeGenError::InvalidOperator { .. } => "InvalidOperator",
                CodeGenError::UnsupportedSignature { .. } => "UnsupportedSignature",
                CodeGenError::ConflictingDeclaration { .. } => "ConflictingDeclaration",
                CodeGenError::Verification(_) => "VerificationError",
                CodeGenError::Builder(_) => "BuilderError",
            },
        }
    }

    fn build_report<'a>(
        &self,
        source: &str,
        filename: &'a str,
        color: bool,
    ) -> Report<'static, (&'a str, Span)> {
        let offset = self.span().map_or(0, |span| span.start.min(source.len()));
        let mut report = Report::build(ReportKind::Error, filename, char_index(source, offset))
            .with_config(Config::default().with_color(color))
            .with_message(format!("{}: {}", self.kind_name(), self));

        if let Some(span) = self.span() {
            let (line, column) = line_col(source, offset);
            let total = source.chars().count();
            if total > 0 {
                // Labels need at least one in-bounds character; end of input
                // points at the last one.
                let start = char_index(source, offset).min(total - 1);
                let end = char_index(source, span.end).clamp(start + 1, total);
                report = report.with_label(
                    Label::new((filename, start..end))
                        .with_message(self.to_string())
                        .with_color(Color::Red),
                );
            }
            report = report.with_note(format!("at {}:{}:{}", filename, line, column));
        }
        report.finish()
    }

    /// Prints the diagnostic to stderr.
    pub fn eprint(&self, source: &str, filename: &str, color: bool) -> io::Result<()> {
        self.build_report(source, filename, color)
            .eprint((filename, Source::from(source)))
    }

    /// Renders the diagnostic without color.
    pub fn render(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self
            .build_report(source, filename, false)
            .write((filename, Source::from(source)), &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// Ariadne positions are counted in characters, spans here in bytes.
fn char_index(source: &str, byte_offset: usize) -> usize {
    source
        .char_indices()
        .take_while(|(i, _)| *i < byte_offset)
        .count()
}

/// 1-based line and column of a byte offset.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;

    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}
