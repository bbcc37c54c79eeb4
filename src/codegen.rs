use inkwell::builder::BuilderError;
use thiserror::Error;

use crate::ast::Expr;
use crate::compiler::generators::{expression, unit};
use crate::compiler::values::TypedValue;
use crate::compiler::{CompilationContext, LoweredUnit};
use crate::lexer::Span;

#[derive(Debug, Error)]
pub enum CodeGenError {
    #[error("unknown symbol `{name}`")]
    UnknownSymbol { name: String, span: Span },
    #[error("unknown function `{name}`")]
    UnknownFunction { name: String, span: Span },
    #[error("`{callee}` expects {expected} argument(s) but {actual} were supplied")]
    ArityMismatch {
        callee: String,
        expected: usize,
        actual: usize,
        span: Span,
    },
    #[error("invalid binary operator `{op}`")]
    InvalidOperator { op: char, span: Span },
    #[error("`{name}` does not have a numeric signature")]
    UnsupportedSignature { name: String, span: Span },
    #[error("`{name}` is already declared with a different signature")]
    ConflictingDeclaration { name: String },
    #[error("LLVM verification failed: {0}")]
    Verification(String),
    #[error("IR builder failure: {0}")]
    Builder(#[from] BuilderError),
}

impl CodeGenError {
    /// Source range of the node that failed to lower, when there is one.
    pub fn span(&self) -> Option<Span> {
        match self {
            CodeGenError::UnknownSymbol { span, .. }
            | CodeGenError::UnknownFunction { span, .. }
            | CodeGenError::ArityMismatch { span, .. }
            | CodeGenError::InvalidOperator { span, .. }
            | CodeGenError::UnsupportedSignature { span, .. } => Some(span.clone()),
            CodeGenError::ConflictingDeclaration { .. }
            | CodeGenError::Verification(_)
            | CodeGenError::Builder(_) => None,
        }
    }
}

/// Lowers a single node at the builder's current position.
///
/// The builder is only positioned while a unit is being lowered, so outside
/// [`lower_unit`] anything that emits an instruction fails with
/// [`CodeGenError::Builder`].
pub fn lower<'ctx>(
    expr: &Expr,
    ctx: &mut CompilationContext<'ctx>,
) -> Result<TypedValue<'ctx>, CodeGenError> {
    expression::lower_expression(ctx, expr)
}

/// Lowers a root expression into its own function in the module. On failure
/// the module is left as it was before the call.
pub fn lower_unit<'ctx>(
    expr: &Expr,
    ctx: &mut CompilationContext<'ctx>,
) -> Result<LoweredUnit<'ctx>, CodeGenError> {
    unit::compile_unit(ctx, expr)
}
