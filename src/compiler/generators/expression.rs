//! Expression Lowering
//!
//! One function per expression variant, dispatched from
//! [`lower_expression`]. Operands are always lowered left to right.
//!
//! [`static_kind`] walks the same tree in the same order without emitting
//! anything, so a unit can learn its result kind (and its first error)
//! before its function exists.

use inkwell::values::{BasicMetadataValueEnum, FunctionValue, ValueKind};

use crate::ast::{BinOp, Expr, ExprKind, Literal};
use crate::codegen::CodeGenError;
use crate::compiler::runtime::Signature;
use crate::compiler::values::{NumKind, TypedValue};
use crate::compiler::CompilationContext;
use crate::lexer::Span;

pub fn lower_expression<'ctx>(
    ctx: &mut CompilationContext<'ctx>,
    expr: &Expr,
) -> Result<TypedValue<'ctx>, CodeGenError> {
    match &expr.kind {
        ExprKind::Literal(literal) => Ok(lower_literal(ctx, *literal)),
        ExprKind::Variable(name) => lower_variable(ctx, name, &expr.span),
        ExprKind::BinaryOp { op, left, right } => lower_binary(ctx, *op, left, right, &expr.span),
        ExprKind::Call { callee, args } => lower_call(ctx, callee, args, &expr.span),
    }
}

/// Result kind of `expr`, or the first error lowering it would hit.
pub fn static_kind(ctx: &CompilationContext<'_>, expr: &Expr) -> Result<NumKind, CodeGenError> {
    match &expr.kind {
        ExprKind::Literal(Literal::Integer(_)) => Ok(NumKind::Int),
        ExprKind::Literal(Literal::Float(_)) => Ok(NumKind::Float),
        ExprKind::Variable(name) => Ok(lower_variable(ctx, name, &expr.span)?.kind),
        ExprKind::BinaryOp { op, left, right } => {
            let lhs = static_kind(ctx, left)?;
            let rhs = static_kind(ctx, right)?;
            check_operator(*op, &expr.span)?;
            Ok(lhs.join(rhs))
        }
        ExprKind::Call { callee, args } => {
            let (_, signature) = resolve_callee(ctx, callee, args.len(), &expr.span)?;
            for arg in args {
                static_kind(ctx, arg)?;
            }
            Ok(signature.ret)
        }
    }
}

fn lower_literal<'ctx>(ctx: &CompilationContext<'ctx>, literal: Literal) -> TypedValue<'ctx> {
    match literal {
        Literal::Integer(value) => ctx.values.const_int(value),
        Literal::Float(value) => ctx.values.const_float(value),
    }
}

/// Variables are plain table lookups; nothing is emitted.
fn lower_variable<'ctx>(
    ctx: &CompilationContext<'ctx>,
    name: &str,
    span: &Span,
) -> Result<TypedValue<'ctx>, CodeGenError> {
    ctx.lookup(name).ok_or_else(|| CodeGenError::UnknownSymbol {
        name: name.to_string(),
        span: span.clone(),
    })
}

fn check_operator(op: char, span: &Span) -> Result<BinOp, CodeGenError> {
    BinOp::from_symbol(op).ok_or_else(|| CodeGenError::InvalidOperator {
        op,
        span: span.clone(),
    })
}

fn lower_binary<'ctx>(
    ctx: &mut CompilationContext<'ctx>,
    op: char,
    left: &Expr,
    right: &Expr,
    span: &Span,
) -> Result<TypedValue<'ctx>, CodeGenError> {
    let lhs = lower_expression(ctx, left)?;
    let rhs = lower_expression(ctx, right)?;
    let op = check_operator(op, span)?;

    match lhs.kind.join(rhs.kind) {
        NumKind::Int => {
            let l = lhs.value.into_int_value();
            let r = rhs.value.into_int_value();
            let result = match op {
                BinOp::Add => ctx.builder.build_int_add(l, r, "addtmp")?,
                BinOp::Sub => ctx.builder.build_int_sub(l, r, "subtmp")?,
                BinOp::Mul => ctx.builder.build_int_mul(l, r, "multmp")?,
                BinOp::Div => ctx.builder.build_int_signed_div(l, r, "divtmp")?,
            };
            Ok(TypedValue::int(result))
        }
        NumKind::Float => {
            // promote the integer side, if any
            let l = ctx
                .values
                .coerce(&ctx.builder, lhs, NumKind::Float)?
                .value
                .into_float_value();
            let r = ctx
                .values
                .coerce(&ctx.builder, rhs, NumKind::Float)?
                .value
                .into_float_value();
            let result = match op {
                BinOp::Add => ctx.builder.build_float_add(l, r, "addtmp")?,
                BinOp::Sub => ctx.builder.build_float_sub(l, r, "subtmp")?,
                BinOp::Mul => ctx.builder.build_float_mul(l, r, "multmp")?,
                BinOp::Div => ctx.builder.build_float_div(l, r, "divtmp")?,
            };
            Ok(TypedValue::float(result))
        }
    }
}

/// Finds the declaration of `callee` and checks it accepts `supplied`
/// arguments.
fn resolve_callee<'ctx>(
    ctx: &CompilationContext<'ctx>,
    callee: &str,
    supplied: usize,
    span: &Span,
) -> Result<(FunctionValue<'ctx>, Signature), CodeGenError> {
    let (function, signature) =
        ctx.runtime
            .lookup(&ctx.module, callee)
            .ok_or_else(|| CodeGenError::UnknownFunction {
                name: callee.to_string(),
                span: span.clone(),
            })?;

    let expected = function.count_params() as usize;
    if expected != supplied {
        return Err(CodeGenError::ArityMismatch {
            callee: callee.to_string(),
            expected,
            actual: supplied,
            span: span.clone(),
        });
    }

    let signature = signature.ok_or_else(|| CodeGenError::UnsupportedSignature {
        name: callee.to_string(),
        span: span.clone(),
    })?;
    Ok((function, signature))
}

fn lower_call<'ctx>(
    ctx: &mut CompilationContext<'ctx>,
    callee: &str,
    args: &[Expr],
    span: &Span,
) -> Result<TypedValue<'ctx>, CodeGenError> {
    let (function, signature) = resolve_callee(ctx, callee, args.len(), span)?;

    let mut compiled_args: Vec<BasicMetadataValueEnum<'ctx>> = Vec::with_capacity(args.len());
    for (arg, param) in args.iter().zip(&signature.params) {
        let value = lower_expression(ctx, arg)?;
        let value = ctx.values.coerce(&ctx.builder, value, *param)?;
        compiled_args.push(value.value.into());
    }

    let call = ctx.builder.build_call(function, &compiled_args, "calltmp")?;
    match call.try_as_basic_value() {
        ValueKind::Basic(value) => Ok(TypedValue {
            kind: signature.ret,
            value,
        }),
        ValueKind::Instruction(_) => Err(CodeGenError::UnsupportedSignature {
            name: callee.to_string(),
            span: span.clone(),
        }),
    }
}
