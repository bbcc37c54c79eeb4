//! Top-Level Unit Compilation
//!
//! A unit is one root expression lowered into a zero-argument function
//! `__unit_N` that returns the expression's value. The function is created
//! only after the static kind pass succeeds and is deleted again if anything
//! later fails, so the module never holds a half-built unit.

use inkwell::types::BasicType;
use inkwell::values::FunctionValue;

use super::expression::{lower_expression, static_kind};
use crate::ast::Expr;
use crate::codegen::CodeGenError;
use crate::compiler::values::TypedValue;
use crate::compiler::{CompilationContext, LoweredUnit};

pub fn compile_unit<'ctx>(
    ctx: &mut CompilationContext<'ctx>,
    expr: &Expr,
) -> Result<LoweredUnit<'ctx>, CodeGenError> {
    let kind = static_kind(ctx, expr)?;

    // Declared functions may already own a unit name.
    let name = loop {
        let name = format!("__unit_{}", ctx.unit_count);
        if ctx.module.get_function(&name).is_none() {
            break name;
        }
        ctx.unit_count += 1;
    };
    let fn_type = ctx.values.llvm_type(kind).fn_type(&[], false);
    let function = ctx.module.add_function(&name, fn_type, None);
    let entry = ctx.context.append_basic_block(function, "entry");
    ctx.builder.position_at_end(entry);

    let result = compile_body(ctx, function, expr);
    ctx.builder.clear_insertion_position();

    match result {
        Ok(value) => {
            ctx.unit_count += 1;
            Ok(LoweredUnit { function, value })
        }
        Err(err) => {
            // SAFETY: nothing outside this call holds a reference to the
            // function or its instructions.
            unsafe { function.delete() };
            Err(err)
        }
    }
}

fn compile_body<'ctx>(
    ctx: &mut CompilationContext<'ctx>,
    function: FunctionValue<'ctx>,
    expr: &Expr,
) -> Result<TypedValue<'ctx>, CodeGenError> {
    let value = lower_expression(ctx, expr)?;
    ctx.builder.build_return(Some(&value.value))?;

    if !function.verify(false) {
        return Err(CodeGenError::Verification(format!(
            "function '{}' is malformed",
            function.get_name().to_string_lossy()
        )));
    }
    Ok(value)
}
