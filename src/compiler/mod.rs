//! Compiler Module
//!
//! Holds the compilation context: the LLVM module and builder that units are
//! lowered into, and the named-value table consulted by variable references.
//!
//! ## Architecture
//! - `values`: numeric kinds and the values that carry them
//! - `runtime`: declarations of callable functions
//! - `generators`: lowering of expressions and top-level units
//!
//! A context is created by the caller and lives exactly as long as the caller
//! keeps it. Independent compilations use independent contexts.

pub mod generators;
pub mod runtime;
pub mod values;

use std::collections::HashMap;

use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::values::FunctionValue;

use crate::ast::Expr;
use crate::codegen::{self, CodeGenError};
use crate::error::CompileResult;
use crate::parser;
use runtime::{Runtime, Signature};
use values::{NumKind, TypedValue, ValueManager};

/// A root expression lowered into its own function.
#[derive(Debug, Clone, Copy)]
pub struct LoweredUnit<'ctx> {
    pub function: FunctionValue<'ctx>,
    pub value: TypedValue<'ctx>,
}

impl LoweredUnit<'_> {
    pub fn name(&self) -> String {
        self.function.get_name().to_string_lossy().into_owned()
    }
}

pub struct CompilationContext<'ctx> {
    pub(crate) context: &'ctx Context,
    pub(crate) module: Module<'ctx>,
    pub(crate) builder: Builder<'ctx>,
    pub(crate) named_values: HashMap<String, TypedValue<'ctx>>,
    pub(crate) values: ValueManager<'ctx>,
    pub(crate) runtime: Runtime<'ctx>,
    pub(crate) unit_count: usize,
}

impl<'ctx> CompilationContext<'ctx> {
    pub fn new(context: &'ctx Context, module_name: &str) -> Self {
        let values = ValueManager::new(context);
        Self {
            context,
            module: context.create_module(module_name),
            builder: context.create_builder(),
            named_values: HashMap::new(),
            values,
            runtime: Runtime::new(values),
            unit_count: 0,
        }
    }

    pub fn module(&self) -> &Module<'ctx> {
        &self.module
    }

    /// Textual LLVM IR of everything lowered so far.
    pub fn print_to_string(&self) -> String {
        self.module.print_to_string().to_string()
    }

    /// Binds `name` in the named-value table, replacing any earlier binding.
    pub fn bind(&mut self, name: impl Into<String>, value: TypedValue<'ctx>) {
        self.named_values.insert(name.into(), value);
    }

    pub fn bind_int(&mut self, name: impl Into<String>, value: i32) {
        let value = self.values.const_int(value);
        self.bind(name, value);
    }

    pub fn bind_float(&mut self, name: impl Into<String>, value: f64) {
        let value = self.values.const_float(value);
        self.bind(name, value);
    }

    pub fn unbind(&mut self, name: &str) -> Option<TypedValue<'ctx>> {
        self.named_values.remove(name)
    }

    pub fn lookup(&self, name: &str) -> Option<TypedValue<'ctx>> {
        self.named_values.get(name).copied()
    }

    /// Clears the named-value table. Units already in the module stay.
    pub fn reset(&mut self) {
        self.named_values.clear();
    }

    /// Declares `double name(double, ...)` with `arity` parameters.
    pub fn declare_extern(
        &mut self,
        name: &str,
        arity: usize,
    ) -> Result<FunctionValue<'ctx>, CodeGenError> {
        let signature = Signature {
            params: vec![NumKind::Float; arity],
            ret: NumKind::Float,
        };
        self.declare_function(name, &signature)
    }

    pub fn declare_function(
        &mut self,
        name: &str,
        signature: &Signature,
    ) -> Result<FunctionValue<'ctx>, CodeGenError> {
        self.runtime.declare(&self.module, name, signature)
    }

    pub fn lower_unit(&mut self, expr: &Expr) -> Result<LoweredUnit<'ctx>, CodeGenError> {
        codegen::lower_unit(expr, self)
    }

    /// Tokenizes, parses and lowers `source` as one unit.
    pub fn compile_source(&mut self, source: &str) -> CompileResult<LoweredUnit<'ctx>> {
        let expr = parser::parse_program(source)?;
        Ok(self.lower_unit(&expr)?)
    }
}
