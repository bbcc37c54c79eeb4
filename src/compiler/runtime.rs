//! External Function Declarations
//!
//! Declares callable functions in the module and reads their signatures back
//! when a call is lowered. A declaration is a body-less LLVM function with
//! external linkage, so the module is the single source of truth for what
//! can be called.

use inkwell::module::{Linkage, Module};
use inkwell::types::{BasicMetadataTypeEnum, BasicType};
use inkwell::values::FunctionValue;

use super::values::{NumKind, ValueManager};
use crate::codegen::CodeGenError;

/// The numeric shape of a declared function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<NumKind>,
    pub ret: NumKind,
}

impl Signature {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Runtime manager for external functions
pub struct Runtime<'ctx> {
    values: ValueManager<'ctx>,
}

impl<'ctx> Runtime<'ctx> {
    pub fn new(values: ValueManager<'ctx>) -> Self {
        Self { values }
    }

    /// Declares `name` with the given signature if not already declared.
    /// An existing declaration is returned when its signature matches.
    pub fn declare(
        &self,
        module: &Module<'ctx>,
        name: &str,
        signature: &Signature,
    ) -> Result<FunctionValue<'ctx>, CodeGenError> {
        if let Some(function) = module.get_function(name) {
            return match self.signature(function) {
                Some(existing) if existing == *signature => Ok(function),
                _ => Err(CodeGenError::ConflictingDeclaration {
                    name: name.to_string(),
                }),
            };
        }

        let param_types: Vec<BasicMetadataTypeEnum<'ctx>> = signature
            .params
            .iter()
            .map(|kind| self.values.llvm_type(*kind).into())
            .collect();
        let fn_type = self.values.llvm_type(signature.ret).fn_type(&param_types, false);
        Ok(module.add_function(name, fn_type, Some(Linkage::External)))
    }

    /// Looks up a declared function together with its numeric signature.
    pub fn lookup(
        &self,
        module: &Module<'ctx>,
        name: &str,
    ) -> Option<(FunctionValue<'ctx>, Option<Signature>)> {
        module
            .get_function(name)
            .map(|function| (function, self.signature(function)))
    }

    /// Reads the numeric signature of `function`; `None` if any parameter or
    /// the return type is not `i32`/`double`.
    pub fn signature(&self, function: FunctionValue<'ctx>) -> Option<Signature> {
        let ret = self.values.kind_of(function.get_type().get_return_type()?)?;
        let params = function
            .get_params()
            .iter()
            .map(|param| self.values.kind_of(param.get_type()))
            .collect::<Option<Vec<_>>>()?;
        Some(Signature { params, ret })
    }
}
