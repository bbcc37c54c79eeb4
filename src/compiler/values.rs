//! Numeric Kinds and Typed Values
//!
//! Every lowered value travels with its static kind so binary operations can
//! apply the integer/float promotion rule without inspecting IR types.
//!
//! ## Representation
//! - `Int`: LLVM `i32`
//! - `Float`: LLVM `double`

use inkwell::builder::{Builder, BuilderError};
use inkwell::context::Context;
use inkwell::types::{BasicTypeEnum, FloatType, IntType};
use inkwell::values::{BasicValueEnum, FloatValue, IntValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumKind {
    Int,
    Float,
}

impl NumKind {
    /// Result kind of a binary operation: float wins.
    pub fn join(self, other: NumKind) -> NumKind {
        if self == NumKind::Float || other == NumKind::Float {
            NumKind::Float
        } else {
            NumKind::Int
        }
    }
}

/// An IR value handle tagged with its static kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypedValue<'ctx> {
    pub kind: NumKind,
    pub value: BasicValueEnum<'ctx>,
}

impl<'ctx> TypedValue<'ctx> {
    pub fn int(value: IntValue<'ctx>) -> Self {
        Self {
            kind: NumKind::Int,
            value: value.into(),
        }
    }

    pub fn float(value: FloatValue<'ctx>) -> Self {
        Self {
            kind: NumKind::Float,
            value: value.into(),
        }
    }

    /// The folded integer value, if this is an integer constant.
    pub fn as_int_constant(&self) -> Option<i64> {
        match self.kind {
            NumKind::Int => self.value.into_int_value().get_sign_extended_constant(),
            NumKind::Float => None,
        }
    }

    /// The folded float value, if this is a float constant.
    pub fn as_float_constant(&self) -> Option<f64> {
        match self.kind {
            NumKind::Float => self
                .value
                .into_float_value()
                .get_constant()
                .map(|(value, _lossy)| value),
            NumKind::Int => None,
        }
    }
}

/// Value manager for numeric kinds
///
/// Owns the mapping between [`NumKind`] and LLVM types and the conversions
/// between the two kinds.
#[derive(Clone, Copy)]
pub struct ValueManager<'ctx> {
    context: &'ctx Context,
}

impl<'ctx> ValueManager<'ctx> {
    pub fn new(context: &'ctx Context) -> Self {
        Self { context }
    }

    pub fn int_type(&self) -> IntType<'ctx> {
        self.context.i32_type()
    }

    pub fn float_type(&self) -> FloatType<'ctx> {
        self.context.f64_type()
    }

    pub fn llvm_type(&self, kind: NumKind) -> BasicTypeEnum<'ctx> {
        match kind {
            NumKind::Int => self.int_type().into(),
            NumKind::Float => self.float_type().into(),
        }
    }

    /// Maps an LLVM type back to a kind. Only `i32` and `double` qualify.
    pub fn kind_of(&self, ty: BasicTypeEnum<'ctx>) -> Option<NumKind> {
        match ty {
            BasicTypeEnum::IntType(t) if t == self.int_type() => Some(NumKind::Int),
            BasicTypeEnum::FloatType(t) if t == self.float_type() => Some(NumKind::Float),
            _ => None,
        }
    }

    pub fn const_int(&self, value: i32) -> TypedValue<'ctx> {
        TypedValue::int(self.int_type().const_int(value as u64, true))
    }

    pub fn const_float(&self, value: f64) -> TypedValue<'ctx> {
        TypedValue::float(self.float_type().const_float(value))
    }

    /// Converts `value` to `target`. Integers widen by signed conversion,
    /// floats narrow by truncation toward zero.
    pub fn coerce(
        &self,
        builder: &Builder<'ctx>,
        value: TypedValue<'ctx>,
        target: NumKind,
    ) -> Result<TypedValue<'ctx>, BuilderError> {
        match (value.kind, target) {
            (NumKind::Int, NumKind::Float) => {
                let promoted = builder.build_signed_int_to_float(
                    value.value.into_int_value(),
                    self.float_type(),
                    "int_to_f64",
                )?;
                Ok(TypedValue::float(promoted))
            }
            (NumKind::Float, NumKind::Int) => {
                let truncated = builder.build_float_to_signed_int(
                    value.value.into_float_value(),
                    self.int_type(),
                    "f64_to_int",
                )?;
                Ok(TypedValue::int(truncated))
            }
            _ => Ok(value),
        }
    }
}
