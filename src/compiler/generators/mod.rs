//! Code Generators Module
//!
//! - `expression`: lowering of each expression variant, and the static kind
//!   pass that runs before any IR is emitted
//! - `unit`: wrapping a root expression in its own function

pub mod expression;
pub mod unit;
