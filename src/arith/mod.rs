//! The arithmetic client layer: stock operator tables, numeric
//! evaluation, and the predefined simplification rules.

pub mod context;
pub mod eval;
pub mod rules;

pub use self::context::{context, extended_context};
pub use self::eval::{eval, EvalError};
pub use self::rules::{predefined, transform_input, ANS_VAR};
