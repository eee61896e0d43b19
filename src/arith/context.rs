//! The stock operator tables for arithmetic.
//!
//! [`context`] registers the default calculator operators, with `*` as
//! the glue op so that `2x` and `2(3+4)` parse as products.
//! [`extended_context`] adds the comparison operators used by rewrite
//! rule constraints; it extends the default table without disturbing
//! any existing id, so trees parsed in one table evaluate in the other.
//!
//! [`context`]: ./fn.context.html
//! [`extended_context`]: ./fn.extended_context.html

use syntax::operators::{Arity, Assoc, Operator, OpTable, Placement};

/// Builds the default arithmetic operator table.
pub fn context() -> OpTable {
    let mut ops = OpTable::new();
    ops.add_ops(vec![
        Operator::prefix("$", 0),
        Operator::infix("+", 2, Assoc::Left),
        Operator::infix("-", 2, Assoc::Left),
        Operator::infix("*", 3, Assoc::Left),
        Operator::infix("/", 3, Assoc::Left),
        Operator::infix("^", 4, Assoc::Right),
        Operator::infix("C", 1, Assoc::Left),
        Operator::infix("mod", 1, Assoc::Left),
        Operator::prefix("-", 6),
        Operator::prefix("+", 6),
        Operator::postfix("!", 5),
        Operator::postfix("%", 5),
        Operator::function("exp", Arity::Fixed(1)),
        Operator::function("root", Arity::Fixed(2)),
        Operator::function("sqrt", Arity::Fixed(1)),
        Operator::function("log", Arity::Fixed(2)),
        Operator::function("ln", Arity::Fixed(1)),
        Operator::function("ld", Arity::Fixed(1)),
        Operator::function("lg", Arity::Fixed(1)),
        Operator::function("sin", Arity::Fixed(1)),
        Operator::function("cos", Arity::Fixed(1)),
        Operator::function("tan", Arity::Fixed(1)),
        Operator::function("asin", Arity::Fixed(1)),
        Operator::function("acos", Arity::Fixed(1)),
        Operator::function("atan", Arity::Fixed(1)),
        Operator::function("sinh", Arity::Fixed(1)),
        Operator::function("cosh", Arity::Fixed(1)),
        Operator::function("tanh", Arity::Fixed(1)),
        Operator::function("asinh", Arity::Fixed(1)),
        Operator::function("acosh", Arity::Fixed(1)),
        Operator::function("atanh", Arity::Fixed(1)),
        Operator::function("max", Arity::Dynamic),
        Operator::function("min", Arity::Dynamic),
        Operator::function("abs", Arity::Fixed(1)),
        Operator::function("ceil", Arity::Fixed(1)),
        Operator::function("floor", Arity::Fixed(1)),
        Operator::function("round", Arity::Fixed(1)),
        Operator::function("trunc", Arity::Fixed(1)),
        Operator::function("frac", Arity::Fixed(1)),
        Operator::function("sum", Arity::Dynamic),
        Operator::function("prod", Arity::Dynamic),
        Operator::function("avg", Arity::Dynamic),
        Operator::function("rand", Arity::Fixed(2)),
        Operator::function("gamma", Arity::Fixed(1)),
        Operator::function("fib", Arity::Fixed(1)),
        Operator::constant("pi"),
        Operator::constant("e"),
        Operator::constant("phi"),
        Operator::constant("clight"),
        Operator::constant("csound"),
    ]).expect("the default operator table is consistent");

    let glue = ops.lookup_op("*", Placement::Infix).unwrap();
    ops.set_glue_op(glue).expect("the glue op is a binary infix");
    ops
}

/// Builds the constraint table: the default operators plus comparisons.
pub fn extended_context() -> OpTable {
    let mut ops = context();
    ops.add_ops(vec![
        Operator::infix("==", 0, Assoc::Left),
        Operator::infix("!=", 0, Assoc::Left),
        Operator::infix("<=", 0, Assoc::Left),
        Operator::infix(">=", 0, Assoc::Left),
        Operator::infix("<", 0, Assoc::Left),
        Operator::infix(">", 0, Assoc::Left),
    ]).expect("the comparison operators are consistent");
    ops
}

// Tests
// --------------------------------------------------
