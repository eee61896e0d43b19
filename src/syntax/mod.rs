//! Parsing expressions under a configurable operator table.
//!
//! The pipeline runs strictly left to right: an input string is split
//! into tokens by the [`tokenizer`] using the table's operator names,
//! and the token list is turned into an owned [`Node`] tree by the
//! shunting-yard [`parser`]. [`parse_input`] bundles both steps.
//!
//! The operator table is plain mutable state owned by the caller; it is
//! built once, mutated only between parses, and must outlive every tree
//! parsed under it.
//!
//! [`tokenizer`]: ./tokenizer/index.html
//! [`parser`]: ./parser/index.html
//! [`Node`]: ./repr/enum.Node.html
//! [`parse_input`]: ./fn.parse_input.html

pub mod operators;
pub mod parser;
pub mod repr;
pub mod tokenizer;
mod error;

pub use self::error::{ParseError, Result, TableError};
pub use self::operators::{Arity, Assoc, Operator, OpId, OpTable, Placement};
pub use self::repr::{Node, TreeDisplay};

/// Tokenizes and parses an expression under the given operator table.
pub fn parse_input(ops: &OpTable, input: &str) -> Result<Node> {
    let tokens = tokenizer::tokenize(ops, input)?;
    parser::parse_tokens(ops, &tokens)
}

// Tests
// --------------------------------------------------
