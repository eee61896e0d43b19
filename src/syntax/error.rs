//! Error types for the syntax layer.
//!
//! Errors are flat enumerations surfaced through return values, never
//! panics. Every kind carries a stable human-readable string suitable
//! for direct display at a prompt; a failed operation is fatal to that
//! operation only, and the caller resumes with the next input.

use std::error::Error;
use std::fmt;

/// A type alias for results with possible `ParseError`s.
pub type Result<T> = ::std::result::Result<T, ParseError>;

/// Everything that can go wrong while tokenizing or parsing.
#[derive(Debug)]
#[derive(Clone, Copy)]
#[derive(PartialEq, Eq)]
pub enum ParseError {
    /// The tokenizer produced more tokens than its buffer holds.
    MaxTokensExceeded,
    /// A parser stack overflowed; the expression nests too deeply.
    StackExceeded,
    /// Two sub-expressions without a connecting operator and no glue op.
    UnexpectedSubExpression,
    /// An opening parenthesis was never closed.
    ExcessOpeningParen,
    /// A closing parenthesis without a matching opening one.
    ExcessClosingParen,
    /// A delimiter outside the parameter list of a function.
    UnexpectedDelimiter,
    /// More than one tree remained after all operators were applied.
    MissingOperator,
    /// An operator had fewer operands available than it requires.
    MissingOperand,
    /// Allocation failed. Retained for interface parity.
    OutOfMemory,
    /// No overload of a function accepts the number of operands found.
    FunctionWrongArity,
    /// A parameter list grew past the supported operand count.
    ChildrenExceeded,
    /// The input contained no expression at all.
    Empty,
    /// Structurally malformed input, e.g. a rewrite rule without `->`.
    ArgsMalformed,
}

/// Inconsistent operator registrations.
#[derive(Debug)]
#[derive(Clone, Copy)]
#[derive(PartialEq, Eq)]
pub enum TableError {
    /// The (name, placement) or (name, arity) slot is already taken.
    NameClash,
    /// The operator breaks a table invariant, e.g. an infix whose
    /// precedence matches an existing infix of different associativity,
    /// or a glue op that is not a binary infix.
    InvariantViolation,
}

// ParseError
// --------------------------------------------------

impl ParseError {
    /// The display string of the error.
    pub fn as_str(&self) -> &'static str {
        match *self {
            ParseError::MaxTokensExceeded => "Max. Tokens exceeded",
            ParseError::StackExceeded => "Stack exceeded",
            ParseError::UnexpectedSubExpression => "Unexpected Subexpression",
            ParseError::ExcessOpeningParen => "Missing closing parenthesis",
            ParseError::ExcessClosingParen => "Unexpected closing parenthesis",
            ParseError::UnexpectedDelimiter => "Unexpected delimiter",
            ParseError::MissingOperator => "Unexpected operand",
            ParseError::MissingOperand => "Missing operand",
            ParseError::OutOfMemory => "Out of memory",
            ParseError::FunctionWrongArity => "Wrong number of operands of function",
            ParseError::ChildrenExceeded => "Exceeded maximum number of operands of function",
            ParseError::Empty => "Empty Expression",
            ParseError::ArgsMalformed => "Arguments malformed",
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error for ParseError {}

// TableError
// --------------------------------------------------

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            TableError::NameClash => f.write_str("Name clash with a present operator"),
            TableError::InvariantViolation => f.write_str("Operator violates a table invariant"),
        }
    }
}

impl Error for TableError {}
