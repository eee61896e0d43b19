//! A registry of operators for the parser.
//!
//! An [`Operator`] tells the parser how a named symbol behaves: where it
//! is placed relative to its operands, how many operands it takes, how
//! tightly it binds, and how it associates. Operators live in an
//! [`OpTable`], which hands out [`OpId`]s: stable indices that trees
//! carry instead of references, so the table may keep growing without
//! invalidating any tree built against it.
//!
//! Functions may be overloaded: several functions can share a name as
//! long as their arities differ, and one of them may be variadic
//! ([`Arity::Dynamic`]). All other placements key operators on
//! (name, placement) alone.
//!
//! [`Operator`]: ./struct.Operator.html
//! [`OpTable`]: ./struct.OpTable.html
//! [`OpId`]: ./struct.OpId.html
//! [`Arity::Dynamic`]: ./enum.Arity.html

use syntax::error::TableError;

/// The precedence assigned to functions, above every user precedence,
/// so that an open function application reduces before any infix pops.
pub const MAX_PRECEDENCE: u8 = ::std::u8::MAX;

/// Where an operator sits relative to its operands.
///
/// Constants are functions of arity zero and have no placement of their
/// own; they appear in trees as operator nodes without children.
#[derive(Debug)]
#[derive(Clone, Copy)]
#[derive(PartialEq, Eq)]
pub enum Placement {
    Prefix,
    Infix,
    Postfix,
    Function,
}

/// The number of operands an operator takes.
///
/// `Dynamic` marks a variadic function; the concrete operand count of
/// each application is fixed by the parser while counting arguments.
#[derive(Debug)]
#[derive(Clone, Copy)]
#[derive(PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    Dynamic,
}

/// Grouping direction of an infix operator among equals.
#[derive(Debug)]
#[derive(Clone, Copy)]
#[derive(PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

/// A parsing specification for a single named symbol.
#[derive(Debug)]
#[derive(Clone)]
#[derive(PartialEq, Eq)]
pub struct Operator {
    name: String,
    placement: Placement,
    arity: Arity,
    precedence: u8,
    assoc: Assoc,
}

/// A stable handle to an operator within its table.
///
/// Trees store `OpId`s rather than references. An id stays valid as
/// long as the issuing table is alive; tables only ever grow.
#[derive(Debug)]
#[derive(Clone, Copy)]
#[derive(PartialEq, Eq)]
pub struct OpId(usize);

/// A table of operators, plus the optional glue op.
///
/// The glue op is synthesised by the parser between two adjacent
/// sub-expressions that lack an explicit connector (`2x` parses as
/// `2*x` when `*` is the glue op). It must be a binary infix.
#[derive(Debug)]
pub struct OpTable {
    ops: Vec<Operator>,
    glue: Option<OpId>,
}

// Operator
// --------------------------------------------------

impl Operator {
    /// A function applied to a parenthesised, delimited argument list.
    pub fn function(name: &str, arity: Arity) -> Operator {
        Operator {
            name: name.to_string(),
            placement: Placement::Function,
            arity: arity,
            precedence: MAX_PRECEDENCE,
            assoc: Assoc::Left,
        }
    }

    /// A unary operator written before its operand.
    pub fn prefix(name: &str, precedence: u8) -> Operator {
        Operator {
            name: name.to_string(),
            placement: Placement::Prefix,
            arity: Arity::Fixed(1),
            precedence: precedence,
            assoc: Assoc::Right,
        }
    }

    /// A binary operator written between its operands.
    pub fn infix(name: &str, precedence: u8, assoc: Assoc) -> Operator {
        Operator {
            name: name.to_string(),
            placement: Placement::Infix,
            arity: Arity::Fixed(2),
            precedence: precedence,
            assoc: assoc,
        }
    }

    /// A unary operator written after its operand.
    pub fn postfix(name: &str, precedence: u8) -> Operator {
        Operator {
            name: name.to_string(),
            placement: Placement::Postfix,
            arity: Arity::Fixed(1),
            precedence: precedence,
            assoc: Assoc::Left,
        }
    }

    /// A named constant: a function of arity zero.
    pub fn constant(name: &str) -> Operator {
        Operator::function(name, Arity::Fixed(0))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    #[inline]
    pub fn arity(&self) -> Arity {
        self.arity
    }

    #[inline]
    pub fn precedence(&self) -> u8 {
        self.precedence
    }

    #[inline]
    pub fn assoc(&self) -> Assoc {
        self.assoc
    }
}

// OpTable
// --------------------------------------------------

impl OpTable {
    /// Constructs a new, empty table without a glue op.
    pub fn new() -> OpTable {
        OpTable {
            ops: Vec::new(),
            glue: None,
        }
    }

    /// Inserts a new operator into the table.
    ///
    /// Rejects a duplicate (name, placement) for non-functions and a
    /// duplicate (name, arity) for functions with `NameClash`. Rejects
    /// an infix whose precedence matches an existing infix of different
    /// associativity with `InvariantViolation`, because the shunting
    /// discipline is ill-defined for such a pair.
    pub fn add_op(&mut self, op: Operator) -> Result<OpId, TableError> {
        let clash = match op.placement {
            Placement::Function => self.lookup_function(&op.name, op.arity).is_some(),
            placement => self.lookup_op(&op.name, placement).is_some(),
        };
        if clash {
            return Err(TableError::NameClash);
        }

        if op.placement == Placement::Infix {
            for other in &self.ops {
                if other.placement == Placement::Infix && other.precedence == op.precedence
                    && other.assoc != op.assoc
                {
                    return Err(TableError::InvariantViolation);
                }
            }
        }

        self.ops.push(op);
        Ok(OpId(self.ops.len() - 1))
    }

    /// Inserts a batch of operators, stopping at the first rejection.
    pub fn add_ops(&mut self, ops: Vec<Operator>) -> Result<(), TableError> {
        for op in ops {
            self.add_op(op)?;
        }
        Ok(())
    }

    /// Records the glue op. It must be an infix of arity 2.
    pub fn set_glue_op(&mut self, id: OpId) -> Result<(), TableError> {
        {
            let op = self.op(id);
            if op.placement != Placement::Infix || op.arity != Arity::Fixed(2) {
                return Err(TableError::InvariantViolation);
            }
        }
        self.glue = Some(id);
        Ok(())
    }

    /// Removes the glue op. Adjacent sub-expressions become an error.
    pub fn remove_glue_op(&mut self) {
        self.glue = None;
    }

    /// The currently configured glue op.
    pub fn glue_op(&self) -> Option<OpId> {
        self.glue
    }

    /// Searches for an operator of the given name and placement.
    ///
    /// For `Placement::Function` this is only a tentative lookup: it
    /// returns *some* function of that name, preferring the zero-arity
    /// overload so that bare function names can act as constants. The
    /// parser re-resolves functions by their counted arity later.
    pub fn lookup_op(&self, name: &str, placement: Placement) -> Option<OpId> {
        if placement == Placement::Function {
            return self.lookup_tentative_function(name);
        }
        self.ops
            .iter()
            .position(|op| op.placement == placement && op.name == name)
            .map(OpId)
    }

    /// Searches for the function of the given name and exact arity.
    pub fn lookup_function(&self, name: &str, arity: Arity) -> Option<OpId> {
        self.ops
            .iter()
            .position(|op| {
                op.placement == Placement::Function && op.arity == arity && op.name == name
            })
            .map(OpId)
    }

    /// True when more than one function of this name is registered.
    pub fn is_function_overloaded(&self, name: &str) -> bool {
        self.ops
            .iter()
            .filter(|op| op.placement == Placement::Function && op.name == name)
            .count() > 1
    }

    /// Resolves an id issued by this table.
    pub fn op(&self, id: OpId) -> &Operator {
        &self.ops[id.0]
    }

    /// Views the table as a slice in registration order.
    pub fn as_slice(&self) -> &[Operator] {
        &self.ops
    }

    /// The number of registered operators.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    fn lookup_tentative_function(&self, name: &str) -> Option<OpId> {
        let mut non_zero = None;
        for (i, op) in self.ops.iter().enumerate() {
            if op.placement == Placement::Function && op.name == name {
                if op.arity == Arity::Fixed(0) {
                    return Some(OpId(i));
                }
                non_zero = Some(OpId(i));
            }
        }
        non_zero
    }
}

// Tests
// --------------------------------------------------
