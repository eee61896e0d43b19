//! The tree representation of parsed expressions.
//!
//! A [`Node`] is a tagged union with three cases: a floating-point
//! constant, a named variable, or an operator applied to an ordered
//! sequence of children. Nodes own their children, so dropping a tree
//! releases it recursively. Operator nodes carry an [`OpId`] into the
//! table they were parsed under; that table must outlive the tree.
//!
//! Structural equality goes through [`OrderedFloat`], so two `NaN`
//! constants compare equal. This matters for the rewrite engine, which
//! checks repeated pattern bindings for structural equality.
//!
//! [`Node`]: ./enum.Node.html
//! [`OpId`]: ../operators/struct.OpId.html
//! [`OrderedFloat`]: https://docs.rs/ordered-float

use std::fmt;

use ordered_float::OrderedFloat;

use syntax::operators::{Assoc, OpId, OpTable, Placement};

/// A single node of an expression tree.
#[derive(Debug)]
#[derive(Clone)]
pub enum Node {
    Constant(f64),
    Variable(String),
    Operator(OpId, Vec<Node>),
}

/// Renders a tree as expression text. See [`Node::display`].
///
/// [`Node::display`]: ./enum.Node.html#method.display
pub struct TreeDisplay<'a> {
    ops: &'a OpTable,
    node: &'a Node,
}

// Node
// --------------------------------------------------

impl Node {
    /// Constructs a variable node.
    pub fn variable<S: Into<String>>(name: S) -> Node {
        Node::Variable(name.into())
    }

    #[inline]
    pub fn is_constant(&self) -> bool {
        match *self {
            Node::Constant(_) => true,
            _ => false,
        }
    }

    #[inline]
    pub fn is_variable(&self) -> bool {
        match *self {
            Node::Variable(_) => true,
            _ => false,
        }
    }

    #[inline]
    pub fn is_operator(&self) -> bool {
        match *self {
            Node::Operator(..) => true,
            _ => false,
        }
    }

    /// The value of a constant node. Panics on any other case.
    pub fn value(&self) -> f64 {
        match *self {
            Node::Constant(value) => value,
            _ => panic!("node is not a constant"),
        }
    }

    /// The name of a variable node. Panics on any other case.
    pub fn var_name(&self) -> &str {
        match *self {
            Node::Variable(ref name) => name,
            _ => panic!("node is not a variable"),
        }
    }

    /// The operator id of an operator node. Panics on any other case.
    pub fn op_id(&self) -> OpId {
        match *self {
            Node::Operator(id, _) => id,
            _ => panic!("node is not an operator"),
        }
    }

    /// The children of an operator node. Panics on any other case.
    pub fn children(&self) -> &[Node] {
        match *self {
            Node::Operator(_, ref children) => children,
            _ => panic!("node is not an operator"),
        }
    }

    /// The `i`th child of an operator node.
    pub fn child(&self, i: usize) -> &Node {
        &self.children()[i]
    }

    /// Replaces every variable of the given name with a copy of
    /// `replacement` and returns the number of substitutions.
    pub fn substitute_var(&mut self, name: &str, replacement: &Node) -> usize {
        let is_target = match *self {
            Node::Variable(ref var) => var == name,
            _ => false,
        };
        if is_target {
            *self = replacement.clone();
            return 1;
        }
        match *self {
            Node::Operator(_, ref mut children) => children
                .iter_mut()
                .map(|child| child.substitute_var(name, replacement))
                .sum(),
            _ => 0,
        }
    }

    /// Renders the tree as expression text under the given table.
    ///
    /// Parentheses are emitted only where precedence or associativity
    /// demands them; reparsing the output under the same table yields a
    /// structurally equal tree.
    pub fn display<'a>(&'a self, ops: &'a OpTable) -> TreeDisplay<'a> {
        TreeDisplay {
            ops: ops,
            node: self,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Node) -> bool {
        match (self, other) {
            (&Node::Constant(a), &Node::Constant(b)) => OrderedFloat(a) == OrderedFloat(b),
            (&Node::Variable(ref a), &Node::Variable(ref b)) => a == b,
            (&Node::Operator(a, ref ac), &Node::Operator(b, ref bc)) => a == b && ac == bc,
            _ => false,
        }
    }
}

impl Eq for Node {}

// TreeDisplay
// --------------------------------------------------

impl<'a> fmt::Display for TreeDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_node(f, self.ops, self.node)
    }
}

fn write_node(f: &mut fmt::Formatter, ops: &OpTable, node: &Node) -> fmt::Result {
    match *node {
        Node::Constant(value) => write!(f, "{}", value),
        Node::Variable(ref name) => f.write_str(name),
        Node::Operator(id, ref children) => {
            let op = ops.op(id);
            match op.placement() {
                Placement::Function => {
                    f.write_str(op.name())?;
                    if !children.is_empty() {
                        f.write_str("(")?;
                        for (i, child) in children.iter().enumerate() {
                            if i > 0 {
                                f.write_str(",")?;
                            }
                            write_node(f, ops, child)?;
                        }
                        f.write_str(")")?;
                    }
                    Ok(())
                }
                Placement::Prefix => {
                    f.write_str(op.name())?;
                    write_operand(f, ops, &children[0], op.precedence(), false)
                }
                Placement::Postfix => {
                    write_operand(f, ops, &children[0], op.precedence(), false)?;
                    f.write_str(op.name())
                }
                Placement::Infix => {
                    let prec = op.precedence();
                    write_operand(f, ops, &children[0], prec, op.assoc() == Assoc::Right)?;
                    f.write_str(op.name())?;
                    write_operand(f, ops, &children[1], prec, op.assoc() == Assoc::Left)
                }
            }
        }
    }
}

fn write_operand(
    f: &mut fmt::Formatter,
    ops: &OpTable,
    child: &Node,
    parent_prec: u8,
    wrap_equal: bool,
) -> fmt::Result {
    if needs_paren(ops, child, parent_prec, wrap_equal) {
        f.write_str("(")?;
        write_node(f, ops, child)?;
        f.write_str(")")
    } else {
        write_node(f, ops, child)
    }
}

/// An operand needs parentheses when it binds more loosely than its
/// parent, or equally on the side the parent does not group towards.
/// Function applications delimit themselves.
fn needs_paren(ops: &OpTable, child: &Node, parent_prec: u8, wrap_equal: bool) -> bool {
    match *child {
        Node::Operator(id, _) => {
            let op = ops.op(id);
            match op.placement() {
                Placement::Function => false,
                _ => {
                    op.precedence() < parent_prec
                        || (op.precedence() == parent_prec && wrap_equal)
                }
            }
        }
        _ => false,
    }
}

// Tests
// --------------------------------------------------

#[cfg(test)]
mod test {
    use arith;
    use syntax::parse_input;
    use super::*;

    #[test]
    fn accessors() {
        let ops = arith::context();
        let tree = parse_input(&ops, "x+2").unwrap();
        assert!(tree.is_operator());
        assert_eq!(ops.op(tree.op_id()).name(), "+");
        assert_eq!(tree.children().len(), 2);
        assert_eq!(tree.child(0).var_name(), "x");
        assert_eq!(tree.child(1).value(), 2.0);
    }

    #[test]
    #[should_panic]
    fn accessor_mismatch() {
        Node::Constant(1.0).var_name();
    }

    #[test]
    fn structural_equality() {
        let ops = arith::context();
        let a = parse_input(&ops, "1+2*x").unwrap();
        let b = parse_input(&ops, "1 + 2 * x").unwrap();
        let c = parse_input(&ops, "1+2*y").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let nan = ::std::f64::NAN;
        assert_eq!(Node::Constant(nan), Node::Constant(nan));
    }

    #[test]
    fn substitute() {
        let ops = arith::context();
        let mut tree = parse_input(&ops, "x*(x+y)").unwrap();
        let n = tree.substitute_var("x", &Node::Constant(3.0));
        assert_eq!(n, 2);
        assert_eq!(tree, parse_input(&ops, "3*(3+y)").unwrap());
    }

    #[test]
    fn display_round_trip() {
        let ops = arith::context();
        let inputs = [
            "1+2*3",
            "(1+2)*3",
            "2^3^2",
            "(2^3)^2",
            "1-(2-3)",
            "-(1+2)!",
            "sin(pi/4)",
            "max(1,2*4,3)",
            "sin",
            "2*pi",
            "-x*y",
            "3 mod 2",
        ];
        for input in inputs.iter() {
            let tree = parse_input(&ops, input).unwrap();
            let text = format!("{}", tree.display(&ops));
            let back = parse_input(&ops, &text).unwrap();
            assert_eq!(tree, back, "round trip of {:?} via {:?}", input, text);
        }
    }

    #[test]
    fn display_text() {
        let ops = arith::context();
        let tree = parse_input(&ops, "2 (3+4)").unwrap();
        assert_eq!(format!("{}", tree.display(&ops)), "2*(3+4)");
        let tree = parse_input(&ops, "sum(1,2,3)^2").unwrap();
        assert_eq!(format!("{}", tree.display(&ops)), "sum(1,2,3)^2");
    }
}
