//! Structural matching of pattern trees against subject trees.
//!
//! A pattern is an ordinary expression tree in which some variables are
//! *pattern variables*, distinguished by a name prefix: `v_` binds any
//! subtree, `c_` binds only a constant, and `n_` binds any leaf. The
//! prefixes are interpreted once, when a [`Pattern`] is built; the
//! match algorithm itself only consults the resulting annotations, so
//! it stays independent of the naming discipline.
//!
//! A successful match borrows from both trees: it holds the matched
//! subject subtree and a binding from pattern-variable names to subject
//! subtrees. Nothing is copied until a rule instantiates its
//! replacement.
//!
//! [`Pattern`]: ./struct.Pattern.html

use std::collections::HashMap;

use syntax::repr::Node;

/// Name prefix of a pattern variable binding any subtree.
pub const VAR_PREFIX: &'static str = "v_";
/// Name prefix of a pattern variable binding only constants.
pub const CONST_PREFIX: &'static str = "c_";
/// Name prefix of a pattern variable binding any non-operator node.
pub const NAME_PREFIX: &'static str = "n_";

/// The kind constraint of a pattern variable.
#[derive(Debug)]
#[derive(Clone, Copy)]
#[derive(PartialEq, Eq)]
pub enum VarKind {
    /// Matches any subtree (`v_`).
    Any,
    /// Matches only a constant (`c_`).
    Constant,
    /// Matches a constant or a variable, never an operator (`n_`).
    Leaf,
}

/// A pattern tree plus the kind annotation of its pattern variables.
#[derive(Debug)]
#[derive(Clone)]
#[derive(PartialEq)]
pub struct Pattern {
    tree: Node,
    kinds: HashMap<String, VarKind>,
}

/// A successful match of a pattern against a subject subtree.
///
/// Bindings borrow the subject; the matching must be consumed before
/// the subject tree can be mutated.
#[derive(Debug)]
pub struct Matching<'t, 'p> {
    matched: &'t Node,
    bindings: Vec<(&'p str, &'t Node)>,
}

// Pattern
// --------------------------------------------------

impl Pattern {
    /// Builds a pattern, assigning a kind to every variable whose name
    /// carries one of the pattern prefixes.
    pub fn new(tree: Node) -> Pattern {
        let mut kinds = HashMap::new();
        collect_kinds(&tree, &mut kinds);
        Pattern {
            tree: tree,
            kinds: kinds,
        }
    }

    /// The underlying pattern tree.
    pub fn tree(&self) -> &Node {
        &self.tree
    }

    /// The kind of a pattern variable, or `None` for ordinary names.
    pub fn var_kind(&self, name: &str) -> Option<VarKind> {
        self.kinds.get(name).cloned()
    }
}

fn collect_kinds(node: &Node, kinds: &mut HashMap<String, VarKind>) {
    match *node {
        Node::Variable(ref name) => {
            let kind = if name.starts_with(VAR_PREFIX) {
                Some(VarKind::Any)
            } else if name.starts_with(CONST_PREFIX) {
                Some(VarKind::Constant)
            } else if name.starts_with(NAME_PREFIX) {
                Some(VarKind::Leaf)
            } else {
                None
            };
            if let Some(kind) = kind {
                kinds.insert(name.clone(), kind);
            }
        }
        Node::Operator(_, ref children) => {
            for child in children {
                collect_kinds(child, kinds);
            }
        }
        Node::Constant(_) => {}
    }
}

// Matching
// --------------------------------------------------

impl<'t, 'p> Matching<'t, 'p> {
    /// The subject subtree the pattern matched.
    pub fn matched(&self) -> &'t Node {
        self.matched
    }

    /// The subtree bound to a pattern variable.
    pub fn get(&self, name: &str) -> Option<&'t Node> {
        self.bindings
            .iter()
            .find(|&&(bound, _)| bound == name)
            .map(|&(_, node)| node)
    }

    /// All bindings, in the order they were established.
    pub fn bindings(&self) -> &[(&'p str, &'t Node)] {
        &self.bindings
    }
}

/// Matches the pattern's root against the subject's root.
pub fn get_matching<'t, 'p>(subject: &'t Node, pattern: &'p Pattern) -> Option<Matching<'t, 'p>> {
    let mut bindings = Vec::new();
    if match_nodes(subject, pattern.tree(), pattern, &mut bindings) {
        Some(Matching {
            matched: subject,
            bindings: bindings,
        })
    } else {
        None
    }
}

/// Walks the tree in pre-order and returns the first subtree the
/// pattern matches.
pub fn find_matching<'t, 'p>(tree: &'t Node, pattern: &'p Pattern) -> Option<Matching<'t, 'p>> {
    if let Some(matching) = get_matching(tree, pattern) {
        return Some(matching);
    }
    if let Node::Operator(_, ref children) = *tree {
        for child in children {
            if let Some(matching) = find_matching(child, pattern) {
                return Some(matching);
            }
        }
    }
    None
}

fn match_nodes<'t, 'p>(
    subject: &'t Node,
    pattern: &'p Node,
    ctx: &'p Pattern,
    bindings: &mut Vec<(&'p str, &'t Node)>,
) -> bool {
    match *pattern {
        Node::Constant(_) => subject == pattern,
        Node::Variable(ref name) => match ctx.var_kind(name) {
            Some(kind) => {
                let admissible = match kind {
                    VarKind::Any => true,
                    VarKind::Constant => subject.is_constant(),
                    VarKind::Leaf => !subject.is_operator(),
                };
                if !admissible {
                    return false;
                }
                // A rebind must agree with the established binding.
                if let Some(previous) = bindings
                    .iter()
                    .find(|&&(bound, _)| bound == name.as_str())
                    .map(|&(_, node)| node)
                {
                    return previous == subject;
                }
                bindings.push((name.as_str(), subject));
                true
            }
            None => match *subject {
                Node::Variable(ref subject_name) => subject_name == name,
                _ => false,
            },
        },
        Node::Operator(id, ref children) => match *subject {
            Node::Operator(subject_id, ref subject_children) => {
                id == subject_id && children.len() == subject_children.len()
                    && subject_children
                        .iter()
                        .zip(children)
                        .all(|(s, p)| match_nodes(s, p, ctx, bindings))
            }
            _ => false,
        },
    }
}

// Tests
// --------------------------------------------------
