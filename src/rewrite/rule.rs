//! Rewrite rules: textual parsing and fixed-point application.
//!
//! A rule pairs a pattern with a replacement, optionally guarded by
//! constraint trees that must all evaluate to a non-zero value in the
//! matching environment. The textual form is one rule per line:
//!
//! ```text
//! <pattern> -> <replacement> [ WHERE <constraint> [ AND <constraint> ]* ]
//! ```
//!
//! Patterns and replacements are parsed in the main operator table;
//! constraints in an extended table that may add comparison operators.
//! The extended table must be a superset of the main one with identical
//! ids for the shared prefix, so subject subtrees bound in the main
//! table evaluate cleanly inside constraint trees.
//!
//! Application is in-place and ordered: [`apply_ruleset`] always fires
//! the first matching rule of the list and restarts from the top, until
//! a full pass applies nothing. Later rules therefore act as
//! fall-throughs, and termination is the rule author's responsibility.
//!
//! [`apply_ruleset`]: ./fn.apply_ruleset.html

use std::error::Error;
use std::fmt;

use arith;
use rewrite::matching::{get_matching, Matching, Pattern};
use syntax::operators::OpTable;
use syntax::repr::Node;
use syntax::{parse_input, ParseError};

const ARROW: &'static str = "->";
const WHERE: &'static str = " WHERE ";
const AND: &'static str = " AND ";

/// A rewrite rule: pattern, replacement, and optional constraints.
#[derive(Debug)]
#[derive(Clone)]
#[derive(PartialEq)]
pub struct RewriteRule {
    pattern: Pattern,
    replacement: Node,
    constraints: Vec<Node>,
}

/// An ordered list of rewrite rules.
pub type Ruleset = Vec<RewriteRule>;

/// A rule line that failed to parse.
#[derive(Debug)]
#[derive(Clone, Copy)]
#[derive(PartialEq, Eq)]
pub struct RulesetError {
    pub line: usize,
    pub error: ParseError,
}

// RewriteRule
// --------------------------------------------------

impl RewriteRule {
    /// Builds an unconstrained rule from a pattern and a replacement.
    pub fn new(pattern: Node, replacement: Node) -> RewriteRule {
        RewriteRule::with_constraints(pattern, replacement, Vec::new())
    }

    /// Builds a rule whose match additionally requires every constraint
    /// to hold in the matching environment.
    pub fn with_constraints(
        pattern: Node,
        replacement: Node,
        constraints: Vec<Node>,
    ) -> RewriteRule {
        RewriteRule {
            pattern: Pattern::new(pattern),
            replacement: replacement,
            constraints: constraints,
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn replacement(&self) -> &Node {
        &self.replacement
    }

    pub fn constraints(&self) -> &[Node] {
        &self.constraints
    }
}

// Rule text parsing
// --------------------------------------------------

/// Parses a single rule line.
///
/// The pattern and replacement are parsed in `main_ops`, constraints in
/// `extended_ops`. A line without an arrow is `ArgsMalformed`.
pub fn parse_rule(
    line: &str,
    main_ops: &OpTable,
    extended_ops: &OpTable,
) -> Result<RewriteRule, ParseError> {
    let arrow = match line.find(ARROW) {
        Some(pos) => pos,
        None => return Err(ParseError::ArgsMalformed),
    };
    let before = &line[..arrow];
    let mut after = &line[arrow + ARROW.len()..];

    let mut constraints = Vec::new();
    if let Some(pos) = after.find(WHERE) {
        let mut rest = &after[pos + WHERE.len()..];
        after = &after[..pos];
        loop {
            match rest.find(AND) {
                Some(next) => {
                    constraints.push(parse_input(extended_ops, &rest[..next])?);
                    rest = &rest[next + AND.len()..];
                }
                None => {
                    constraints.push(parse_input(extended_ops, rest)?);
                    break;
                }
            }
        }
    }

    let pattern = parse_input(main_ops, before)?;
    let replacement = parse_input(main_ops, after)?;
    Ok(RewriteRule::with_constraints(pattern, replacement, constraints))
}

/// Parses a ruleset: one rule per line, blank lines skipped.
pub fn parse_ruleset(
    text: &str,
    main_ops: &OpTable,
    extended_ops: &OpTable,
) -> Result<Ruleset, RulesetError> {
    let mut rules = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_rule(line, main_ops, extended_ops) {
            Ok(rule) => rules.push(rule),
            Err(error) => {
                return Err(RulesetError {
                    line: i + 1,
                    error: error,
                })
            }
        }
    }
    Ok(rules)
}

// Application
// --------------------------------------------------

/// Rewrites the first matching subtree in pre-order, in place.
///
/// Returns false when no subtree matches (the tree is untouched). The
/// table is used to evaluate constraints and must extend the one the
/// trees were parsed under.
pub fn apply_rule(ops: &OpTable, tree: &mut Node, rule: &RewriteRule) -> bool {
    let replacement = match get_matching(tree, rule.pattern()) {
        Some(matching) => {
            if constraints_hold(ops, &matching, rule.constraints()) {
                Some(instantiate(rule.replacement(), &matching))
            } else {
                None
            }
        }
        None => None,
    };
    if let Some(replacement) = replacement {
        *tree = replacement;
        return true;
    }

    if let Node::Operator(_, ref mut children) = *tree {
        for child in children {
            if apply_rule(ops, child, rule) {
                return true;
            }
        }
    }
    false
}

/// Applies the ruleset to a fixed point and returns the number of
/// applications. Rules are tried in declaration order and the scan
/// restarts after every hit.
pub fn apply_ruleset(ops: &OpTable, tree: &mut Node, rules: &[RewriteRule]) -> usize {
    let mut applications = 0;
    loop {
        let mut applied = false;
        for rule in rules {
            if apply_rule(ops, tree, rule) {
                applications += 1;
                applied = true;
                break;
            }
        }
        if !applied {
            return applications;
        }
    }
}

/// Clones the template, substituting every bound pattern variable with
/// a copy of its binding.
fn instantiate(template: &Node, matching: &Matching) -> Node {
    match *template {
        Node::Variable(ref name) => match matching.get(name) {
            Some(bound) => bound.clone(),
            None => template.clone(),
        },
        Node::Operator(id, ref children) => Node::Operator(
            id,
            children.iter().map(|child| instantiate(child, matching)).collect(),
        ),
        Node::Constant(_) => template.clone(),
    }
}

fn constraints_hold(ops: &OpTable, matching: &Matching, constraints: &[Node]) -> bool {
    constraints.iter().all(|constraint| {
        let bound = instantiate(constraint, matching);
        match arith::eval(ops, &bound) {
            Ok(value) => value != 0.0 && !value.is_nan(),
            Err(_) => false,
        }
    })
}

// RulesetError
// --------------------------------------------------

impl fmt::Display for RulesetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.error)
    }
}

impl Error for RulesetError {}

// Tests
// --------------------------------------------------
