//! The stock simplification rules applied after parsing.
//!
//! The rules flatten right-nested sums and products so that evaluation
//! and display follow source order, erase double negation, and strip
//! the `$` marker. They are ordered and applied to a fixed point like
//! any user ruleset.

use rewrite::rule::{apply_ruleset, parse_ruleset, RewriteRule, Ruleset};
use syntax::operators::OpTable;
use syntax::repr::Node;

use arith::context::extended_context;

/// The variable bound to the previous result before evaluation.
pub const ANS_VAR: &'static str = "ans";

const PREDEFINED: &'static str = "\
$v_x -> v_x
v_x+(v_y+v_z) -> v_x+v_y+v_z
v_x*(v_y*v_z) -> v_x*v_y*v_z
--v_x -> v_x
";

/// Parses the predefined ruleset against the given (arithmetic) table.
pub fn predefined(ops: &OpTable) -> Ruleset {
    parse_ruleset(PREDEFINED, ops, &extended_context())
        .expect("the predefined ruleset parses")
}

/// Post-parse transformation of user input: binds the previous result
/// to the `ans` variable and applies the ruleset to a fixed point.
/// Returns the number of rule applications.
pub fn transform_input(
    ops: &OpTable,
    tree: &mut Node,
    rules: &[RewriteRule],
    ans: f64,
) -> usize {
    tree.substitute_var(ANS_VAR, &Node::Constant(ans));
    apply_ruleset(ops, tree, rules)
}

// Tests
// --------------------------------------------------

#[cfg(test)]
mod test {
    use arith::context::context;
    use arith::eval::eval;
    use syntax::parse_input;
    use super::*;

    #[test]
    fn flattens_nested_sums() {
        let ops = context();
        let rules = predefined(&ops);
        let mut tree = parse_input(&ops, "1+(2+3)").unwrap();
        assert!(transform_input(&ops, &mut tree, &rules, 0.0) > 0);
        assert_eq!(tree, parse_input(&ops, "1+2+3").unwrap());

        let mut tree = parse_input(&ops, "2*(a*b)").unwrap();
        transform_input(&ops, &mut tree, &rules, 0.0);
        assert_eq!(tree, parse_input(&ops, "2*a*b").unwrap());
    }

    #[test]
    fn erases_double_negation() {
        let ops = context();
        let rules = predefined(&ops);
        let mut tree = parse_input(&ops, "--x").unwrap();
        transform_input(&ops, &mut tree, &rules, 0.0);
        assert_eq!(tree, Node::variable("x"));
    }

    #[test]
    fn strips_dollar_marker() {
        let ops = context();
        let rules = predefined(&ops);
        let mut tree = parse_input(&ops, "$(1+2)").unwrap();
        transform_input(&ops, &mut tree, &rules, 0.0);
        assert_eq!(tree, parse_input(&ops, "1+2").unwrap());
    }

    #[test]
    fn binds_ans() {
        let ops = context();
        let rules = predefined(&ops);
        let mut tree = parse_input(&ops, "ans+1").unwrap();
        transform_input(&ops, &mut tree, &rules, 41.0);
        assert_eq!(eval(&ops, &tree), Ok(42.0));
    }

    #[test]
    fn reaches_a_fixed_point() {
        let ops = context();
        let rules = predefined(&ops);
        let mut tree = parse_input(&ops, "1+(2+(3+4))").unwrap();
        transform_input(&ops, &mut tree, &rules, 0.0);
        let fixed = tree.clone();
        assert_eq!(transform_input(&ops, &mut tree, &rules, 0.0), 0);
        assert_eq!(tree, fixed);
        assert_eq!(eval(&ops, &tree), Ok(10.0));
    }
}
