//! Pattern matching and rewriting over operator trees.

pub mod matching;
pub mod rule;

pub use self::matching::{find_matching, get_matching, Matching, Pattern, VarKind};
pub use self::rule::{
    apply_rule, apply_ruleset, parse_rule, parse_ruleset, RewriteRule, Ruleset, RulesetError,
};
