//! Numeric evaluation of fully-reduced operator trees.
//!
//! Evaluation is a plain recursive tree walk: constants evaluate to
//! themselves, variables are an error (bind them first, see
//! [`Node::substitute_var`]), and operator nodes dispatch on their
//! placement and name. Zero-arity functions such as `pi` appear as
//! operator nodes without children and need no special case.
//!
//! [`Node::substitute_var`]: ../../syntax/repr/enum.Node.html#method.substitute_var

use std::error::Error;
use std::f64::consts::PI;
use std::fmt;

use rand;

use syntax::operators::{OpId, OpTable, Placement};
use syntax::repr::Node;

/// Everything that can go wrong while evaluating a tree.
#[derive(Debug)]
#[derive(Clone)]
#[derive(PartialEq, Eq)]
pub enum EvalError {
    /// The tree still contains an unbound variable.
    Variable(String),
    /// No evaluation rule exists for the operator.
    UnknownOperator(String),
    /// An operator node has fewer children than its rule consumes,
    /// e.g. a bare function application.
    MissingOperand(String),
}

/// Evaluates a tree to a number under the given operator table.
pub fn eval(ops: &OpTable, tree: &Node) -> Result<f64, EvalError> {
    match *tree {
        Node::Constant(value) => Ok(value),
        Node::Variable(ref name) => Err(EvalError::Variable(name.clone())),
        Node::Operator(id, ref children) => eval_op(ops, id, children),
    }
}

fn eval_op(ops: &OpTable, id: OpId, children: &[Node]) -> Result<f64, EvalError> {
    let op = ops.op(id);
    let name = op.name();
    let arg = |i: usize| -> Result<f64, EvalError> {
        match children.get(i) {
            Some(child) => eval(ops, child),
            None => Err(EvalError::MissingOperand(name.to_string())),
        }
    };

    match (op.placement(), name) {
        (Placement::Prefix, "$") => arg(0),
        (Placement::Prefix, "-") => Ok(-arg(0)?),
        (Placement::Prefix, "+") => arg(0),

        (Placement::Infix, "+") => Ok(arg(0)? + arg(1)?),
        (Placement::Infix, "-") => Ok(arg(0)? - arg(1)?),
        (Placement::Infix, "*") => Ok(arg(0)? * arg(1)?),
        (Placement::Infix, "/") => Ok(arg(0)? / arg(1)?),
        (Placement::Infix, "^") => Ok(arg(0)?.powf(arg(1)?)),
        (Placement::Infix, "C") => Ok(binomial(arg(0)?.trunc().abs(), arg(1)?.trunc().abs())),
        (Placement::Infix, "mod") => Ok(arg(0)? % arg(1)?),

        (Placement::Postfix, "!") => {
            let mut res = 1.0;
            let mut i = arg(0)?.trunc();
            while i > 1.0 {
                res *= i;
                i -= 1.0;
            }
            Ok(res)
        }
        (Placement::Postfix, "%") => Ok(arg(0)? / 100.0),

        (Placement::Function, "exp") => Ok(arg(0)?.exp()),
        (Placement::Function, "root") => Ok(arg(0)?.powf(1.0 / arg(1)?)),
        (Placement::Function, "sqrt") => Ok(arg(0)?.sqrt()),
        (Placement::Function, "log") => Ok(arg(0)?.ln() / arg(1)?.ln()),
        (Placement::Function, "ln") => Ok(arg(0)?.ln()),
        (Placement::Function, "ld") => Ok(arg(0)?.log2()),
        (Placement::Function, "lg") => Ok(arg(0)?.log10()),
        (Placement::Function, "sin") => Ok(arg(0)?.sin()),
        (Placement::Function, "cos") => Ok(arg(0)?.cos()),
        (Placement::Function, "tan") => Ok(arg(0)?.tan()),
        (Placement::Function, "asin") => Ok(arg(0)?.asin()),
        (Placement::Function, "acos") => Ok(arg(0)?.acos()),
        (Placement::Function, "atan") => Ok(arg(0)?.atan()),
        (Placement::Function, "sinh") => Ok(arg(0)?.sinh()),
        (Placement::Function, "cosh") => Ok(arg(0)?.cosh()),
        (Placement::Function, "tanh") => Ok(arg(0)?.tanh()),
        (Placement::Function, "asinh") => Ok(arg(0)?.asinh()),
        (Placement::Function, "acosh") => Ok(arg(0)?.acosh()),
        (Placement::Function, "atanh") => Ok(arg(0)?.atanh()),

        (Placement::Function, "max") => {
            let mut res = ::std::f64::NEG_INFINITY;
            for i in 0..children.len() {
                let value = arg(i)?;
                if value > res {
                    res = value;
                }
            }
            Ok(res)
        }
        (Placement::Function, "min") => {
            let mut res = ::std::f64::INFINITY;
            for i in 0..children.len() {
                let value = arg(i)?;
                if value < res {
                    res = value;
                }
            }
            Ok(res)
        }

        (Placement::Function, "abs") => Ok(arg(0)?.abs()),
        (Placement::Function, "ceil") => Ok(arg(0)?.ceil()),
        (Placement::Function, "floor") => Ok(arg(0)?.floor()),
        (Placement::Function, "round") => Ok(arg(0)?.round()),
        (Placement::Function, "trunc") => Ok(arg(0)?.trunc()),
        (Placement::Function, "frac") => {
            let value = arg(0)?;
            Ok(value - value.floor())
        }

        (Placement::Function, "sum") => {
            let mut res = 0.0;
            for i in 0..children.len() {
                res += arg(i)?;
            }
            Ok(res)
        }
        (Placement::Function, "prod") => {
            let mut res = 1.0;
            for i in 0..children.len() {
                res *= arg(i)?;
            }
            Ok(res)
        }
        (Placement::Function, "avg") => {
            if children.is_empty() {
                return Ok(0.0);
            }
            let mut res = 0.0;
            for i in 0..children.len() {
                res += arg(i)?;
            }
            Ok(res / children.len() as f64)
        }

        (Placement::Function, "rand") => Ok(random_between(arg(0)?, arg(1)?)),
        (Placement::Function, "gamma") => Ok(gamma(arg(0)?)),
        (Placement::Function, "fib") => Ok(fibonacci(arg(0)?.trunc())),

        (Placement::Function, "pi") => Ok(3.14159265359),
        (Placement::Function, "e") => Ok(2.71828182846),
        (Placement::Function, "phi") => Ok(1.61803398874),
        (Placement::Function, "clight") => Ok(299792458.0),
        (Placement::Function, "csound") => Ok(343.2),

        (Placement::Infix, "==") => Ok(bool_value(arg(0)? == arg(1)?)),
        (Placement::Infix, "!=") => Ok(bool_value(arg(0)? != arg(1)?)),
        (Placement::Infix, "<=") => Ok(bool_value(arg(0)? <= arg(1)?)),
        (Placement::Infix, ">=") => Ok(bool_value(arg(0)? >= arg(1)?)),
        (Placement::Infix, "<") => Ok(bool_value(arg(0)? < arg(1)?)),
        (Placement::Infix, ">") => Ok(bool_value(arg(0)? > arg(1)?)),

        _ => Err(EvalError::UnknownOperator(name.to_string())),
    }
}

// Math helpers
// --------------------------------------------------

fn bool_value(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

fn binomial(n: f64, k: f64) -> f64 {
    let mut k = k;
    if k == 0.0 {
        return 1.0;
    }
    if 2.0 * k > n {
        k = n - k;
    }

    let mut res = 1.0;
    let mut i = 1.0;
    while i <= k {
        res = (res * (n - k + i)) / i;
        i += 1.0;
    }
    res
}

fn fibonacci(n: f64) -> f64 {
    if n == 0.0 {
        return 0.0;
    }

    let mut n = n;
    let mut a = 0.0;
    let mut b = 1.0;
    while n > 1.0 {
        let next = a + b;
        a = b;
        b = next;
        n -= 1.0;
    }
    b
}

/// A random natural number between min and max - 1 (max is exclusive).
fn random_between(min: f64, max: f64) -> f64 {
    let diff = (max - min) as i64;
    if diff < 1 {
        return -1.0;
    }
    (rand::random::<u64>() % diff as u64) as f64 + min
}

// Lanczos approximation (g = 7, n = 9).
const LANCZOS: [f64; 9] = [
    0.99999999999980993,
    676.5203681218851,
    -1259.1392167224028,
    771.32342877765313,
    -176.61502916214059,
    12.507343278686905,
    -0.13857109526572012,
    9.9843695780195716e-6,
    1.5056327351493116e-7,
];

fn gamma(x: f64) -> f64 {
    if x < 0.5 {
        return PI / ((PI * x).sin() * gamma(1.0 - x));
    }

    let x = x - 1.0;
    let mut acc = LANCZOS[0];
    for (i, coeff) in LANCZOS.iter().enumerate().skip(1) {
        acc += coeff / (x + i as f64);
    }
    let t = x + 7.5;
    (2.0 * PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * acc
}

// EvalError
// --------------------------------------------------

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            EvalError::Variable(ref name) => write!(f, "Cannot evaluate variable: {}", name),
            EvalError::UnknownOperator(ref name) => {
                write!(f, "No evaluation rule for operator: {}", name)
            }
            EvalError::MissingOperand(ref name) => {
                write!(f, "Missing operand of operator: {}", name)
            }
        }
    }
}

impl Error for EvalError {}

// Tests
// --------------------------------------------------

#[cfg(test)]
mod test {
    use arith::context::{context, extended_context};
    use syntax::parse_input;
    use super::*;

    fn eval_str(input: &str) -> Result<f64, EvalError> {
        let ops = context();
        let tree = parse_input(&ops, input).unwrap();
        eval(&ops, &tree)
    }

    fn assert_close(input: &str, expected: f64) {
        let value = eval_str(input).unwrap();
        assert!(
            (value - expected).abs() < 1e-9,
            "{} evaluated to {}, expected {}",
            input,
            value,
            expected
        );
    }

    #[test]
    fn scenarios() {
        assert_eq!(eval_str("1+2*3"), Ok(7.0));
        assert_eq!(eval_str("2(3+4)"), Ok(14.0));
        assert_eq!(eval_str("2^3^2"), Ok(512.0));
        assert_eq!(eval_str("max(1,2,3,4)"), Ok(4.0));
        assert_close("sum(1,2,3)^2-sin(pi/4)", 36.0 - (3.14159265359f64 / 4.0).sin());
    }

    #[test]
    fn unary_and_postfix() {
        assert_eq!(eval_str("5!"), Ok(120.0));
        assert_eq!(eval_str("50%"), Ok(0.5));
        assert_eq!(eval_str("-(1+2)"), Ok(-3.0));
        assert_eq!(eval_str("+5"), Ok(5.0));
        assert_eq!(eval_str("$(1+2)"), Ok(3.0));
    }

    #[test]
    fn binary_builtins() {
        assert_eq!(eval_str("4 C 2"), Ok(6.0));
        assert_eq!(eval_str("7 mod 3"), Ok(1.0));
        assert_eq!(eval_str("sqrt(16)"), Ok(4.0));
        assert_close("log(8,2)", 3.0);
        assert_close("root(27,3)", 3.0);
    }

    #[test]
    fn variadics_and_helpers() {
        assert_eq!(eval_str("min(5,2,8)"), Ok(2.0));
        assert_eq!(eval_str("prod(2,3,4)"), Ok(24.0));
        assert_eq!(eval_str("avg(1,2,3)"), Ok(2.0));
        assert_eq!(eval_str("avg"), Ok(0.0));
        assert_eq!(eval_str("fib(10)"), Ok(55.0));
        assert_close("gamma(5)", 24.0);
        assert_close("frac(2.75)", 0.75);
    }

    #[test]
    fn constants() {
        assert_close("pi", 3.14159265359);
        assert_close("2pi", 2.0 * 3.14159265359);
        assert_close("e^2", 2.71828182846f64 * 2.71828182846);
        assert_eq!(eval_str("clight"), Ok(299792458.0));
    }

    #[test]
    fn rand_range() {
        for _ in 0..32 {
            let value = eval_str("rand(1,5)").unwrap();
            assert!(1.0 <= value && value < 5.0);
            assert_eq!(value, value.trunc());
        }
        assert_eq!(eval_str("rand(5,5)"), Ok(-1.0));
    }

    #[test]
    fn comparisons() {
        let ops = extended_context();
        let tree = parse_input(&ops, "1+1 == 2").unwrap();
        assert_eq!(eval(&ops, &tree), Ok(1.0));
        let tree = parse_input(&ops, "3 < 2").unwrap();
        assert_eq!(eval(&ops, &tree), Ok(0.0));
    }

    #[test]
    fn failures() {
        assert_eq!(eval_str("x+1"), Err(EvalError::Variable("x".to_string())));
        assert_eq!(eval_str("sin"), Err(EvalError::MissingOperand("sin".to_string())));
    }
}
