//! A shunting-yard parser over a configurable operator table.
//!
//! The parser turns a token stream into a single owned [`Node`] tree.
//! It keeps two bounded stacks: a node stack of partially built
//! subtrees and an op stack whose entries record an operator together
//! with its operand-counting state; an entry without an operator is the
//! sentinel for an opening parenthesis.
//!
//! Function applications are resolved in two phases. A function token
//! is pushed tentatively (any overload of that name) with a counter
//! that delimiters and the closing parenthesis increment; when the
//! entry is reduced, the function is re-resolved by the counted arity,
//! falling back to the variadic overload. This composes with dynamic
//! arity without lookahead over the whole argument list.
//!
//! When a glue op is configured, it is synthesised between two adjacent
//! sub-expressions that lack an explicit connector, which makes `2x`
//! parse as `2*x` and `2(3+4)` as `2*(3+4)`.
//!
//! [`Node`]: ../repr/enum.Node.html

use syntax::error::ParseError;
use syntax::operators::{Arity, OpId, OpTable, Placement, Assoc};
use syntax::repr::Node;
use syntax::tokenizer::{is_closing_paren, is_delimiter, is_opening_paren};

/// The capacity of the node and op stacks. Nesting deeper than this
/// fails with `StackExceeded` rather than growing without bound.
pub const MAX_STACK_SIZE: usize = 128;

/// The largest operand count a single parameter list may reach.
pub const MAX_ARITY: usize = 100;

/// An operator while it sits on the op stack.
///
/// `op == None` is the opening-parenthesis sentinel. `arity` is the
/// number of children the entry reduces to; for functions it is the
/// running operand count and `count_operands` enables the counting
/// machinery and the overload re-resolution at reduction time.
struct OpData {
    op: Option<OpId>,
    count_operands: bool,
    arity: usize,
}

struct ParserState<'ctx> {
    ops: &'ctx OpTable,
    node_stack: Vec<Node>,
    op_stack: Vec<OpData>,
}

/// Parses a token stream into a tree under the given operator table.
pub fn parse_tokens(ops: &OpTable, tokens: &[String]) -> Result<Node, ParseError> {
    let mut state = ParserState::new(ops);

    // False while an operand, prefix operator, or function is expected;
    // true while an infix, a postfix, a delimiter, or a closing
    // parenthesis would be well-placed.
    let mut await_infix = false;

    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();

        // I. Synthesise the glue op between adjacent sub-expressions.
        if await_infix {
            if let Some(glue) = ops.glue_op() {
                if !is_closing_paren(token) && !is_delimiter(token)
                    && ops.lookup_op(token, Placement::Infix).is_none()
                    && ops.lookup_op(token, Placement::Postfix).is_none()
                {
                    state.push_operator(glue)?;
                    // The glue op never takes part in operand counting.
                    {
                        let top = state.op_peek_mut().unwrap();
                        top.count_operands = false;
                        top.arity = 2;
                    }
                    await_infix = false;
                }
            }
        }

        // II. Opening parenthesis.
        if is_opening_paren(token) {
            state.push_opening_paren()?;
            i += 1;
            continue;
        }

        // III. Closing parenthesis.
        if is_closing_paren(token) {
            loop {
                let at_sentinel = match state.op_peek() {
                    None => return Err(ParseError::ExcessClosingParen),
                    Some(data) => data.op.is_none(),
                };
                if at_sentinel {
                    break;
                }
                state.pop_and_insert()?;
            }
            state.op_stack.pop();

            // The parenthesis closed a parameter list: the operand that
            // just ended bumps the function's counter, unless the list
            // was empty.
            let empty_params = i > 0 && is_opening_paren(&tokens[i - 1]);
            if !empty_params {
                if let Some(top) = state.op_peek_mut() {
                    if top.count_operands {
                        if top.arity == MAX_ARITY {
                            return Err(ParseError::ChildrenExceeded);
                        }
                        top.arity += 1;
                    }
                }
            }

            await_infix = true;
            i += 1;
            continue;
        }

        // IV. Parameter delimiter.
        if is_delimiter(token) {
            loop {
                let at_sentinel = match state.op_peek() {
                    None => return Err(ParseError::UnexpectedDelimiter),
                    Some(data) => data.op.is_none(),
                };
                if at_sentinel {
                    break;
                }
                state.pop_and_insert()?;
            }

            // The delimiter belongs to the parameter list of the
            // function one entry below the sentinel.
            let n = state.op_stack.len();
            if n < 2 || !state.op_stack[n - 2].count_operands {
                return Err(ParseError::UnexpectedDelimiter);
            }
            if state.op_stack[n - 2].arity == MAX_ARITY {
                return Err(ParseError::ChildrenExceeded);
            }
            state.op_stack[n - 2].arity += 1;

            await_infix = false;
            i += 1;
            continue;
        }

        // V. Operators.
        if !await_infix {
            if let Some(id) = ops.lookup_op(token, Placement::Function) {
                state.push_operator(id)?;

                let next = tokens.get(i + 1).map(|tok| tok.as_str());
                let declared = ops.op(id).arity();
                let nullary = declared == Arity::Fixed(0) || declared == Arity::Dynamic;

                // A function without a usable argument list acts as a
                // constant: reduce it right away to a childless node.
                let bare = match next {
                    None => true,
                    Some(tok) if is_opening_paren(tok) => {
                        declared == Arity::Fixed(0) && !ops.is_function_overloaded(token)
                    }
                    Some(_) => nullary,
                };

                if bare {
                    // Skip over a literal empty parameter list.
                    if next.map(is_opening_paren).unwrap_or(false)
                        && tokens.get(i + 2).map(|tok| is_closing_paren(tok)).unwrap_or(false)
                    {
                        i += 2;
                    }
                    {
                        let top = state.op_peek_mut().unwrap();
                        top.count_operands = false;
                        top.arity = 0;
                    }
                    state.pop_and_insert()?;
                    await_infix = true;
                } else if !next.map(is_opening_paren).unwrap_or(false) {
                    // Unary application without parentheses, e.g. "sin 2".
                    state.op_peek_mut().unwrap().arity = 1;
                }

                i += 1;
                continue;
            }

            if let Some(id) = ops.lookup_op(token, Placement::Prefix) {
                state.push_operator(id)?;
                i += 1;
                continue;
            }
        } else {
            if let Some(id) = ops.lookup_op(token, Placement::Infix) {
                state.push_operator(id)?;
                await_infix = false;
                i += 1;
                continue;
            }

            if let Some(id) = ops.lookup_op(token, Placement::Postfix) {
                state.push_operator(id)?;
                await_infix = true;
                i += 1;
                continue;
            }

            // No infix, no postfix, and the glue op did not apply.
            return Err(ParseError::UnexpectedSubExpression);
        }

        // VI. The token is a leaf: a constant or a variable.
        let node = match token.parse::<f64>() {
            Ok(value) => Node::Constant(value),
            Err(_) => Node::Variable(token.to_string()),
        };
        state.node_push(node)?;
        await_infix = true;
        i += 1;
    }

    // Reduce everything still on the op stack.
    loop {
        let at_sentinel = match state.op_peek() {
            None => break,
            Some(data) => data.op.is_none(),
        };
        if at_sentinel {
            return Err(ParseError::ExcessOpeningParen);
        }
        state.pop_and_insert()?;
    }

    match state.node_stack.len() {
        0 => Err(ParseError::Empty),
        1 => Ok(state.node_stack.pop().unwrap()),
        _ => Err(ParseError::MissingOperator),
    }
}

// ParserState
// --------------------------------------------------

impl<'ctx> ParserState<'ctx> {
    fn new(ops: &'ctx OpTable) -> ParserState<'ctx> {
        ParserState {
            ops: ops,
            node_stack: Vec::with_capacity(32),
            op_stack: Vec::with_capacity(32),
        }
    }

    fn node_push(&mut self, node: Node) -> Result<(), ParseError> {
        if self.node_stack.len() == MAX_STACK_SIZE {
            return Err(ParseError::StackExceeded);
        }
        self.node_stack.push(node);
        Ok(())
    }

    fn node_pop(&mut self) -> Result<Node, ParseError> {
        self.node_stack.pop().ok_or(ParseError::MissingOperand)
    }

    fn op_peek(&self) -> Option<&OpData> {
        self.op_stack.last()
    }

    fn op_peek_mut(&mut self) -> Option<&mut OpData> {
        self.op_stack.last_mut()
    }

    /// Pushes an entry, first reducing every operator on top that binds
    /// at least as tightly (the shunting-yard discipline). A postfix
    /// operator is reduced immediately: its single operand is already
    /// on the node stack, so it never lingers.
    fn op_push(&mut self, data: OpData) -> Result<(), ParseError> {
        if let Some(id) = data.op {
            let placement = self.ops.op(id).placement();
            if placement == Placement::Infix || placement == Placement::Postfix {
                let prec = self.ops.op(id).precedence();
                let assoc = self.ops.op(id).assoc();
                loop {
                    let reduce = match self.op_stack.last() {
                        Some(&OpData { op: Some(top), .. }) => {
                            let top_prec = self.ops.op(top).precedence();
                            top_prec > prec || (top_prec == prec && assoc == Assoc::Left)
                        }
                        _ => false,
                    };
                    if !reduce {
                        break;
                    }
                    self.pop_and_insert()?;
                }
            }
        }

        if self.op_stack.len() == MAX_STACK_SIZE {
            return Err(ParseError::StackExceeded);
        }
        let postfix = match data.op {
            Some(id) => self.ops.op(id).placement() == Placement::Postfix,
            None => false,
        };
        self.op_stack.push(data);

        if postfix {
            self.pop_and_insert()?;
        }
        Ok(())
    }

    fn push_operator(&mut self, id: OpId) -> Result<(), ParseError> {
        let data = if self.ops.op(id).placement() == Placement::Function {
            OpData {
                op: Some(id),
                count_operands: true,
                arity: 0,
            }
        } else {
            let arity = match self.ops.op(id).arity() {
                Arity::Fixed(n) => n,
                Arity::Dynamic => 0,
            };
            OpData {
                op: Some(id),
                count_operands: false,
                arity: arity,
            }
        };
        self.op_push(data)
    }

    fn push_opening_paren(&mut self) -> Result<(), ParseError> {
        self.op_push(OpData {
            op: None,
            count_operands: false,
            arity: 0,
        })
    }

    /// Reduces the top op-stack entry into an operator node.
    ///
    /// A counting entry whose recorded arity differs from the declared
    /// one is re-resolved against the table: first by the exact counted
    /// arity, then by the variadic overload.
    fn pop_and_insert(&mut self) -> Result<(), ParseError> {
        let data = match self.op_stack.pop() {
            Some(data) => data,
            None => return Err(ParseError::MissingOperator),
        };
        let mut id = match data.op {
            Some(id) => id,
            // The sentinel is discarded by the caller, never here.
            None => return Err(ParseError::MissingOperator),
        };

        let ops = self.ops;
        if data.count_operands && ops.op(id).arity() != Arity::Fixed(data.arity) {
            let name = ops.op(id).name();
            id = match ops.lookup_function(name, Arity::Fixed(data.arity)) {
                Some(exact) => exact,
                None => match ops.lookup_function(name, Arity::Dynamic) {
                    Some(dynamic) => dynamic,
                    None => return Err(ParseError::FunctionWrongArity),
                },
            };
        }

        let mut children = Vec::with_capacity(data.arity);
        for _ in 0..data.arity {
            children.push(self.node_pop()?);
        }
        children.reverse();
        self.node_push(Node::Operator(id, children))
    }
}

// Tests
// --------------------------------------------------

#[cfg(test)]
mod test {
    use arith;
    use syntax::operators::{Arity, Assoc, Operator, OpTable, Placement};
    use syntax::parse_input;
    use syntax::repr::Node;
    use super::*;

    fn parse(input: &str) -> Result<Node, ParseError> {
        parse_input(&arith::context(), input)
    }

    fn op(ops: &OpTable, name: &str, placement: Placement) -> ::syntax::operators::OpId {
        ops.lookup_op(name, placement).unwrap()
    }

    #[test]
    fn precedence() {
        let ops = arith::context();
        let plus = op(&ops, "+", Placement::Infix);
        let times = op(&ops, "*", Placement::Infix);
        let tree = parse_input(&ops, "1+2*3").unwrap();
        let expected = Node::Operator(
            plus,
            vec![
                Node::Constant(1.0),
                Node::Operator(times, vec![Node::Constant(2.0), Node::Constant(3.0)]),
            ],
        );
        assert_eq!(tree, expected);
    }

    #[test]
    fn right_assoc() {
        let ops = arith::context();
        let pow = op(&ops, "^", Placement::Infix);
        let tree = parse_input(&ops, "2^3^2").unwrap();
        let expected = Node::Operator(
            pow,
            vec![
                Node::Constant(2.0),
                Node::Operator(pow, vec![Node::Constant(3.0), Node::Constant(2.0)]),
            ],
        );
        assert_eq!(tree, expected);
    }

    #[test]
    fn glue_op() {
        let ops = arith::context();
        let plus = op(&ops, "+", Placement::Infix);
        let times = op(&ops, "*", Placement::Infix);
        let tree = parse_input(&ops, "2(3+4)").unwrap();
        let expected = Node::Operator(
            times,
            vec![
                Node::Constant(2.0),
                Node::Operator(plus, vec![Node::Constant(3.0), Node::Constant(4.0)]),
            ],
        );
        assert_eq!(tree, expected);

        // Juxtaposed variables glue the same way.
        let tree = parse_input(&ops, "2x").unwrap();
        let expected = Node::Operator(
            times,
            vec![Node::Constant(2.0), Node::variable("x")],
        );
        assert_eq!(tree, expected);
    }

    #[test]
    fn no_glue_op() {
        let mut ops = arith::context();
        ops.remove_glue_op();
        assert_eq!(parse_input(&ops, "2 3"), Err(ParseError::UnexpectedSubExpression));
    }

    #[test]
    fn bare_function() {
        let ops = arith::context();
        let sin = op(&ops, "sin", Placement::Function);
        assert_eq!(parse_input(&ops, "sin"), Ok(Node::Operator(sin, vec![])));
    }

    #[test]
    fn constants() {
        let ops = arith::context();
        let pi = op(&ops, "pi", Placement::Function);
        let times = op(&ops, "*", Placement::Infix);
        assert_eq!(parse_input(&ops, "pi"), Ok(Node::Operator(pi, vec![])));
        assert_eq!(parse_input(&ops, "pi()"), Ok(Node::Operator(pi, vec![])));
        let expected = Node::Operator(
            times,
            vec![Node::Constant(2.0), Node::Operator(pi, vec![])],
        );
        assert_eq!(parse_input(&ops, "2pi"), Ok(expected));
    }

    #[test]
    fn unary_without_parens() {
        let ops = arith::context();
        let sin = op(&ops, "sin", Placement::Function);
        let expected = Node::Operator(sin, vec![Node::Constant(2.0)]);
        assert_eq!(parse_input(&ops, "sin 2"), Ok(expected.clone()));
        assert_eq!(parse_input(&ops, "sin2"), Ok(expected));

        // The function still binds tighter than any infix.
        let plus = op(&ops, "+", Placement::Infix);
        let expected = Node::Operator(
            plus,
            vec![
                Node::Operator(sin, vec![Node::Constant(2.0)]),
                Node::Constant(3.0),
            ],
        );
        assert_eq!(parse_input(&ops, "sin 2+3"), Ok(expected));
    }

    #[test]
    fn variadic() {
        let ops = arith::context();
        let max = op(&ops, "max", Placement::Function);
        let tree = parse_input(&ops, "max(1,2,3,4)").unwrap();
        assert_eq!(tree.op_id(), max);
        assert_eq!(tree.children().len(), 4);

        let tree = parse_input(&ops, "max()").unwrap();
        assert_eq!(tree, Node::Operator(max, vec![]));
    }

    #[test]
    fn overload_resolution() {
        let mut ops = OpTable::new();
        ops.add_ops(vec![
            Operator::infix("+", 2, Assoc::Left),
            Operator::function("f", Arity::Fixed(1)),
            Operator::function("f", Arity::Fixed(2)),
        ]).unwrap();
        let f1 = ops.lookup_function("f", Arity::Fixed(1)).unwrap();
        let f2 = ops.lookup_function("f", Arity::Fixed(2)).unwrap();

        let tree = parse_input(&ops, "f(1)").unwrap();
        assert_eq!(tree.op_id(), f1);
        let tree = parse_input(&ops, "f(1,2)").unwrap();
        assert_eq!(tree.op_id(), f2);
        assert_eq!(parse_input(&ops, "f(1,2,3)"), Err(ParseError::FunctionWrongArity));
    }

    #[test]
    fn dynamic_fallback() {
        let mut ops = OpTable::new();
        ops.add_ops(vec![
            Operator::function("g", Arity::Fixed(2)),
            Operator::function("g", Arity::Dynamic),
        ]).unwrap();
        let g2 = ops.lookup_function("g", Arity::Fixed(2)).unwrap();
        let gn = ops.lookup_function("g", Arity::Dynamic).unwrap();

        assert_eq!(parse_input(&ops, "g(1,2)").unwrap().op_id(), g2);
        assert_eq!(parse_input(&ops, "g(1,2,3)").unwrap().op_id(), gn);
    }

    #[test]
    fn nested_calls() {
        let ops = arith::context();
        let max = op(&ops, "max", Placement::Function);
        let tree = parse_input(&ops, "max(1, max(2,3), 4)").unwrap();
        assert_eq!(tree.children().len(), 3);
        assert_eq!(tree.child(1).op_id(), max);
        assert_eq!(tree.child(1).children().len(), 2);
    }

    #[test]
    fn prefix_operators() {
        let ops = arith::context();
        let neg = op(&ops, "-", Placement::Prefix);
        let pow = op(&ops, "^", Placement::Infix);

        let tree = parse_input(&ops, "--2").unwrap();
        let expected = Node::Operator(
            neg,
            vec![Node::Operator(neg, vec![Node::Constant(2.0)])],
        );
        assert_eq!(tree, expected);

        // The prefix minus binds tighter than the power operator.
        let tree = parse_input(&ops, "-2^2").unwrap();
        let expected = Node::Operator(
            pow,
            vec![
                Node::Operator(neg, vec![Node::Constant(2.0)]),
                Node::Constant(2.0),
            ],
        );
        assert_eq!(tree, expected);
    }

    #[test]
    fn postfix_operators() {
        let ops = arith::context();
        let fact = op(&ops, "!", Placement::Postfix);
        let plus = op(&ops, "+", Placement::Infix);
        let tree = parse_input(&ops, "3!+2").unwrap();
        let expected = Node::Operator(
            plus,
            vec![
                Node::Operator(fact, vec![Node::Constant(3.0)]),
                Node::Constant(2.0),
            ],
        );
        assert_eq!(tree, expected);
    }

    #[test]
    fn structural_errors() {
        assert_eq!(parse("(1+2))"), Err(ParseError::ExcessClosingParen));
        assert_eq!(parse("((1+2)"), Err(ParseError::ExcessOpeningParen));
        assert_eq!(parse(""), Err(ParseError::Empty));
        assert_eq!(parse("()"), Err(ParseError::Empty));
        assert_eq!(parse("1+"), Err(ParseError::MissingOperand));
        assert_eq!(parse("1,2"), Err(ParseError::UnexpectedDelimiter));
        assert_eq!(parse("2*(3,4)"), Err(ParseError::UnexpectedDelimiter));
        assert_eq!(parse("sin()"), Err(ParseError::FunctionWrongArity));
    }

    #[test]
    fn stack_exceeded() {
        let ops = arith::context();
        let tokens: Vec<String> = (0..MAX_STACK_SIZE + 1).map(|_| "(".to_string()).collect();
        assert_eq!(parse_tokens(&ops, &tokens), Err(ParseError::StackExceeded));
    }

    #[test]
    fn children_exceeded() {
        let ops = arith::context();
        let mut tokens = vec!["max".to_string(), "(".to_string()];
        for _ in 0..MAX_ARITY {
            tokens.push("1".to_string());
            tokens.push(",".to_string());
        }
        tokens.push("1".to_string());
        tokens.push(")".to_string());
        assert_eq!(parse_tokens(&ops, &tokens), Err(ParseError::ChildrenExceeded));
    }

    #[test]
    fn arity_invariant() {
        let ops = arith::context();
        for input in ["1+2*3", "max(1,2,3)", "sin(pi/4)", "-2!", "2 sin 3"].iter() {
            let tree = parse_input(&ops, input).unwrap();
            check_arity(&ops, &tree);
        }
    }

    fn check_arity(ops: &OpTable, node: &Node) {
        if let Node::Operator(id, ref children) = *node {
            match ops.op(id).arity() {
                Arity::Fixed(n) => assert_eq!(children.len(), n),
                Arity::Dynamic => (),
            }
            for child in children {
                check_arity(ops, child);
            }
        }
    }
}
