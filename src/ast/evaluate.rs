//! Node evaluation.
//!
//! Evaluation reduces a node to a literal node (number, string, boolean,
//! null, list, or hash) against a context, or fails with an [`EvalError`].
//! The source tree is never rewritten; container literals evaluate into
//! fresh cells, variable reads hand back the stored tree sharing its cells,
//! and every store (plain, indexed, or argument binding) deep-copies the
//! incoming value so aliasing only ever flows through the cells inside one
//! stored tree.
//!
//! Operator chains evaluate edge by edge through their written symbols:
//! additive and multiplicative chains fold left, `**` folds right,
//! comparison chains hold pairwise, and the logical chains short-circuit
//! without touching the remaining children.

use crate::ast::cell::Cell;
use crate::ast::node::{Node, OperatorKind, OperatorSymbol, UnaryOp};
use crate::context::Context;
use crate::error::EvalError;
use crate::functions::{ExpressionFunction, Function, NativeKind};
use crate::number::Number;
use crate::value::Value;
use std::cmp::Ordering;
use std::rc::Rc;

impl Node {
    /// Evaluates the node against `context`, producing a literal node.
    pub fn evaluate(&self, context: &Context) -> Result<Node, EvalError> {
        match self {
            Node::Number(_) | Node::String(_) | Node::Boolean(_) | Node::Null => Ok(self.clone()),
            Node::Variable(name) => context
                .variable(name)
                .ok_or_else(|| EvalError::UndefinedVariable(name.clone())),
            Node::List(cells) => {
                let mut elements = Vec::with_capacity(cells.len());
                for cell in cells {
                    elements.push(Cell::new(cell.get().evaluate(context)?));
                }
                Ok(Node::List(elements))
            }
            Node::Hash(pairs) => evaluate_hash(pairs, context),
            Node::Unary { op, child } => evaluate_unary(*op, child, context),
            Node::Operator {
                op,
                children,
                symbols,
            } => evaluate_operator(*op, children, symbols, context),
            Node::Function { name, args } => {
                let function = context
                    .function(name)
                    .ok_or_else(|| EvalError::UndefinedFunction(name.clone()))?;
                call_function(&function, args, context)
            }
            Node::Indexing { target, index } => {
                let container = target.evaluate(context)?;
                let key = index.evaluate(context)?.to_value()?;
                index_read(&container, &key)
            }
            Node::Assignment { target, value } => evaluate_assignment(target, value, context),
            Node::Block(child) => {
                let scope = context.spawn_child(false);
                child.evaluate(&scope)
            }
            Node::MultiLine(children) => {
                let mut result = Node::Null;
                for child in children {
                    result = child.evaluate(context)?;
                }
                Ok(result)
            }
        }
    }
}

/// Duplicate keys keep their first position but take the last value.
fn evaluate_hash(pairs: &[(Node, Cell)], context: &Context) -> Result<Node, EvalError> {
    let mut entries: Vec<(Node, Cell)> = Vec::with_capacity(pairs.len());
    for (key, value) in pairs {
        let key_node = key.evaluate(context)?;
        let key_value = key_node.to_value()?;
        let value_node = value.get().evaluate(context)?;
        let existing = entries.iter_mut().find(|(k, _)| {
            k.to_value()
                .map(|v| v.eq_value(&key_value))
                .unwrap_or(false)
        });
        match existing {
            Some(entry) => entry.1 = Cell::new(value_node),
            None => entries.push((key_node, Cell::new(value_node))),
        }
    }
    Ok(Node::Hash(entries))
}

fn evaluate_unary(op: UnaryOp, child: &Node, context: &Context) -> Result<Node, EvalError> {
    let value = child.evaluate(context)?;
    match op {
        UnaryOp::Identity => Ok(value),
        UnaryOp::Plus => match value {
            Node::Number(_) => Ok(value),
            other => Err(EvalError::Calculation(format!(
                "unary + requires a number, found {}",
                other.type_name()
            ))),
        },
        UnaryOp::Minus => Ok(Node::Number(number_operand(&value)?.neg()?)),
        UnaryOp::Inverse => Ok(Node::Number(number_operand(&value)?.inverse()?)),
        UnaryOp::BitwiseNot => Ok(Node::integer(!integer_operand(&value)?)),
        UnaryOp::LogicalNot => match value {
            Node::Boolean(b) => Ok(Node::Boolean(!b)),
            other => Err(EvalError::Calculation(format!(
                "unary ! requires a boolean, found {}",
                other.type_name()
            ))),
        },
    }
}

fn evaluate_operator(
    op: OperatorKind,
    children: &[Node],
    symbols: &[OperatorSymbol],
    context: &Context,
) -> Result<Node, EvalError> {
    match op {
        OperatorKind::LogicalAnd => logical_chain(children, context, true),
        OperatorKind::LogicalOr => logical_chain(children, context, false),
        OperatorKind::Exponent => exponent_chain(children, context),
        OperatorKind::Equal
        | OperatorKind::NotEqual
        | OperatorKind::LessThan
        | OperatorKind::GreaterThan
        | OperatorKind::LessThanOrEqual
        | OperatorKind::GreaterThanOrEqual => comparison_chain(children, symbols, context),
        OperatorKind::Plus
        | OperatorKind::Times
        | OperatorKind::Modulo
        | OperatorKind::BitwiseAnd
        | OperatorKind::BitwiseOr
        | OperatorKind::BitwiseXor => fold_chain(children, symbols, context),
    }
}

/// Short-circuiting boolean chain. `fold` is the identity of the chain:
/// `true` for `&&`, `false` for `||`; the first child evaluating to the
/// opposite ends the chain without evaluating the rest.
fn logical_chain(children: &[Node], context: &Context, fold: bool) -> Result<Node, EvalError> {
    for child in children {
        match child.evaluate(context)? {
            Node::Boolean(b) => {
                if b != fold {
                    return Ok(Node::Boolean(b));
                }
            }
            other => {
                return Err(EvalError::Calculation(format!(
                    "logical operators require booleans, found {}",
                    other.type_name()
                )));
            }
        }
    }
    Ok(Node::Boolean(fold))
}

/// `**` is right associative: children evaluate left to right, powers fold
/// from the right.
fn exponent_chain(children: &[Node], context: &Context) -> Result<Node, EvalError> {
    let mut numbers = Vec::with_capacity(children.len());
    for child in children {
        numbers.push(number_operand(&child.evaluate(context)?)?);
    }
    let mut acc = numbers
        .pop()
        .ok_or_else(|| EvalError::InvalidExpression("empty operator chain".into()))?;
    while let Some(base) = numbers.pop() {
        acc = base.pow(&acc)?;
    }
    Ok(Node::Number(acc))
}

/// A comparison chain holds when every adjacent pair holds; the first
/// failing pair ends the chain without evaluating the rest.
fn comparison_chain(
    children: &[Node],
    symbols: &[OperatorSymbol],
    context: &Context,
) -> Result<Node, EvalError> {
    check_chain(children, symbols)?;
    let mut left = children[0].evaluate(context)?;
    for (symbol, child) in symbols.iter().zip(&children[1..]) {
        let right = child.evaluate(context)?;
        if !compare_pair(*symbol, &left, &right)? {
            return Ok(Node::Boolean(false));
        }
        left = right;
    }
    Ok(Node::Boolean(true))
}

fn fold_chain(
    children: &[Node],
    symbols: &[OperatorSymbol],
    context: &Context,
) -> Result<Node, EvalError> {
    check_chain(children, symbols)?;
    let mut acc = children[0].evaluate(context)?;
    for (symbol, child) in symbols.iter().zip(&children[1..]) {
        let right = child.evaluate(context)?;
        acc = apply_binary(*symbol, &acc, &right)?;
    }
    Ok(acc)
}

pub(crate) fn check_chain(children: &[Node], symbols: &[OperatorSymbol]) -> Result<(), EvalError> {
    if children.len() == symbols.len() + 1 {
        Ok(())
    } else {
        Err(EvalError::InvalidExpression(format!(
            "operator chain has {} children for {} symbols",
            children.len(),
            symbols.len()
        )))
    }
}

/// One edge of a left-folding chain. Addition also concatenates strings and
/// lists; every other symbol is numeric or bitwise-integer.
pub(crate) fn apply_binary(
    symbol: OperatorSymbol,
    left: &Node,
    right: &Node,
) -> Result<Node, EvalError> {
    match symbol {
        OperatorSymbol::Plus => match (left, right) {
            (Node::Number(a), Node::Number(b)) => Ok(Node::Number(a.add(b)?)),
            (Node::String(a), Node::String(b)) => Ok(Node::String(format!("{}{}", a, b))),
            (Node::List(a), Node::List(b)) => {
                Ok(Node::List(a.iter().chain(b).cloned().collect()))
            }
            _ => Err(binary_type_error("+", left, right)),
        },
        OperatorSymbol::Minus => numeric_edge(left, right, "-", Number::sub),
        OperatorSymbol::Times => numeric_edge(left, right, "*", Number::mul),
        OperatorSymbol::Divide => numeric_edge(left, right, "/", Number::div),
        OperatorSymbol::Modulo => numeric_edge(left, right, "%", Number::rem),
        OperatorSymbol::Exponent => numeric_edge(left, right, "**", Number::pow),
        OperatorSymbol::BitwiseAnd => bitwise_edge(left, right, |a, b| a & b),
        OperatorSymbol::BitwiseOr => bitwise_edge(left, right, |a, b| a | b),
        OperatorSymbol::BitwiseXor => bitwise_edge(left, right, |a, b| a ^ b),
        other => Err(EvalError::InvalidExpression(format!(
            "operator \"{}\" does not fold left",
            other.as_str()
        ))),
    }
}

fn numeric_edge(
    left: &Node,
    right: &Node,
    symbol: &str,
    op: fn(&Number, &Number) -> Result<Number, EvalError>,
) -> Result<Node, EvalError> {
    match (left, right) {
        (Node::Number(a), Node::Number(b)) => Ok(Node::Number(op(a, b)?)),
        _ => Err(binary_type_error(symbol, left, right)),
    }
}

fn bitwise_edge(left: &Node, right: &Node, op: fn(i128, i128) -> i128) -> Result<Node, EvalError> {
    let a = integer_operand(left)?;
    let b = integer_operand(right)?;
    Ok(Node::integer(op(a, b)))
}

fn binary_type_error(symbol: &str, left: &Node, right: &Node) -> EvalError {
    EvalError::Calculation(format!(
        "cannot apply \"{}\" to {} and {}",
        symbol,
        left.type_name(),
        right.type_name()
    ))
}

/// One edge of a comparison chain. Equality compares across types and is
/// false on mismatch; orderings hold for number pairs and string pairs
/// only. Unordered float comparisons (NaN) are false, not errors.
fn compare_pair(symbol: OperatorSymbol, left: &Node, right: &Node) -> Result<bool, EvalError> {
    match symbol {
        OperatorSymbol::Equal => Ok(left.to_value()?.eq_value(&right.to_value()?)),
        OperatorSymbol::NotEqual => Ok(!left.to_value()?.eq_value(&right.to_value()?)),
        OperatorSymbol::LessThan
        | OperatorSymbol::GreaterThan
        | OperatorSymbol::LessThanOrEqual
        | OperatorSymbol::GreaterThanOrEqual => {
            let order = match (left, right) {
                (Node::Number(a), Node::Number(b)) => a.compare(b),
                (Node::String(a), Node::String(b)) => Some(a.cmp(b)),
                _ => return Err(binary_type_error(symbol.as_str(), left, right)),
            };
            Ok(match order {
                None => false,
                Some(order) => match symbol {
                    OperatorSymbol::LessThan => order == Ordering::Less,
                    OperatorSymbol::GreaterThan => order == Ordering::Greater,
                    OperatorSymbol::LessThanOrEqual => order != Ordering::Greater,
                    _ => order != Ordering::Less,
                },
            })
        }
        other => Err(EvalError::InvalidExpression(format!(
            "operator \"{}\" is not a comparison",
            other.as_str()
        ))),
    }
}

fn number_operand(node: &Node) -> Result<Number, EvalError> {
    match node {
        Node::Number(n) => Ok(*n),
        other => Err(EvalError::Calculation(format!(
            "expected a number, found {}",
            other.type_name()
        ))),
    }
}

fn integer_operand(node: &Node) -> Result<i128, EvalError> {
    match node {
        Node::Number(n) => n.as_integer().ok_or_else(|| {
            EvalError::Calculation(format!("bitwise operators require integers, found {}", n))
        }),
        other => Err(EvalError::Calculation(format!(
            "bitwise operators require integers, found {}",
            other.type_name()
        ))),
    }
}

// Function calls

fn call_function(
    function: &Rc<Function>,
    args: &[Node],
    context: &Context,
) -> Result<Node, EvalError> {
    let arity = function.arity();
    if !arity.accepts(args.len()) {
        return Err(EvalError::InvalidExpression(format!(
            "function {} takes {} arguments, found {}",
            function.name(),
            arity,
            args.len()
        )));
    }
    match function.as_ref() {
        Function::Native(native) => match &native.kind {
            NativeKind::Lazy(body) => body(args, context),
            NativeKind::Eager(body) => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(arg.evaluate(context)?.to_value()?);
                }
                Ok(Node::from_value(body(&values)?))
            }
        },
        Function::Expression(expression) => {
            // arguments evaluate in the calling context, the body under a
            // transient frame over the captured one
            let frame = expression.captured.spawn_child(true);
            for (param, arg) in expression.params.iter().zip(args) {
                let argument = arg.evaluate(context)?;
                frame.bind_variable(param, argument.deep_dup());
            }
            if expression.recursive {
                frame.bind_rc_function(function.clone());
            }
            expression.body.evaluate(&frame)
        }
    }
}

// Indexing

fn index_read(container: &Node, key: &Value) -> Result<Node, EvalError> {
    match container {
        Node::List(cells) => match list_position(cells.len(), key)? {
            Some(i) => Ok(cells[i].get()),
            None => Ok(Node::Null),
        },
        Node::Hash(pairs) => match hash_cell(pairs, key) {
            Some(cell) => Ok(cell.get()),
            None => Ok(Node::Null),
        },
        other => Err(EvalError::InvalidExpression(format!(
            "cannot index into {}",
            other.type_name()
        ))),
    }
}

/// Resolves a list index, counting from the back when negative. `None`
/// means out of range.
fn list_position(len: usize, key: &Value) -> Result<Option<usize>, EvalError> {
    let index = match key {
        Value::Number(n) => n.as_integer(),
        _ => None,
    };
    let Some(index) = index else {
        return Err(EvalError::InvalidExpression(format!(
            "list index must be an integer, found {}",
            key
        )));
    };
    let len = len as i128;
    let wrapped = if index < 0 { index + len } else { index };
    if (0..len).contains(&wrapped) {
        Ok(Some(wrapped as usize))
    } else {
        Ok(None)
    }
}

fn hash_cell<'a>(pairs: &'a [(Node, Cell)], key: &Value) -> Option<&'a Cell> {
    pairs.iter().find_map(|(k, cell)| match k.to_value() {
        Ok(v) if v.eq_value(key) => Some(cell),
        _ => None,
    })
}

// Assignment

fn evaluate_assignment(target: &Node, value: &Node, context: &Context) -> Result<Node, EvalError> {
    match target {
        Node::Variable(name) => {
            let result = value.evaluate(context)?;
            context.assign(name, result.deep_dup());
            Ok(result)
        }
        Node::Indexing { .. } => {
            let cell = assignment_cell(target, context)?;
            let result = value.evaluate(context)?;
            cell.set(result.deep_dup());
            Ok(result)
        }
        Node::Function { name, args } => define_function(name, args, value, context),
        other => Err(EvalError::InvalidExpression(format!(
            "cannot assign to {}",
            other.type_name()
        ))),
    }
}

/// The storage cell an indexed assignment writes through. Walking the path
/// stays inside cells the whole way down, which is what keeps the write
/// visible in the stored tree. A missing hash key is inserted; a list index
/// out of range is an error.
fn assignment_cell(node: &Node, context: &Context) -> Result<Cell, EvalError> {
    match node {
        Node::Variable(name) => context
            .cell(name)
            .ok_or_else(|| EvalError::UndefinedVariable(name.clone())),
        Node::Indexing { target, index } => {
            let parent = assignment_cell(target, context)?;
            let key = index.evaluate(context)?.to_value()?;
            locate_or_insert(&parent, &key)
        }
        other => Err(EvalError::InvalidExpression(format!(
            "cannot assign into {}",
            other.type_name()
        ))),
    }
}

fn locate_or_insert(parent: &Cell, key: &Value) -> Result<Cell, EvalError> {
    let mut node = parent.borrow_mut();
    match &mut *node {
        Node::List(cells) => match list_position(cells.len(), key)? {
            Some(i) => Ok(cells[i].clone()),
            None => Err(EvalError::InvalidExpression(format!(
                "list index {} is out of range",
                key
            ))),
        },
        Node::Hash(pairs) => {
            if let Some(cell) = hash_cell(pairs, key) {
                return Ok(cell.clone());
            }
            let cell = Cell::new(Node::Null);
            pairs.push((Node::from_value(key.clone()), cell.clone()));
            Ok(cell)
        }
        other => Err(EvalError::InvalidExpression(format!(
            "cannot index into {}",
            other.type_name()
        ))),
    }
}

// Function definition

/// Evaluating `f(x, y) = body` validates the body against the definition
/// context: every variable must be a parameter or already defined, and
/// every function must be defined, except that the body may call `f`
/// itself when the context permits recursion. The function closes over the
/// definition context.
fn define_function(
    name: &str,
    args: &[Node],
    value: &Node,
    context: &Context,
) -> Result<Node, EvalError> {
    let mut params = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Node::Variable(param) => params.push(param.clone()),
            other => {
                return Err(EvalError::InvalidExpression(format!(
                    "function definition arguments must be variable names, found {}",
                    other.type_name()
                )));
            }
        }
    }

    let mut free_variables = value.unbound_variables(context);
    for param in &params {
        free_variables.remove(param);
    }
    if !free_variables.is_empty() {
        return Err(EvalError::InvalidExpression(format!(
            "function {} references undefined variables: {}",
            name,
            join_names(&free_variables)
        )));
    }

    let mut free_functions = value.unbound_functions(context);
    let recursive = free_functions.remove(name);
    if recursive && !context.allow_recursive() {
        return Err(EvalError::InvalidExpression(format!(
            "function {} cannot call itself unless recursion is enabled",
            name
        )));
    }
    if !free_functions.is_empty() {
        return Err(EvalError::InvalidExpression(format!(
            "function {} references undefined functions: {}",
            name,
            join_names(&free_functions)
        )));
    }

    context.assign_function(Function::Expression(ExpressionFunction {
        name: name.to_string(),
        params,
        body: value.deep_dup(),
        captured: context.clone(),
        recursive,
    }));
    Ok(Node::Null)
}

fn join_names(names: &std::collections::BTreeSet<String>) -> String {
    names.iter().cloned().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn eval(text: &str, context: &Context) -> Result<Node, EvalError> {
        build(&parse(&tokenize(text).unwrap()).unwrap())
            .unwrap()
            .evaluate(context)
    }

    #[test]
    fn chains_fold_left_edge_by_edge() {
        let context = Context::new();
        assert_eq!(eval("10 - 2 + 3", &context).unwrap(), Node::integer(11));
        assert_eq!(eval("95 % 7 % 5", &context).unwrap(), Node::integer(4));
        assert_eq!(eval("20 / 2 * 5", &context).unwrap(), Node::integer(50));
    }

    #[test]
    fn exponent_folds_right() {
        let context = Context::new();
        assert_eq!(eval("2**3**2", &context).unwrap(), Node::integer(512));
    }

    #[test]
    fn logical_chains_short_circuit() {
        let context = Context::new();
        // the undefined variable is never evaluated
        assert_eq!(
            eval("false && boom", &context).unwrap(),
            Node::Boolean(false)
        );
        assert_eq!(eval("true || boom", &context).unwrap(), Node::Boolean(true));
        assert!(matches!(
            eval("true && boom", &context),
            Err(EvalError::UndefinedVariable(_))
        ));
    }

    #[test]
    fn comparison_chains_hold_pairwise() {
        let context = Context::new();
        assert_eq!(eval("1 < 2 <= 2", &context).unwrap(), Node::Boolean(true));
        assert_eq!(eval("1 < 2 < 2", &context).unwrap(), Node::Boolean(false));
    }

    #[test]
    fn equality_across_types_is_false_not_an_error() {
        let context = Context::new();
        assert_eq!(eval("1 == 'one'", &context).unwrap(), Node::Boolean(false));
        assert_eq!(eval("1 != 'one'", &context).unwrap(), Node::Boolean(true));
    }

    #[test]
    fn strict_booleans_for_logic() {
        let context = Context::new();
        assert!(matches!(
            eval("1 && true", &context),
            Err(EvalError::Calculation(_))
        ));
    }

    #[test]
    fn negative_list_indices_count_from_the_back() {
        let context = Context::new();
        assert_eq!(eval("[1, 2, 3][-1]", &context).unwrap(), Node::integer(3));
        assert_eq!(eval("[1, 2, 3][5]", &context).unwrap(), Node::Null);
    }

    #[test]
    fn assignment_returns_its_value() {
        let context = Context::new();
        assert_eq!(eval("x = 4", &context).unwrap(), Node::integer(4));
        assert_eq!(context.variable("x"), Some(Node::integer(4)));
    }
}
