//! Partial evaluation of nodes.
//!
//! Simplification folds the parts of a tree it can prove constant and
//! leaves the rest symbolic, so `10 + x + 5 + y` becomes `15 + x + y`
//! without knowing `x` or `y`. Bound variables substitute their values,
//! assignments of constants store through to the context, and defined
//! functions fold once every argument is constant. Unlike evaluation,
//! hitting an undefined name is not an error; the node simply stays as
//! written. Simplifying an already simplified tree changes nothing.

use crate::ast::cell::Cell;
use crate::ast::evaluate::check_chain;
use crate::ast::node::{Node, OperatorKind, OperatorSymbol, UnaryOp};
use crate::context::Context;
use crate::error::EvalError;
use crate::number::Number;

impl Node {
    /// Reduces constant subtrees against `context`, leaving unresolved
    /// names in place.
    pub fn simplify(&self, context: &Context) -> Result<Node, EvalError> {
        match self {
            Node::Number(_) | Node::String(_) | Node::Boolean(_) | Node::Null => Ok(self.clone()),
            Node::Variable(name) => Ok(context.variable(name).unwrap_or_else(|| self.clone())),
            Node::List(cells) => {
                let mut elements = Vec::with_capacity(cells.len());
                for cell in cells {
                    elements.push(Cell::new(cell.get().simplify(context)?));
                }
                Ok(Node::List(elements))
            }
            Node::Hash(pairs) => {
                let mut entries = Vec::with_capacity(pairs.len());
                for (key, value) in pairs {
                    entries.push((
                        key.simplify(context)?,
                        Cell::new(value.get().simplify(context)?),
                    ));
                }
                Ok(Node::Hash(entries))
            }
            Node::Unary { op, child } => {
                let child = child.simplify(context)?;
                if matches!(op, UnaryOp::Identity) {
                    return Ok(child);
                }
                let node = Node::Unary {
                    op: *op,
                    child: Box::new(child),
                };
                if let Node::Unary { child, .. } = &node {
                    if child.is_constant() {
                        return node.evaluate(context);
                    }
                }
                Ok(node)
            }
            Node::Operator {
                op,
                children,
                symbols,
            } => simplify_operator(*op, children, symbols, context),
            Node::Function { name, args } => {
                let mut simplified = Vec::with_capacity(args.len());
                for arg in args {
                    simplified.push(arg.simplify(context)?);
                }
                let foldable =
                    context.has_function(name) && simplified.iter().all(Node::is_constant);
                let node = Node::Function {
                    name: name.clone(),
                    args: simplified,
                };
                if foldable {
                    match node.evaluate(context) {
                        Ok(result) => Ok(result),
                        Err(EvalError::UndefinedVariable(_))
                        | Err(EvalError::UndefinedFunction(_)) => Ok(node),
                        Err(error) => Err(error),
                    }
                } else {
                    Ok(node)
                }
            }
            Node::Indexing { target, index } => {
                let target = target.simplify(context)?;
                let index = index.simplify(context)?;
                let node = Node::Indexing {
                    target: Box::new(target),
                    index: Box::new(index),
                };
                if let Node::Indexing { target, index } = &node {
                    if target.is_constant() && index.is_constant() {
                        return node.evaluate(context);
                    }
                }
                Ok(node)
            }
            Node::Assignment { target, value } => match target.as_ref() {
                Node::Variable(name) => {
                    let value = value.simplify(context)?;
                    if value.is_constant() {
                        context.assign(name, value.deep_dup());
                        Ok(value)
                    } else {
                        Ok(Node::Assignment {
                            target: target.clone(),
                            value: Box::new(value),
                        })
                    }
                }
                _ => Ok(Node::Assignment {
                    target: target.clone(),
                    value: Box::new(value.simplify(context)?),
                }),
            },
            // blocks simplify in the enclosing scope; only evaluation
            // spawns one
            Node::Block(child) => Ok(Node::Block(Box::new(child.simplify(context)?))),
            Node::MultiLine(children) => {
                let mut lines = Vec::with_capacity(children.len());
                for child in children {
                    lines.push(child.simplify(context)?);
                }
                Ok(Node::MultiLine(lines))
            }
        }
    }
}

fn simplify_operator(
    op: OperatorKind,
    children: &[Node],
    symbols: &[OperatorSymbol],
    context: &Context,
) -> Result<Node, EvalError> {
    check_chain(children, symbols)?;
    let mut simplified = Vec::with_capacity(children.len());
    for child in children {
        simplified.push(child.simplify(context)?);
    }

    match op {
        OperatorKind::LogicalAnd => Ok(logical_prefix(simplified, op, true)),
        OperatorKind::LogicalOr => Ok(logical_prefix(simplified, op, false)),
        OperatorKind::Plus | OperatorKind::Times => {
            let additive = op == OperatorKind::Plus;
            let in_family = symbols.iter().all(|s| {
                if additive {
                    matches!(s, OperatorSymbol::Plus | OperatorSymbol::Minus)
                } else {
                    matches!(s, OperatorSymbol::Times | OperatorSymbol::Divide)
                }
            });
            if simplified.iter().all(Node::is_constant) {
                Node::Operator {
                    op,
                    children: simplified,
                    symbols: symbols.to_vec(),
                }
                .evaluate(context)
            } else if in_family {
                signed_merge(simplified, symbols, additive)
            } else {
                Ok(Node::Operator {
                    op,
                    children: simplified,
                    symbols: symbols.to_vec(),
                })
            }
        }
        _ => {
            let node = Node::Operator {
                op,
                children: simplified,
                symbols: symbols.to_vec(),
            };
            if let Node::Operator { children, .. } = &node {
                if children.iter().all(Node::is_constant) {
                    return node.evaluate(context);
                }
            }
            Ok(node)
        }
    }
}

/// Folds the determined constant prefix of a logical chain: identities
/// drop, and a deciding boolean ends the chain. The first symbolic child
/// stops the fold.
fn logical_prefix(children: Vec<Node>, op: OperatorKind, fold: bool) -> Node {
    let mut rest = Vec::new();
    let mut iter = children.into_iter();
    for child in iter.by_ref() {
        match child {
            Node::Boolean(b) if b != fold => return Node::Boolean(b),
            Node::Boolean(_) => {}
            other => {
                rest.push(other);
                break;
            }
        }
    }
    rest.extend(iter);
    match rest.len() {
        0 => Node::Boolean(fold),
        1 => rest.swap_remove(0),
        _ => {
            let symbols = vec![op.default_symbol(); rest.len() - 1];
            Node::Operator {
                op,
                children: rest,
                symbols,
            }
        }
    }
}

/// Merges the numeric constants of an additive or multiplicative chain
/// into one leading constant, keeping symbolic children and their written
/// edges in order. The identity constant drops when the first kept edge
/// carries the family's positive symbol, and a zero in a pure
/// multiplication chain collapses the whole thing.
fn signed_merge(
    children: Vec<Node>,
    symbols: &[OperatorSymbol],
    additive: bool,
) -> Result<Node, EvalError> {
    let op = if additive {
        OperatorKind::Plus
    } else {
        OperatorKind::Times
    };
    let positive = op.default_symbol();
    let identity = if additive {
        Number::integer(0)
    } else {
        Number::integer(1)
    };

    let mut constant = identity;
    let mut rest: Vec<Node> = Vec::new();
    let mut rest_symbols: Vec<OperatorSymbol> = Vec::new();

    for (i, child) in children.into_iter().enumerate() {
        let symbol = if i == 0 { positive } else { symbols[i - 1] };
        match child {
            Node::Number(n) => {
                constant = match symbol {
                    OperatorSymbol::Plus => constant.add(&n)?,
                    OperatorSymbol::Minus => constant.sub(&n)?,
                    OperatorSymbol::Times => constant.mul(&n)?,
                    OperatorSymbol::Divide => constant.div(&n)?,
                    other => {
                        return Err(EvalError::InvalidExpression(format!(
                            "operator \"{}\" cannot join this chain",
                            other.as_str()
                        )));
                    }
                };
            }
            other => {
                rest.push(other);
                rest_symbols.push(symbol);
            }
        }
    }

    if rest.is_empty() {
        return Ok(Node::Number(constant));
    }
    if !additive
        && constant.is_zero()
        && !constant.is_float()
        && rest_symbols.iter().all(|s| *s == OperatorSymbol::Times)
    {
        return Ok(Node::integer(0));
    }

    if constant == identity && rest_symbols[0] == positive {
        let mut children = rest;
        let symbols = rest_symbols.split_off(1);
        if children.len() == 1 {
            return Ok(children.swap_remove(0));
        }
        return Ok(Node::Operator {
            op,
            children,
            symbols,
        });
    }

    let mut merged = Vec::with_capacity(rest.len() + 1);
    merged.push(Node::Number(constant));
    merged.extend(rest);
    Ok(Node::Operator {
        op,
        children: merged,
        symbols: rest_symbols,
    })
}
