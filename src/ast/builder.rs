//! Builder: parsing components to AST nodes.
//!
//! A line splits into operand groups separated by binary operators. Each
//! group is a run of prefix unary operators, one value, and a run of
//! postfix attachments (indexing and dot calls). Binary operators then
//! collapse highest priority first; a contiguous run at one priority
//! becomes a single node that keeps every written symbol, so `10 - 2 + 3`
//! folds left edge by edge instead of regrouping. Assignments associate to
//! the right, and compound assignments desugar here into an assignment of
//! the operator applied to the target.

use crate::ast::cell::Cell;
use crate::ast::node::{ASSIGNMENT_PRIORITY, Node, OperatorSymbol};
use crate::error::AstError;
use crate::parsing::{Component, GroupKind};

/// Builds an AST from a parsed component sequence. Line separators produce
/// a multi-line node; an empty sequence builds to null.
pub fn build(components: &[Component]) -> Result<Node, AstError> {
    let mut lines = Vec::new();
    for segment in components.split(|c| matches!(c, Component::LineSeparator)) {
        if segment.is_empty() {
            continue;
        }
        lines.push(build_line(segment)?);
    }
    match lines.len() {
        0 => Ok(Node::Null),
        1 => Ok(lines.swap_remove(0)),
        _ => Ok(Node::MultiLine(lines)),
    }
}

enum BinaryEntry {
    Op(OperatorSymbol),
    Assign(Option<OperatorSymbol>),
}

impl BinaryEntry {
    fn priority(&self) -> u8 {
        match self {
            BinaryEntry::Op(symbol) => symbol.priority(),
            BinaryEntry::Assign(_) => ASSIGNMENT_PRIORITY,
        }
    }
}

fn build_line(components: &[Component]) -> Result<Node, AstError> {
    let mut groups: Vec<&[Component]> = Vec::new();
    let mut operators: Vec<BinaryEntry> = Vec::new();
    let mut start = 0;
    for (i, component) in components.iter().enumerate() {
        let entry = match component {
            Component::Operator(symbol) => BinaryEntry::Op(*symbol),
            Component::Assignment => BinaryEntry::Assign(None),
            Component::CompoundAssignment(symbol) => BinaryEntry::Assign(Some(*symbol)),
            _ => continue,
        };
        groups.push(&components[start..i]);
        operators.push(entry);
        start = i + 1;
    }
    groups.push(&components[start..]);

    if !operators.is_empty() {
        if groups[0].is_empty() {
            return Err(AstError::new("line cannot begin with a binary operator"));
        }
        if groups[groups.len() - 1].is_empty() {
            return Err(AstError::new("line cannot end with a binary operator"));
        }
        if groups.iter().any(|g| g.is_empty()) {
            return Err(AstError::new("consecutive binary operators"));
        }
    }

    let mut nodes = Vec::with_capacity(groups.len());
    for group in groups {
        nodes.push(build_group(group)?);
    }
    reduce(nodes, operators)
}

/// Collapses operator entries between operand nodes, highest priority
/// first. Ties collapse as one run into a single node whose kind comes from
/// the run's first symbol.
fn reduce(mut nodes: Vec<Node>, mut operators: Vec<BinaryEntry>) -> Result<Node, AstError> {
    while !operators.is_empty() {
        let max = operators
            .iter()
            .map(BinaryEntry::priority)
            .max()
            .unwrap_or(0);

        if max == ASSIGNMENT_PRIORITY {
            // only assignments remain and they fold from the right
            let mut value = nodes
                .pop()
                .ok_or_else(|| AstError::new("assignment is missing a value"))?;
            while let Some(entry) = operators.pop() {
                let target = nodes
                    .pop()
                    .ok_or_else(|| AstError::new("assignment is missing a target"))?;
                value = assignment_node(target, entry, value);
            }
            nodes.push(value);
            continue;
        }

        let first = operators
            .iter()
            .position(|entry| entry.priority() == max)
            .ok_or_else(|| AstError::new("operator priority scan failed"))?;
        let mut last = first;
        while last + 1 < operators.len() && operators[last + 1].priority() == max {
            last += 1;
        }

        let mut symbols = Vec::with_capacity(last - first + 1);
        for entry in operators.drain(first..=last) {
            if let BinaryEntry::Op(symbol) = entry {
                symbols.push(symbol);
            }
        }
        let kind = symbols
            .first()
            .ok_or_else(|| AstError::new("empty operator run"))?
            .kind();
        let children: Vec<Node> = nodes.drain(first..first + symbols.len() + 1).collect();
        nodes.insert(
            first,
            Node::Operator {
                op: kind,
                children,
                symbols,
            },
        );
    }

    nodes
        .pop()
        .ok_or_else(|| AstError::new("empty expression"))
}

fn assignment_node(target: Node, entry: BinaryEntry, value: Node) -> Node {
    match entry {
        BinaryEntry::Assign(Some(symbol)) => {
            let operand = target.deep_dup();
            Node::Assignment {
                target: Box::new(target),
                value: Box::new(Node::Operator {
                    op: symbol.kind(),
                    children: vec![operand, value],
                    symbols: vec![symbol],
                }),
            }
        }
        _ => Node::Assignment {
            target: Box::new(target),
            value: Box::new(value),
        },
    }
}

/// Builds one operand group: prefix unary operators, a single value, then
/// postfix indexing and dot calls. A dot call folds its receiver in as the
/// first argument, so `x.round(2)` and `round(x, 2)` build the same node.
fn build_group(components: &[Component]) -> Result<Node, AstError> {
    let mut index = 0;
    let mut prefixes = Vec::new();
    while let Some(Component::UnaryOperator(op)) = components.get(index) {
        prefixes.push(*op);
        index += 1;
    }

    let operand = components
        .get(index)
        .ok_or_else(|| AstError::new("unary operator is missing an operand"))?;
    let mut node = node_of_component(operand)?;
    index += 1;

    while let Some(component) = components.get(index) {
        node = match component {
            Component::Indexing(args) => {
                if args.len() != 1 {
                    return Err(AstError::new("indexing takes exactly one argument"));
                }
                Node::Indexing {
                    target: Box::new(node),
                    index: Box::new(build(&args[0])?),
                }
            }
            Component::DotWord(name) => Node::Function {
                name: name.clone(),
                args: vec![node],
            },
            Component::DotOperator { name, args } => {
                let mut built = Vec::with_capacity(args.len() + 1);
                built.push(node);
                for arg in args {
                    built.push(build(arg)?);
                }
                Node::Function {
                    name: name.clone(),
                    args: built,
                }
            }
            _ => return Err(AstError::new("expected a postfix component after the operand")),
        };
        index += 1;
    }

    for op in prefixes.into_iter().rev() {
        node = Node::Unary {
            op,
            child: Box::new(node),
        };
    }
    Ok(node)
}

fn node_of_component(component: &Component) -> Result<Node, AstError> {
    match component {
        Component::Number(n) => Ok(Node::Number(*n)),
        Component::String(s) => Ok(Node::String(s.clone())),
        Component::Boolean(b) => Ok(Node::Boolean(*b)),
        Component::Null => Ok(Node::Null),
        Component::Variable(name) => Ok(Node::Variable(name.clone())),
        Component::Group {
            kind: GroupKind::Round,
            components,
        } => build(components),
        Component::Group {
            kind: GroupKind::Curly,
            components,
        } => Ok(Node::Block(Box::new(build(components)?))),
        Component::List(args) => {
            let mut cells = Vec::with_capacity(args.len());
            for arg in args {
                cells.push(Cell::new(build(arg)?));
            }
            Ok(Node::List(cells))
        }
        Component::Hash(pairs) => {
            let mut entries = Vec::with_capacity(pairs.len());
            for (key, value) in pairs {
                entries.push((build(key)?, Cell::new(build(value)?)));
            }
            Ok(Node::Hash(entries))
        }
        Component::Function { name, args } => {
            let mut built = Vec::with_capacity(args.len());
            for arg in args {
                built.push(build(arg)?);
            }
            Ok(Node::Function {
                name: name.clone(),
                args: built,
            })
        }
        _ => Err(AstError::new("expected a value")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::node::OperatorKind;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn ast(text: &str) -> Node {
        build(&parse(&tokenize(text).unwrap()).unwrap()).unwrap()
    }

    #[test]
    fn same_priority_run_collapses_into_one_node() {
        let node = ast("10 - 2 + 3");
        match node {
            Node::Operator { op, children, symbols } => {
                assert_eq!(op, OperatorKind::Plus);
                assert_eq!(children.len(), 3);
                assert_eq!(
                    symbols,
                    vec![OperatorSymbol::Minus, OperatorSymbol::Plus]
                );
            }
            other => panic!("expected an operator node, got {:?}", other),
        }
    }

    #[test]
    fn mixed_run_takes_kind_from_first_symbol() {
        let node = ast("2 * 3 % 4 * 5");
        match node {
            Node::Operator { op, symbols, .. } => {
                assert_eq!(op, OperatorKind::Times);
                assert_eq!(symbols.len(), 3);
            }
            other => panic!("expected an operator node, got {:?}", other),
        }
    }

    #[test]
    fn assignments_fold_to_the_right() {
        let node = ast("x = y = 3");
        match node {
            Node::Assignment { target, value } => {
                assert_eq!(*target, Node::Variable("x".into()));
                assert!(matches!(*value, Node::Assignment { .. }));
            }
            other => panic!("expected an assignment, got {:?}", other),
        }
    }

    #[test]
    fn compound_assignment_desugars_to_operator() {
        let node = ast("x += 2");
        match node {
            Node::Assignment { target, value } => {
                assert_eq!(*target, Node::Variable("x".into()));
                match *value {
                    Node::Operator { op, ref children, .. } => {
                        assert_eq!(op, OperatorKind::Plus);
                        assert_eq!(children[0], Node::Variable("x".into()));
                    }
                    ref other => panic!("expected an operator value, got {:?}", other),
                }
            }
            other => panic!("expected an assignment, got {:?}", other),
        }
    }

    #[test]
    fn unary_minus_binds_into_the_exponent_base() {
        let node = ast("-2**2");
        match node {
            Node::Operator { op, children, .. } => {
                assert_eq!(op, OperatorKind::Exponent);
                assert!(matches!(children[0], Node::Unary { .. }));
            }
            other => panic!("expected an exponent node, got {:?}", other),
        }
    }

    #[test]
    fn dangling_operators_are_rejected() {
        let components = parse(&tokenize("1 +").unwrap()).unwrap();
        assert!(build(&components).is_err());
        let components = parse(&tokenize("1 + + 2").unwrap()).unwrap();
        assert!(build(&components).is_ok());
    }

    #[test]
    fn lines_build_to_a_multi_line_node() {
        let node = ast("x = 1; x + 1");
        match node {
            Node::MultiLine(lines) => assert_eq!(lines.len(), 2),
            other => panic!("expected a multi-line node, got {:?}", other),
        }
    }
}
