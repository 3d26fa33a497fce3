use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::ast::cell::Cell;
use crate::context::Context;
use crate::error::EvalError;
use crate::number::Number;
use crate::value::Value;

/// Prefix operators attached to a single child node.
///
/// `Identity` is produced by even-length runs of `~` or `!`, which cancel
/// out. `Inverse` (the reciprocal) has no literal spelling; it exists for
/// programmatic construction alongside the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// No-op wrapper (`~~`, `!!`)
    Identity,
    /// Numeric identity (`+`)
    Plus,
    /// Negation (`-`)
    Minus,
    /// Reciprocal (no literal form)
    Inverse,
    /// Bitwise complement (`~`)
    BitwiseNot,
    /// Boolean negation (`!`)
    LogicalNot,
}

/// The operator family of an n-ary [`Node::Operator`].
///
/// A chain of adjacent same-priority operators collapses into a single node
/// of the first operator's family; the per-edge symbols are kept separately
/// so `10 - 2 + 3` stays one `Plus` node that still subtracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    /// Additive chain (`+`, `-`)
    Plus,
    /// Multiplicative chain (`*`, `/`)
    Times,
    /// Exponentiation, right associative (`**`)
    Exponent,
    /// Remainder chain (`%`)
    Modulo,
    /// Bitwise AND (`&`)
    BitwiseAnd,
    /// Bitwise OR (`|`)
    BitwiseOr,
    /// Bitwise XOR (`^`)
    BitwiseXor,
    /// Short-circuit AND (`&&`)
    LogicalAnd,
    /// Short-circuit OR (`||`)
    LogicalOr,
    /// Equality (`==`)
    Equal,
    /// Inequality (`!=`)
    NotEqual,
    /// Comparison (`<`)
    LessThan,
    /// Comparison (`>`)
    GreaterThan,
    /// Comparison (`<=`)
    LessThanOrEqual,
    /// Comparison (`>=`)
    GreaterThanOrEqual,
}

impl OperatorKind {
    /// Binding priority; higher binds tighter.
    pub fn priority(&self) -> u8 {
        self.default_symbol().priority()
    }

    /// The canonical symbol of the family, used when a node was built
    /// programmatically without per-edge symbols.
    pub fn default_symbol(&self) -> OperatorSymbol {
        match self {
            OperatorKind::Plus => OperatorSymbol::Plus,
            OperatorKind::Times => OperatorSymbol::Times,
            OperatorKind::Exponent => OperatorSymbol::Exponent,
            OperatorKind::Modulo => OperatorSymbol::Modulo,
            OperatorKind::BitwiseAnd => OperatorSymbol::BitwiseAnd,
            OperatorKind::BitwiseOr => OperatorSymbol::BitwiseOr,
            OperatorKind::BitwiseXor => OperatorSymbol::BitwiseXor,
            OperatorKind::LogicalAnd => OperatorSymbol::LogicalAnd,
            OperatorKind::LogicalOr => OperatorSymbol::LogicalOr,
            OperatorKind::Equal => OperatorSymbol::Equal,
            OperatorKind::NotEqual => OperatorSymbol::NotEqual,
            OperatorKind::LessThan => OperatorSymbol::LessThan,
            OperatorKind::GreaterThan => OperatorSymbol::GreaterThan,
            OperatorKind::LessThanOrEqual => OperatorSymbol::LessThanOrEqual,
            OperatorKind::GreaterThanOrEqual => OperatorSymbol::GreaterThanOrEqual,
        }
    }
}

/// A concrete infix operator as written in the source text.
///
/// Symbols drive evaluation edge by edge inside an n-ary node, which is what
/// keeps left-to-right semantics for the non-associative members of a
/// priority class (`-` inside a `Plus` chain, `/` inside a `Times` chain).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorSymbol {
    Plus,
    Minus,
    Times,
    Divide,
    Modulo,
    Exponent,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    LogicalAnd,
    LogicalOr,
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
}

impl OperatorSymbol {
    /// Binding priority; higher binds tighter. Unary prefixes sit at 90,
    /// between `**` and the multiplicative class.
    pub fn priority(&self) -> u8 {
        match self {
            OperatorSymbol::Exponent => 100,
            OperatorSymbol::Times | OperatorSymbol::Divide | OperatorSymbol::Modulo => 80,
            OperatorSymbol::Plus | OperatorSymbol::Minus => 75,
            OperatorSymbol::BitwiseAnd => 70,
            OperatorSymbol::BitwiseOr | OperatorSymbol::BitwiseXor => 65,
            OperatorSymbol::LessThan
            | OperatorSymbol::GreaterThan
            | OperatorSymbol::LessThanOrEqual
            | OperatorSymbol::GreaterThanOrEqual => 60,
            OperatorSymbol::Equal | OperatorSymbol::NotEqual => 55,
            OperatorSymbol::LogicalAnd => 50,
            OperatorSymbol::LogicalOr => 45,
        }
    }

    /// The operator family a chain led by this symbol collapses into.
    pub fn kind(&self) -> OperatorKind {
        match self {
            OperatorSymbol::Plus | OperatorSymbol::Minus => OperatorKind::Plus,
            OperatorSymbol::Times | OperatorSymbol::Divide => OperatorKind::Times,
            OperatorSymbol::Modulo => OperatorKind::Modulo,
            OperatorSymbol::Exponent => OperatorKind::Exponent,
            OperatorSymbol::BitwiseAnd => OperatorKind::BitwiseAnd,
            OperatorSymbol::BitwiseOr => OperatorKind::BitwiseOr,
            OperatorSymbol::BitwiseXor => OperatorKind::BitwiseXor,
            OperatorSymbol::LogicalAnd => OperatorKind::LogicalAnd,
            OperatorSymbol::LogicalOr => OperatorKind::LogicalOr,
            OperatorSymbol::Equal => OperatorKind::Equal,
            OperatorSymbol::NotEqual => OperatorKind::NotEqual,
            OperatorSymbol::LessThan => OperatorKind::LessThan,
            OperatorSymbol::GreaterThan => OperatorKind::GreaterThan,
            OperatorSymbol::LessThanOrEqual => OperatorKind::LessThanOrEqual,
            OperatorSymbol::GreaterThanOrEqual => OperatorKind::GreaterThanOrEqual,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorSymbol::Plus => "+",
            OperatorSymbol::Minus => "-",
            OperatorSymbol::Times => "*",
            OperatorSymbol::Divide => "/",
            OperatorSymbol::Modulo => "%",
            OperatorSymbol::Exponent => "**",
            OperatorSymbol::BitwiseAnd => "&",
            OperatorSymbol::BitwiseOr => "|",
            OperatorSymbol::BitwiseXor => "^",
            OperatorSymbol::LogicalAnd => "&&",
            OperatorSymbol::LogicalOr => "||",
            OperatorSymbol::Equal => "==",
            OperatorSymbol::NotEqual => "!=",
            OperatorSymbol::LessThan => "<",
            OperatorSymbol::GreaterThan => ">",
            OperatorSymbol::LessThanOrEqual => "<=",
            OperatorSymbol::GreaterThanOrEqual => ">=",
        }
    }
}

const UNARY_PRIORITY: u8 = 90;
pub(crate) const ASSIGNMENT_PRIORITY: u8 = 10;
const MULTILINE_PRIORITY: u8 = 5;

/// A node of the expression tree.
///
/// The tree is immutable once built; evaluation produces new nodes and never
/// rewrites the source tree. The only shared mutable state is the [`Cell`]
/// storage inside lists and hashes, which is how indexed assignment makes
/// mutation visible through aliases.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Numeric literal, exact rational or floating point
    Number(Number),
    /// String literal
    String(String),
    /// Boolean literal
    Boolean(bool),
    /// Null literal
    Null,
    /// Variable reference, resolved at evaluation time
    Variable(String),
    /// List of element cells
    List(Vec<Cell>),
    /// Insertion-ordered mapping from key nodes to value cells; keys compare
    /// by evaluated value
    Hash(Vec<(Node, Cell)>),
    /// Prefix operator
    Unary { op: UnaryOp, child: Box<Node> },
    /// N-ary operator chain; `symbols` holds the written operator between
    /// each pair of adjacent children (`children.len() == symbols.len() + 1`)
    Operator {
        op: OperatorKind,
        children: Vec<Node>,
        symbols: Vec<OperatorSymbol>,
    },
    /// Function call, resolved against the context at evaluation time
    Function { name: String, args: Vec<Node> },
    /// Element access (`target[index]`)
    Indexing { target: Box<Node>, index: Box<Node> },
    /// Assignment (`target = value`); the target is a variable, an indexing
    /// path, or a function signature
    Assignment { target: Box<Node>, value: Box<Node> },
    /// Braced block evaluated in a fresh non-transient child scope
    Block(Box<Node>),
    /// Statement sequence; evaluates to the last statement's result
    MultiLine(Vec<Node>),
}

impl Node {
    pub fn integer(n: i128) -> Node {
        Node::Number(Number::integer(n))
    }

    pub fn float(f: f64) -> Node {
        Node::Number(Number::float(f))
    }

    /// List literal with fresh cells for the given elements.
    pub fn list(elements: Vec<Node>) -> Node {
        Node::List(elements.into_iter().map(Cell::new).collect())
    }

    /// Hash literal with fresh cells for the given values.
    pub fn hash(pairs: Vec<(Node, Node)>) -> Node {
        Node::Hash(
            pairs
                .into_iter()
                .map(|(key, value)| (key, Cell::new(value)))
                .collect(),
        )
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Number(_) => "number",
            Node::String(_) => "string",
            Node::Boolean(_) => "boolean",
            Node::Null => "null",
            Node::Variable(_) => "variable",
            Node::List(_) => "list",
            Node::Hash(_) => "hash",
            Node::Unary { .. } => "unary operator",
            Node::Operator { .. } => "operator",
            Node::Function { .. } => "function call",
            Node::Indexing { .. } => "indexing",
            Node::Assignment { .. } => "assignment",
            Node::Block(_) => "block",
            Node::MultiLine(_) => "multiline expression",
        }
    }

    /// Whether the node is a fully resolved literal (containers count when
    /// all of their elements do).
    pub fn is_constant(&self) -> bool {
        match self {
            Node::Number(_) | Node::String(_) | Node::Boolean(_) | Node::Null => true,
            Node::List(cells) => cells.iter().all(|cell| cell.borrow().is_constant()),
            Node::Hash(pairs) => pairs
                .iter()
                .all(|(key, value)| key.is_constant() && value.borrow().is_constant()),
            _ => false,
        }
    }

    /// Fully independent structural copy; every cell in the result is fresh.
    pub fn deep_dup(&self) -> Node {
        match self {
            Node::List(cells) => Node::List(cells.iter().map(Cell::deep_dup).collect()),
            Node::Hash(pairs) => Node::Hash(
                pairs
                    .iter()
                    .map(|(key, value)| (key.deep_dup(), value.deep_dup()))
                    .collect(),
            ),
            Node::Unary { op, child } => Node::Unary {
                op: *op,
                child: Box::new(child.deep_dup()),
            },
            Node::Operator { op, children, symbols } => Node::Operator {
                op: *op,
                children: children.iter().map(Node::deep_dup).collect(),
                symbols: symbols.clone(),
            },
            Node::Function { name, args } => Node::Function {
                name: name.clone(),
                args: args.iter().map(Node::deep_dup).collect(),
            },
            Node::Indexing { target, index } => Node::Indexing {
                target: Box::new(target.deep_dup()),
                index: Box::new(index.deep_dup()),
            },
            Node::Assignment { target, value } => Node::Assignment {
                target: Box::new(target.deep_dup()),
                value: Box::new(value.deep_dup()),
            },
            Node::Block(child) => Node::Block(Box::new(child.deep_dup())),
            Node::MultiLine(children) => {
                Node::MultiLine(children.iter().map(Node::deep_dup).collect())
            }
            leaf => leaf.clone(),
        }
    }

    /// Copy of the tree with free occurrences of `name` replaced by
    /// `replacement`.
    ///
    /// Binding positions are left alone: variable assignment targets,
    /// function parameters (which shadow the name inside the definition
    /// body), and blocks, whose local scope could rebind the name. Indexing
    /// targets still substitute, since the container name there is a read.
    pub fn substitute(&self, name: &str, replacement: &Node) -> Node {
        match self {
            Node::Variable(n) if n == name => replacement.deep_dup(),
            Node::Block(_) => self.clone(),
            Node::Assignment { target, value } => {
                let new_target = match target.as_ref() {
                    Node::Variable(_) | Node::Function { .. } => target.as_ref().clone(),
                    other => other.substitute(name, replacement),
                };
                let shadowed = match target.as_ref() {
                    Node::Function { args, .. } => args
                        .iter()
                        .any(|arg| matches!(arg, Node::Variable(param) if param == name)),
                    _ => false,
                };
                let new_value = if shadowed {
                    value.as_ref().clone()
                } else {
                    value.substitute(name, replacement)
                };
                Node::Assignment {
                    target: Box::new(new_target),
                    value: Box::new(new_value),
                }
            }
            Node::List(cells) => Node::List(
                cells
                    .iter()
                    .map(|cell| Cell::new(cell.borrow().substitute(name, replacement)))
                    .collect(),
            ),
            Node::Hash(pairs) => Node::Hash(
                pairs
                    .iter()
                    .map(|(key, value)| {
                        (
                            key.substitute(name, replacement),
                            Cell::new(value.borrow().substitute(name, replacement)),
                        )
                    })
                    .collect(),
            ),
            Node::Unary { op, child } => Node::Unary {
                op: *op,
                child: Box::new(child.substitute(name, replacement)),
            },
            Node::Operator { op, children, symbols } => Node::Operator {
                op: *op,
                children: children
                    .iter()
                    .map(|child| child.substitute(name, replacement))
                    .collect(),
                symbols: symbols.clone(),
            },
            Node::Function { name: fname, args } => Node::Function {
                name: fname.clone(),
                args: args
                    .iter()
                    .map(|arg| arg.substitute(name, replacement))
                    .collect(),
            },
            Node::Indexing { target, index } => Node::Indexing {
                target: Box::new(target.substitute(name, replacement)),
                index: Box::new(index.substitute(name, replacement)),
            },
            Node::MultiLine(children) => Node::MultiLine(
                children
                    .iter()
                    .map(|child| child.substitute(name, replacement))
                    .collect(),
            ),
            leaf => leaf.clone(),
        }
    }

    /// Variable names in the subtree that the given context cannot resolve.
    ///
    /// Assignments bind for the statements that follow them, and block-local
    /// definitions do not count as bound outside their block.
    pub fn unbound_variables(&self, context: &Context) -> BTreeSet<String> {
        let mut bound = HashSet::new();
        let mut unbound = BTreeSet::new();
        self.collect_unbound_variables(context, &mut bound, &mut unbound);
        unbound
    }

    fn collect_unbound_variables(
        &self,
        context: &Context,
        bound: &mut HashSet<String>,
        unbound: &mut BTreeSet<String>,
    ) {
        match self {
            Node::Variable(name) => {
                if !bound.contains(name) && !context.has_variable(name) {
                    unbound.insert(name.clone());
                }
            }
            Node::List(cells) => {
                for cell in cells {
                    cell.borrow().collect_unbound_variables(context, bound, unbound);
                }
            }
            Node::Hash(pairs) => {
                for (key, value) in pairs {
                    key.collect_unbound_variables(context, bound, unbound);
                    value.borrow().collect_unbound_variables(context, bound, unbound);
                }
            }
            Node::Unary { child, .. } => {
                child.collect_unbound_variables(context, bound, unbound);
            }
            Node::Operator { children, .. } => {
                for child in children {
                    child.collect_unbound_variables(context, bound, unbound);
                }
            }
            Node::Function { args, .. } => {
                for arg in args {
                    arg.collect_unbound_variables(context, bound, unbound);
                }
            }
            Node::Indexing { target, index } => {
                target.collect_unbound_variables(context, bound, unbound);
                index.collect_unbound_variables(context, bound, unbound);
            }
            Node::Assignment { target, value } => match target.as_ref() {
                Node::Variable(name) => {
                    value.collect_unbound_variables(context, bound, unbound);
                    bound.insert(name.clone());
                }
                Node::Function { args, .. } => {
                    let mut inner = bound.clone();
                    for arg in args {
                        if let Node::Variable(param) = arg {
                            inner.insert(param.clone());
                        }
                    }
                    value.collect_unbound_variables(context, &mut inner, unbound);
                }
                other => {
                    other.collect_unbound_variables(context, bound, unbound);
                    value.collect_unbound_variables(context, bound, unbound);
                }
            },
            Node::Block(child) => {
                let mut inner = bound.clone();
                child.collect_unbound_variables(context, &mut inner, unbound);
            }
            Node::MultiLine(children) => {
                for child in children {
                    child.collect_unbound_variables(context, bound, unbound);
                }
            }
            Node::Number(_) | Node::String(_) | Node::Boolean(_) | Node::Null => {}
        }
    }

    /// Function names called in the subtree that the given context cannot
    /// resolve. Inline definitions bind for the statements that follow.
    pub fn unbound_functions(&self, context: &Context) -> BTreeSet<String> {
        let mut bound = HashSet::new();
        let mut unbound = BTreeSet::new();
        self.collect_unbound_functions(context, &mut bound, &mut unbound);
        unbound
    }

    fn collect_unbound_functions(
        &self,
        context: &Context,
        bound: &mut HashSet<String>,
        unbound: &mut BTreeSet<String>,
    ) {
        match self {
            Node::Function { name, args } => {
                if !bound.contains(name) && !context.has_function(name) {
                    unbound.insert(name.clone());
                }
                for arg in args {
                    arg.collect_unbound_functions(context, bound, unbound);
                }
            }
            Node::List(cells) => {
                for cell in cells {
                    cell.borrow().collect_unbound_functions(context, bound, unbound);
                }
            }
            Node::Hash(pairs) => {
                for (key, value) in pairs {
                    key.collect_unbound_functions(context, bound, unbound);
                    value.borrow().collect_unbound_functions(context, bound, unbound);
                }
            }
            Node::Unary { child, .. } => {
                child.collect_unbound_functions(context, bound, unbound);
            }
            Node::Operator { children, .. } => {
                for child in children {
                    child.collect_unbound_functions(context, bound, unbound);
                }
            }
            Node::Indexing { target, index } => {
                target.collect_unbound_functions(context, bound, unbound);
                index.collect_unbound_functions(context, bound, unbound);
            }
            Node::Assignment { target, value } => match target.as_ref() {
                Node::Function { name, .. } => {
                    value.collect_unbound_functions(context, bound, unbound);
                    bound.insert(name.clone());
                }
                other => {
                    other.collect_unbound_functions(context, bound, unbound);
                    value.collect_unbound_functions(context, bound, unbound);
                }
            },
            Node::Block(child) => {
                let mut inner = bound.clone();
                child.collect_unbound_functions(context, &mut inner, unbound);
            }
            Node::MultiLine(children) => {
                for child in children {
                    child.collect_unbound_functions(context, bound, unbound);
                }
            }
            Node::Number(_) | Node::String(_) | Node::Boolean(_) | Node::Null
            | Node::Variable(_) => {}
        }
    }

    /// Converts a fully evaluated node into a host-facing [`Value`].
    pub fn to_value(&self) -> Result<Value, EvalError> {
        match self {
            Node::Number(n) => Ok(Value::Number(*n)),
            Node::String(s) => Ok(Value::String(s.clone())),
            Node::Boolean(b) => Ok(Value::Boolean(*b)),
            Node::Null => Ok(Value::Null),
            Node::List(cells) => {
                let mut elements = Vec::with_capacity(cells.len());
                for cell in cells {
                    elements.push(cell.borrow().to_value()?);
                }
                Ok(Value::List(elements))
            }
            Node::Hash(pairs) => {
                let mut entries = Vec::with_capacity(pairs.len());
                for (key, value) in pairs {
                    entries.push((key.to_value()?, value.borrow().to_value()?));
                }
                Ok(Value::Hash(entries))
            }
            other => Err(EvalError::InvalidExpression(format!(
                "cannot convert {} to a value: {}",
                other.type_name(),
                other
            ))),
        }
    }

    /// Builds a literal node from a host-facing [`Value`].
    pub fn from_value(value: Value) -> Node {
        match value {
            Value::Null => Node::Null,
            Value::Boolean(b) => Node::Boolean(b),
            Value::Number(n) => Node::Number(n),
            Value::String(s) => Node::String(s),
            Value::List(elements) => {
                Node::List(elements.into_iter().map(|v| Cell::new(Node::from_value(v))).collect())
            }
            Value::Hash(entries) => Node::Hash(
                entries
                    .into_iter()
                    .map(|(k, v)| (Node::from_value(k), Cell::new(Node::from_value(v))))
                    .collect(),
            ),
        }
    }

    /// Priority used to decide parenthesization when rendering; atoms are
    /// `u8::MAX` and never get wrapped.
    fn display_priority(&self) -> u8 {
        match self {
            Node::Unary { .. } => UNARY_PRIORITY,
            Node::Operator { op, .. } => op.priority(),
            Node::Assignment { .. } => ASSIGNMENT_PRIORITY,
            Node::MultiLine(_) => MULTILINE_PRIORITY,
            // A non-integral rational renders as "1/2" and must bind like the
            // division it spells
            Node::Number(n) if n.as_integer().is_none() && !n.is_float() => {
                OperatorKind::Times.priority()
            }
            _ => u8::MAX,
        }
    }
}

fn fmt_operand(f: &mut fmt::Formatter<'_>, node: &Node) -> fmt::Result {
    if node.display_priority() == u8::MAX {
        write!(f, "{}", node)
    } else {
        write!(f, "({})", node)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Number(n) => write!(f, "{}", n),
            Node::String(s) => {
                if s.contains('\'') {
                    write!(f, "\"{}\"", s)
                } else {
                    write!(f, "'{}'", s)
                }
            }
            Node::Boolean(b) => write!(f, "{}", b),
            Node::Null => write!(f, "null"),
            Node::Variable(name) => write!(f, "{}", name),
            Node::List(cells) => {
                write!(f, "[")?;
                for (i, cell) in cells.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", cell)?;
                }
                write!(f, "]")
            }
            Node::Hash(pairs) => {
                write!(f, "{{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Node::Unary { op, child } => {
                match op {
                    UnaryOp::Identity => write!(f, "~~")?,
                    UnaryOp::Plus => write!(f, "+")?,
                    UnaryOp::Minus => write!(f, "-")?,
                    UnaryOp::BitwiseNot => write!(f, "~")?,
                    UnaryOp::LogicalNot => write!(f, "!")?,
                    UnaryOp::Inverse => return write!(f, "1/({})", child),
                }
                fmt_operand(f, child)
            }
            Node::Operator { op, children, symbols } => {
                let priority = op.priority();
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        let symbol = symbols
                            .get(i - 1)
                            .copied()
                            .unwrap_or_else(|| op.default_symbol());
                        write!(f, "{}", symbol.as_str())?;
                    }
                    if child.display_priority() <= priority {
                        write!(f, "({})", child)?;
                    } else {
                        write!(f, "{}", child)?;
                    }
                }
                Ok(())
            }
            Node::Function { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Node::Indexing { target, index } => {
                fmt_operand(f, target)?;
                write!(f, "[{}]", index)
            }
            Node::Assignment { target, value } => {
                write!(f, "{} = ", target)?;
                if value.display_priority() <= ASSIGNMENT_PRIORITY {
                    write!(f, "({})", value)
                } else {
                    write!(f, "{}", value)
                }
            }
            Node::Block(child) => write!(f, "{{{}}}", child),
            Node::MultiLine(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", child)?;
                }
                Ok(())
            }
        }
    }
}
