//! Parser output vocabulary.
//!
//! The parser turns the token stream into a tree of components: group
//! nesting is resolved, argument lists are split, and every syntactic form
//! is named, but no evaluation semantics are attached yet. The AST builder
//! consumes component sequences and reduces them to a single node.

use crate::ast::node::{OperatorSymbol, UnaryOp};
use crate::number::Number;

/// Which delimiter pair produced a [`Component::Group`].
///
/// Square groups never appear as plain groups; they become list literals or
/// indexing during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// `( ... )` - expression grouping
    Round,
    /// `{ ... }` with no top-level colon - a block
    Curly,
}

/// A parsed syntactic element.
///
/// Argument lists (`args`) hold one component sequence per comma-separated
/// argument; each builds into an independent subtree.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    // Literals
    /// Numeric literal
    Number(Number),
    /// String literal, quotes removed
    String(String),
    /// `true` or `false`
    Boolean(bool),
    /// `null`
    Null,

    // Operands
    /// Identifier in variable position
    Variable(String),
    /// Balanced delimiter group
    ///
    /// # Examples
    /// ```text
    /// (1 + 2)
    /// {x = 5; x}
    /// ```
    Group {
        kind: GroupKind,
        components: Vec<Component>,
    },
    /// List literal
    ///
    /// # Example
    /// ```text
    /// [1, 2, 3]
    /// ```
    List(Vec<Vec<Component>>),
    /// Hash literal, recognized by a top-level colon inside curly braces
    ///
    /// # Example
    /// ```text
    /// {'a': 1, 'b': 2}
    /// ```
    Hash(Vec<(Vec<Component>, Vec<Component>)>),
    /// Identifier immediately followed by a round group
    ///
    /// # Example
    /// ```text
    /// f(x, y)
    /// ```
    Function {
        name: String,
        args: Vec<Vec<Component>>,
    },

    // Postfix
    /// Square group attached to the preceding operand
    ///
    /// # Example
    /// ```text
    /// a[0]
    /// ```
    Indexing(Vec<Vec<Component>>),
    /// Dot call without arguments (`x.size` is `size(x)`)
    DotWord(String),
    /// Dot call with arguments (`x.f(a)` is `f(x, a)`)
    DotOperator {
        name: String,
        args: Vec<Vec<Component>>,
    },

    // Operators
    /// Infix operator in binary position
    Operator(OperatorSymbol),
    /// Prefix operator
    UnaryOperator(UnaryOp),
    /// Plain `=`
    Assignment,
    /// `op=` shorthand; desugars during AST building
    CompoundAssignment(OperatorSymbol),

    // Punctuation
    /// `;` or newline
    LineSeparator,
}

impl Component {
    /// Whether the component can stand as (or extend) an operand. Postfix
    /// components count: after `a[0]`, a following `[1]` indexes into the
    /// result and a following operand multiplies by juxtaposition.
    pub fn is_operand(&self) -> bool {
        matches!(
            self,
            Component::Number(_)
                | Component::String(_)
                | Component::Boolean(_)
                | Component::Null
                | Component::Variable(_)
                | Component::Group { .. }
                | Component::List(_)
                | Component::Hash(_)
                | Component::Function { .. }
                | Component::Indexing(_)
                | Component::DotWord(_)
                | Component::DotOperator { .. }
        )
    }

}
