//! Abstract syntax tree for the expression language.
//!
//! The AST is the stable middle of the pipeline: the parser's component
//! stream is reduced into a single [`Node`] here, and everything the host
//! does afterwards (evaluate, simplify, inspect, render) is an operation on
//! that tree.
//!
//! The module is organized into focused submodules:
//!
//! - **[node]** - The node variants, operator tables, and structural
//!   operations (copying, substitution, unbound-name analysis, rendering)
//! - **[cell]** - Shared mutable element storage, the aliasing primitive
//!   behind indexed assignment
//! - **[builder]** - Reduction of parsed components into a node by repeated
//!   highest-priority operator collapse
//! - **[evaluate]** - Full evaluation against a context
//! - **[simplify]** - Partial evaluation that folds constants and leaves
//!   unresolved names in place
//!
//! ## Operator chains
//!
//! Adjacent operators of equal priority collapse into one n-ary node that
//! remembers the written symbols, so `1+2+3` is a single three-child `Plus`
//! and `10 - 2 + 3` is the same node shape with `[-, +]` edges, evaluated
//! left to right:
//!
//! ```
//! use reckon::Calculator;
//!
//! let calculator = Calculator::new();
//! assert_eq!(calculator.evaluate("10 - 2 + 3").unwrap(), 11.into());
//! assert_eq!(calculator.evaluate("95 % 7 % 5").unwrap(), 4.into());
//! ```
pub mod builder;
pub mod cell;
pub mod evaluate;
pub mod node;
pub mod simplify;

pub use builder::build;
pub use cell::Cell;
pub use node::{Node, OperatorKind, OperatorSymbol, UnaryOp};
