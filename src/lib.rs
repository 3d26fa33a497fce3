pub mod ast;
pub mod calculator;
pub mod context;
pub mod error;
pub mod functions;
pub mod lexer;
pub mod number;
pub mod output;
pub mod parser;
pub mod parsing;
pub mod value;

pub use ast::{Cell, Node, OperatorKind, OperatorSymbol, UnaryOp, build};
pub use calculator::{Bindings, Calculator, ast, evaluate, reset, simplify};
pub use context::Context;
pub use error::{AstError, Error, EvalError, ParsingError, TokenizingError};
pub use functions::{Arity, ExpressionFunction, Function, NativeFunction};
pub use lexer::{Token, TokenKind, Tokenizer, tokenize};
pub use number::{Number, Rational};
pub use output::{from_json, to_json, to_json_string, to_json_string_pretty};
pub use parser::parse;
pub use parsing::{Component, GroupKind};
pub use value::Value;
