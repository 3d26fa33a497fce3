//! Calculator: the string-in, value-out facade.
//!
//! A [`Calculator`] owns a root context and runs the whole pipeline:
//! tokenize, parse, build, then evaluate or simplify. State accumulates
//! across calls, so an assignment in one expression is visible in the
//! next. [`Bindings`] overlay per-call variables and functions in a
//! transient frame: expressions can read them, but new names defined while
//! they are in effect land in the calculator itself.
//!
//! For one-off work there is a thread-local default calculator behind
//! [`evaluate`], [`simplify`], and [`ast`]; [`reset`] discards its state.
//!
//! # Examples
//!
//! ```
//! use reckon::{Bindings, Calculator, Value};
//!
//! let calculator = Calculator::new();
//! calculator.evaluate("x = [1, 2, 3]").unwrap();
//! assert_eq!(calculator.evaluate("x[1] + 10").unwrap(), Value::from(12));
//!
//! let bindings = Bindings::new().variable("n", 4);
//! assert_eq!(
//!     calculator.evaluate_with("n * x[0]", &bindings).unwrap(),
//!     Value::from(4),
//! );
//! ```

use std::cell::RefCell;

use crate::ast::{self, Node};
use crate::context::Context;
use crate::error::Error;
use crate::functions::{Function, NativeFunction};
use crate::lexer;
use crate::parser;
use crate::value::Value;

/// An expression evaluator with persistent state.
#[derive(Debug)]
pub struct Calculator {
    context: Context,
}

impl Calculator {
    /// A calculator with the default registry and recursion disabled.
    pub fn new() -> Calculator {
        Calculator {
            context: Context::new(),
        }
    }

    /// A calculator that permits recursive function definitions.
    pub fn with_recursion() -> Calculator {
        Calculator {
            context: Context::new_with_recursion(true),
        }
    }

    /// The calculator's root context.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Parses an expression into its AST without evaluating it.
    pub fn ast(&self, expression: &str) -> Result<Node, Error> {
        let tokens = lexer::tokenize(expression)?;
        let components = parser::parse(&tokens)?;
        Ok(ast::build(&components)?)
    }

    /// Evaluates an expression to a value.
    pub fn evaluate(&self, expression: &str) -> Result<Value, Error> {
        let result = self.ast(expression)?.evaluate(&self.context)?;
        Ok(result.to_value()?)
    }

    /// Evaluates with `bindings` overlaid for the duration of the call.
    pub fn evaluate_with(&self, expression: &str, bindings: &Bindings) -> Result<Value, Error> {
        let scope = bindings.overlay(&self.context);
        let result = self.ast(expression)?.evaluate(&scope)?;
        Ok(result.to_value()?)
    }

    /// Simplifies an expression, folding what is constant and leaving
    /// unresolved names symbolic.
    pub fn simplify(&self, expression: &str) -> Result<Node, Error> {
        Ok(self.ast(expression)?.simplify(&self.context)?)
    }

    /// Simplifies with `bindings` overlaid for the duration of the call.
    pub fn simplify_with(&self, expression: &str, bindings: &Bindings) -> Result<Node, Error> {
        let scope = bindings.overlay(&self.context);
        Ok(self.ast(expression)?.simplify(&scope)?)
    }

    /// Defines a variable in the calculator's root context.
    pub fn define_variable(&self, name: &str, value: impl Into<Value>) {
        self.context
            .register_variable(name, Node::from_value(value.into()));
    }

    /// Defines a native function in the calculator's root context.
    pub fn define_function(&self, function: NativeFunction) {
        self.context.register_function(Function::Native(function));
    }
}

impl Default for Calculator {
    fn default() -> Calculator {
        Calculator::new()
    }
}

/// Per-call variable and function overlays for
/// [`Calculator::evaluate_with`] and [`Calculator::simplify_with`].
#[derive(Debug, Default)]
pub struct Bindings {
    variables: Vec<(String, Value)>,
    functions: Vec<NativeFunction>,
}

impl Bindings {
    pub fn new() -> Bindings {
        Bindings::default()
    }

    pub fn variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Bindings {
        self.variables.push((name.into(), value.into()));
        self
    }

    pub fn function(mut self, function: NativeFunction) -> Bindings {
        self.functions.push(function);
        self
    }

    /// Spawns the transient frame carrying these bindings.
    fn overlay(&self, context: &Context) -> Context {
        let scope = context.spawn_child(true);
        for (name, value) in &self.variables {
            scope.bind_variable(name, Node::from_value(value.clone()));
        }
        for function in &self.functions {
            scope.bind_function(Function::Native(function.clone()));
        }
        scope
    }
}

thread_local! {
    static DEFAULT: RefCell<Calculator> = RefCell::new(Calculator::new());
}

/// Evaluates against the thread-local default calculator.
pub fn evaluate(expression: &str) -> Result<Value, Error> {
    DEFAULT.with(|calculator| calculator.borrow().evaluate(expression))
}

/// Simplifies against the thread-local default calculator.
pub fn simplify(expression: &str) -> Result<Node, Error> {
    DEFAULT.with(|calculator| calculator.borrow().simplify(expression))
}

/// Parses an expression with the thread-local default calculator.
pub fn ast(expression: &str) -> Result<Node, Error> {
    DEFAULT.with(|calculator| calculator.borrow().ast(expression))
}

/// Discards the thread-local default calculator's state.
pub fn reset() {
    DEFAULT.with(|calculator| *calculator.borrow_mut() = Calculator::new());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::Arity;

    #[test]
    fn state_persists_across_calls() {
        let calculator = Calculator::new();
        calculator.evaluate("x = 7").unwrap();
        assert_eq!(calculator.evaluate("x + 1").unwrap(), Value::from(8));
    }

    #[test]
    fn bindings_are_transient() {
        let calculator = Calculator::new();
        let bindings = Bindings::new().variable("n", 5);
        assert_eq!(
            calculator.evaluate_with("x = n * 2", &bindings).unwrap(),
            Value::from(10)
        );
        // x persisted into the calculator, n did not
        assert_eq!(calculator.evaluate("x").unwrap(), Value::from(10));
        assert!(calculator.evaluate("n").is_err());
    }

    #[test]
    fn custom_native_functions_register() {
        let calculator = Calculator::new();
        calculator.define_function(NativeFunction::eager(
            "double",
            Arity::Fixed(1),
            |values| {
                let n = values[0].as_number().unwrap();
                Ok(Value::Number(n.mul(&crate::number::Number::integer(2))?))
            },
        ));
        assert_eq!(calculator.evaluate("double(21)").unwrap(), Value::from(42));
    }

    #[test]
    fn default_calculator_resets() {
        reset();
        evaluate("y = 3").unwrap();
        assert_eq!(evaluate("y").unwrap(), Value::from(3));
        reset();
        assert!(evaluate("y").is_err());
    }
}
