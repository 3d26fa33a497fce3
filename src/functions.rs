//! Callable functions and the default registry.
//!
//! A function is either native Rust or an expression defined in the
//! language itself (`f(x) = x + 1`). Native functions come in two shapes:
//! eager ones receive their arguments already evaluated to values, lazy
//! ones receive the raw argument nodes plus the calling context and choose
//! what to evaluate. `if` is lazy so the untaken branch never runs.
//!
//! Every fresh root context is seeded with the registry at the bottom of
//! this file: the constants `pi` and `e`, the `if` conditional, exact
//! integer rounding (`abs`, `round`, `ceil`, `floor`), float math (`sqrt`,
//! `exp`, `log`, `sin`, `cos`, `tan`), `min`, `max`, and `size`.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::ast::node::Node;
use crate::context::Context;
use crate::error::EvalError;
use crate::number::Number;
use crate::value::Value;

/// How many arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    AtLeast(usize),
    Between(usize, usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::Fixed(n) => count == *n,
            Arity::AtLeast(n) => count >= *n,
            Arity::Between(low, high) => (*low..=*high).contains(&count),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Fixed(n) => write!(f, "exactly {}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
            Arity::Between(low, high) => write!(f, "{} to {}", low, high),
        }
    }
}

type EagerBody = dyn Fn(&[Value]) -> Result<Value, EvalError>;
type LazyBody = dyn Fn(&[Node], &Context) -> Result<Node, EvalError>;

#[derive(Clone)]
pub(crate) enum NativeKind {
    Eager(Rc<EagerBody>),
    Lazy(Rc<LazyBody>),
}

/// A function implemented in Rust.
#[derive(Clone)]
pub struct NativeFunction {
    pub(crate) name: String,
    pub(crate) arity: Arity,
    pub(crate) kind: NativeKind,
}

impl NativeFunction {
    /// An eager function: arguments arrive evaluated to values.
    pub fn eager(
        name: impl Into<String>,
        arity: Arity,
        body: impl Fn(&[Value]) -> Result<Value, EvalError> + 'static,
    ) -> NativeFunction {
        NativeFunction {
            name: name.into(),
            arity,
            kind: NativeKind::Eager(Rc::new(body)),
        }
    }

    /// A lazy function: arguments arrive as unevaluated nodes along with
    /// the calling context.
    pub fn lazy(
        name: impl Into<String>,
        arity: Arity,
        body: impl Fn(&[Node], &Context) -> Result<Node, EvalError> + 'static,
    ) -> NativeFunction {
        NativeFunction {
            name: name.into(),
            arity,
            kind: NativeKind::Lazy(Rc::new(body)),
        }
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// A function defined by an expression, closed over the context it was
/// defined in.
#[derive(Debug, Clone)]
pub struct ExpressionFunction {
    pub(crate) name: String,
    pub(crate) params: Vec<String>,
    pub(crate) body: Node,
    pub(crate) captured: Context,
    pub(crate) recursive: bool,
}

#[derive(Debug, Clone)]
pub enum Function {
    Native(NativeFunction),
    Expression(ExpressionFunction),
}

impl Function {
    pub fn name(&self) -> &str {
        match self {
            Function::Native(native) => &native.name,
            Function::Expression(expression) => &expression.name,
        }
    }

    pub(crate) fn arity(&self) -> Arity {
        match self {
            Function::Native(native) => native.arity,
            Function::Expression(expression) => Arity::Fixed(expression.params.len()),
        }
    }
}

// Default registry

pub(crate) fn register_defaults(context: &Context) {
    context.bind_variable("pi", Node::Number(Number::float(std::f64::consts::PI)));
    context.bind_variable("e", Node::Number(Number::float(std::f64::consts::E)));
    for function in default_functions() {
        context.bind_function(function);
    }
}

fn default_functions() -> Vec<Function> {
    vec![
        branch_if(),
        abs(),
        round(),
        ceil(),
        floor(),
        float_fn("sqrt", f64::sqrt),
        float_fn("exp", f64::exp),
        float_fn("log", f64::ln),
        float_fn("sin", f64::sin),
        float_fn("cos", f64::cos),
        float_fn("tan", f64::tan),
        extremum("min", Ordering::Less),
        extremum("max", Ordering::Greater),
        size(),
    ]
}

/// `if(condition, then)` or `if(condition, then, else)`. Lazy: only the
/// taken branch evaluates. A missing else branch yields null.
fn branch_if() -> Function {
    Function::Native(NativeFunction::lazy(
        "if",
        Arity::Between(2, 3),
        |args, context| {
            let condition = args
                .first()
                .ok_or_else(|| EvalError::Calculation("if needs a condition".into()))?
                .evaluate(context)?;
            let Node::Boolean(truthy) = condition else {
                return Err(EvalError::Calculation(format!(
                    "if condition must be a boolean, found {}",
                    condition.type_name()
                )));
            };
            let branch = if truthy { args.get(1) } else { args.get(2) };
            match branch {
                Some(node) => node.evaluate(context),
                None => Ok(Node::Null),
            }
        },
    ))
}

fn number_arg(name: &str, values: &[Value]) -> Result<Number, EvalError> {
    match values.first() {
        Some(Value::Number(n)) => Ok(*n),
        Some(other) => Err(EvalError::Calculation(format!(
            "{} expects a number, found {}",
            name, other
        ))),
        None => Err(EvalError::Calculation(format!("{} needs an argument", name))),
    }
}

fn abs() -> Function {
    Function::Native(NativeFunction::eager("abs", Arity::Fixed(1), |values| {
        let n = number_arg("abs", values)?;
        Ok(Value::Number(n.abs()?))
    }))
}

/// `round(x)` rounds to the nearest integer, `round(x, digits)` to that
/// many decimal places. Rational inputs round exactly; float inputs stay
/// floats.
fn round() -> Function {
    Function::Native(NativeFunction::eager(
        "round",
        Arity::Between(1, 2),
        |values| {
            let n = number_arg("round", values)?;
            let digits = match values.get(1) {
                None => None,
                Some(Value::Number(d)) => match d.as_integer() {
                    Some(d) => Some(d),
                    None => {
                        return Err(EvalError::Calculation(
                            "round digits must be an integer".into(),
                        ));
                    }
                },
                Some(other) => {
                    return Err(EvalError::Calculation(format!(
                        "round digits must be an integer, found {}",
                        other
                    )));
                }
            };
            let rounded = match digits {
                None => round_to_integer(n)?,
                Some(d) => {
                    let scale = Number::integer(10).pow(&Number::integer(d))?;
                    let scaled = round_to_integer(n.mul(&scale)?)?.div(&scale)?;
                    if n.is_float() {
                        Number::float(scaled.to_f64())
                    } else {
                        scaled
                    }
                }
            };
            Ok(Value::Number(rounded))
        },
    ))
}

fn round_to_integer(n: Number) -> Result<Number, EvalError> {
    match n {
        Number::Rational(r) => Ok(Number::integer(r.round()?)),
        Number::Float(f) if f.is_finite() => Ok(Number::integer(f.round() as i128)),
        Number::Float(f) => Err(EvalError::Calculation(format!(
            "cannot round {}",
            Number::Float(f)
        ))),
    }
}

fn ceil() -> Function {
    Function::Native(NativeFunction::eager("ceil", Arity::Fixed(1), |values| {
        match number_arg("ceil", values)? {
            Number::Rational(r) => Ok(Value::Number(Number::integer(r.ceil()))),
            Number::Float(f) if f.is_finite() => {
                Ok(Value::Number(Number::integer(f.ceil() as i128)))
            }
            n => Err(EvalError::Calculation(format!("cannot ceil {}", n))),
        }
    }))
}

fn floor() -> Function {
    Function::Native(NativeFunction::eager("floor", Arity::Fixed(1), |values| {
        match number_arg("floor", values)? {
            Number::Rational(r) => Ok(Value::Number(Number::integer(r.floor()))),
            Number::Float(f) if f.is_finite() => {
                Ok(Value::Number(Number::integer(f.floor() as i128)))
            }
            n => Err(EvalError::Calculation(format!("cannot floor {}", n))),
        }
    }))
}

fn float_fn(name: &'static str, op: fn(f64) -> f64) -> Function {
    Function::Native(NativeFunction::eager(name, Arity::Fixed(1), move |values| {
        let n = number_arg(name, values)?;
        Ok(Value::Number(Number::float(op(n.to_f64()))))
    }))
}

fn extremum(name: &'static str, keep: Ordering) -> Function {
    Function::Native(NativeFunction::eager(
        name,
        Arity::AtLeast(1),
        move |values| {
            let mut best: Option<Number> = None;
            for value in values {
                let Value::Number(n) = value else {
                    return Err(EvalError::Calculation(format!(
                        "{} expects numbers, found {}",
                        name, value
                    )));
                };
                best = match best {
                    None => Some(*n),
                    Some(current) => match n.compare(&current) {
                        Some(order) if order == keep => Some(*n),
                        Some(_) => Some(current),
                        None => {
                            return Err(EvalError::Calculation(format!(
                                "{} cannot compare {}",
                                name, n
                            )));
                        }
                    },
                };
            }
            best.map(Value::Number)
                .ok_or_else(|| EvalError::Calculation(format!("{} needs an argument", name)))
        },
    ))
}

fn size() -> Function {
    Function::Native(NativeFunction::eager("size", Arity::Fixed(1), |values| {
        match values.first() {
            Some(Value::List(items)) => Ok(Value::from(items.len() as i64)),
            Some(Value::Hash(pairs)) => Ok(Value::from(pairs.len() as i64)),
            Some(Value::String(s)) => Ok(Value::from(s.chars().count() as i64)),
            Some(other) => Err(EvalError::Calculation(format!(
                "size expects a list, hash, or string, found {}",
                other
            ))),
            None => Err(EvalError::Calculation("size needs an argument".into())),
        }
    }))
}
