//! Host-facing values produced by evaluation.
//!
//! A [`Value`] is what an embedding application receives back from
//! [`Calculator::evaluate`](crate::Calculator::evaluate) and what it supplies
//! through bindings and [`define_variable`](crate::Calculator::define_variable).
//! Hashes preserve insertion order because their rendering order is
//! observable.
//!
//! # Examples
//!
//! ```
//! use reckon::Value;
//!
//! let number = Value::from(42);
//! let exact = Value::rational(2, 9);
//! let list = Value::from(vec![1, 2, 3]);
//! assert_eq!(list.as_list().map(|l| l.len()), Some(3));
//! ```

use crate::number::Number;

/// The result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absence of a value (`null`, blank input, missing hash key)
    Null,

    /// `true` / `false`
    Boolean(bool),

    /// Exact rational or floating number
    Number(Number),

    /// Text, quoted with `'` or `"` in expressions
    String(String),

    /// Ordered sequence
    List(Vec<Value>),

    /// Insertion-ordered key/value pairs; keys may be any value
    Hash(Vec<(Value, Value)>),
}

impl Value {
    /// Builds an exact fraction value.
    ///
    /// # Panics
    ///
    /// Panics if `den` is zero.
    pub fn rational(num: i128, den: i128) -> Value {
        Value::Number(Number::rational(num, den))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_hash(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Hash(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Looks up a hash entry by value equality (`1` and `1.0` match).
    pub fn get(&self, key: &Value) -> Option<&Value> {
        match self {
            Value::Hash(pairs) => pairs
                .iter()
                .find(|(k, _)| k.eq_value(key))
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Equality with numeric promotion, as the `==` operator compares.
    /// Non-numeric values compare structurally.
    pub fn eq_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.eq_value(b),
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.eq_value(y))
            }
            (Value::Hash(a), Value::Hash(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, v)| other.get(k).is_some_and(|w| v.eq_value(w)))
                    && b.iter().all(|(k, v)| self.get(k).is_some_and(|w| v.eq_value(w)))
            }
            _ => self == other,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(Number::integer(n as i128))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Number::integer(n as i128))
    }
}

impl From<i128> for Value {
    fn from(n: i128) -> Self {
        Value::Number(Number::integer(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Number(Number::float(f))
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "'{}'", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Hash(pairs) => {
                write!(f, "{{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}
