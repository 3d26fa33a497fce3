//! JSON interchange for evaluation results.
//!
//! Conversion between [`Value`] and `serde_json::Value` in both directions,
//! plus string rendering. Exact rationals map onto what JSON can carry: an
//! integral rational in `i64` range becomes a JSON integer, everything else
//! becomes a float (and a non-finite float becomes null). Hash keys that are
//! not strings are rendered through their display form.
//!
//! # Examples
//!
//! ```
//! use reckon::{output, Calculator, Value};
//!
//! let calculator = Calculator::new();
//! let value = calculator.evaluate("{'a': 1 + 1, 'b': [true, null]}").unwrap();
//! assert_eq!(output::to_json_string(&value), r#"{"a":2,"b":[true,null]}"#);
//!
//! let parsed: serde_json::Value = r#"{"n": 3}"#.parse().unwrap();
//! let back = output::from_json(parsed);
//! assert_eq!(back.get(&Value::from("n")), Some(&Value::from(3)));
//! ```

use crate::number::Number;
use crate::value::Value;

/// Converts a value into a `serde_json::Value`.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => number_to_json(n),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::List(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Hash(entries) => {
            let mut object = serde_json::Map::with_capacity(entries.len());
            for (key, value) in entries {
                let key = match key {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                object.insert(key, to_json(value));
            }
            serde_json::Value::Object(object)
        }
    }
}

/// Converts a `serde_json::Value` into a value. JSON integers become exact
/// rationals; other numbers become floats.
pub fn from_json(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(Number::integer(i as i128))
            } else if let Some(u) = n.as_u64() {
                Value::Number(Number::integer(u as i128))
            } else {
                Value::Number(Number::float(n.as_f64().unwrap_or(f64::NAN)))
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::List(items.into_iter().map(from_json).collect()),
        serde_json::Value::Object(entries) => Value::Hash(
            entries
                .into_iter()
                .map(|(key, value)| (Value::String(key), from_json(value)))
                .collect(),
        ),
    }
}

/// Compact JSON text.
pub fn to_json_string(value: &Value) -> String {
    to_json(value).to_string()
}

/// Pretty-printed JSON text.
pub fn to_json_string_pretty(value: &Value) -> String {
    format!("{:#}", to_json(value))
}

fn number_to_json(n: &Number) -> serde_json::Value {
    if let Number::Rational(r) = n {
        if r.is_integer() {
            if let Ok(i) = i64::try_from(r.numerator()) {
                return serde_json::Value::Number(i.into());
            }
        }
    }
    serde_json::Number::from_f64(n.to_f64())
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_rationals_become_json_integers() {
        assert_eq!(to_json_string(&Value::from(42)), "42");
        assert_eq!(to_json_string(&Value::rational(10, 2)), "5");
    }

    #[test]
    fn fractions_become_floats() {
        assert_eq!(to_json_string(&Value::rational(1, 2)), "0.5");
    }

    #[test]
    fn non_finite_floats_become_null() {
        assert_eq!(to_json_string(&Value::from(f64::NAN)), "null");
    }

    #[test]
    fn non_string_hash_keys_render_through_display() {
        let hash = Value::Hash(vec![(Value::from(2), Value::from(true))]);
        assert_eq!(to_json_string(&hash), r#"{"2":true}"#);
    }

    #[test]
    fn pretty_rendering_indents() {
        let list = Value::from(vec![1, 2]);
        assert_eq!(to_json_string_pretty(&list), "[\n  1,\n  2\n]");
    }

    #[test]
    fn json_round_trip_preserves_structure() {
        // keys in serde_json's sorted order so the round trip is stable
        let value = Value::Hash(vec![
            (Value::String("ok".into()), Value::Boolean(true)),
            (Value::String("xs".into()), Value::List(vec![Value::from(1), Value::from(2)])),
        ]);
        assert_eq!(from_json(to_json(&value)), value);
    }
}
