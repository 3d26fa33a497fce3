//! Numeric tower: exact rationals with float escape hatch.
//!
//! Arithmetic stays exact (reduced `i128` fractions) as long as every operand
//! is exact; any floating operand promotes the result to `f64`. Division and
//! exponentiation leave the rationals only when they must (`2 / 3 ** 2` is
//! exactly `2/9`; `2 ** 0.5` is floating).

use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::EvalError;

/// A reduced fraction. Denominator is always positive; `den == 1` means the
/// value is an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    num: i128,
    den: i128,
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn overflow() -> EvalError {
    EvalError::Calculation("integer overflow in exact arithmetic".to_string())
}

fn division_by_zero() -> EvalError {
    EvalError::Calculation("divided by 0".to_string())
}

impl Rational {
    pub fn integer(n: i128) -> Rational {
        Rational { num: n, den: 1 }
    }

    /// Builds a reduced rational, normalizing the sign onto the numerator.
    pub fn new(num: i128, den: i128) -> Result<Rational, EvalError> {
        if den == 0 {
            return Err(division_by_zero());
        }
        let (num, den) = if den < 0 {
            (
                num.checked_neg().ok_or_else(overflow)?,
                den.checked_neg().ok_or_else(overflow)?,
            )
        } else {
            (num, den)
        };
        let g = gcd(num.unsigned_abs(), den.unsigned_abs());
        if g <= 1 {
            return Ok(Rational { num, den });
        }
        Ok(Rational {
            num: num / g as i128,
            den: den / g as i128,
        })
    }

    pub fn numerator(&self) -> i128 {
        self.num
    }

    pub fn denominator(&self) -> i128 {
        self.den
    }

    pub fn is_integer(&self) -> bool {
        self.den == 1
    }

    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    fn checked_add(&self, other: &Rational) -> Result<Rational, EvalError> {
        let lhs = self.num.checked_mul(other.den).ok_or_else(overflow)?;
        let rhs = other.num.checked_mul(self.den).ok_or_else(overflow)?;
        Rational::new(
            lhs.checked_add(rhs).ok_or_else(overflow)?,
            self.den.checked_mul(other.den).ok_or_else(overflow)?,
        )
    }

    fn checked_mul(&self, other: &Rational) -> Result<Rational, EvalError> {
        Rational::new(
            self.num.checked_mul(other.num).ok_or_else(overflow)?,
            self.den.checked_mul(other.den).ok_or_else(overflow)?,
        )
    }

    fn checked_div(&self, other: &Rational) -> Result<Rational, EvalError> {
        if other.num == 0 {
            return Err(division_by_zero());
        }
        Rational::new(
            self.num.checked_mul(other.den).ok_or_else(overflow)?,
            self.den.checked_mul(other.num).ok_or_else(overflow)?,
        )
    }

    /// Floor of the exact value, as an integer.
    pub fn floor(&self) -> i128 {
        self.num.div_euclid(self.den)
    }

    pub fn ceil(&self) -> i128 {
        if self.den == 1 {
            self.num
        } else {
            self.floor() + 1
        }
    }

    /// Rounds half away from zero.
    pub fn round(&self) -> Result<i128, EvalError> {
        let doubled = Rational::new(
            self.num.checked_mul(2).ok_or_else(overflow)?,
            self.den,
        )?;
        if self.num >= 0 {
            Ok((doubled.floor() + 1).div_euclid(2))
        } else {
            Ok(-(((-doubled.num).div_euclid(doubled.den) + 1).div_euclid(2)))
        }
    }

    /// Floored remainder, matching the sign of the divisor.
    fn checked_rem(&self, other: &Rational) -> Result<Rational, EvalError> {
        if other.num == 0 {
            return Err(division_by_zero());
        }
        let quotient = self.checked_div(other)?.floor();
        let scaled = other.checked_mul(&Rational::integer(quotient))?;
        self.checked_add(&scaled.checked_neg()?)
    }

    fn checked_neg(&self) -> Result<Rational, EvalError> {
        Ok(Rational {
            num: self.num.checked_neg().ok_or_else(overflow)?,
            den: self.den,
        })
    }

    fn checked_inverse(&self) -> Result<Rational, EvalError> {
        if self.num == 0 {
            return Err(division_by_zero());
        }
        Rational::new(self.den, self.num)
    }

    /// Raises to an integral power, staying exact.
    fn checked_pow(&self, exponent: i128) -> Result<Rational, EvalError> {
        if exponent == 0 {
            return Ok(Rational::integer(1));
        }
        let base = if exponent < 0 {
            self.checked_inverse()?
        } else {
            *self
        };
        let magnitude =
            u32::try_from(exponent.unsigned_abs()).map_err(|_| overflow())?;
        Rational::new(
            base.num.checked_pow(magnitude).ok_or_else(overflow)?,
            base.den.checked_pow(magnitude).ok_or_else(overflow)?,
        )
    }

    fn compare(&self, other: &Rational) -> Ordering {
        match (
            self.num.checked_mul(other.den),
            other.num.checked_mul(self.den),
        ) {
            (Some(lhs), Some(rhs)) => lhs.cmp(&rhs),
            // Cross products overflow only far outside any practical range;
            // fall back to floating comparison there.
            _ => self
                .to_f64()
                .partial_cmp(&other.to_f64())
                .unwrap_or(Ordering::Equal),
        }
    }
}

/// A number: exact rational or IEEE float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Rational(Rational),
    Float(f64),
}

impl Number {
    pub fn integer(n: i128) -> Number {
        Number::Rational(Rational::integer(n))
    }

    /// Builds an exact fraction.
    ///
    /// # Panics
    ///
    /// Panics if `den` is zero.
    pub fn rational(num: i128, den: i128) -> Number {
        match Rational::new(num, den) {
            Ok(r) => Number::Rational(r),
            Err(_) => panic!("denominator must be non-zero"),
        }
    }

    pub fn float(f: f64) -> Number {
        Number::Float(f)
    }

    /// Parses a numeric literal: integer and decimal forms stay exact,
    /// exponent forms (and anything too large for `i128`) go floating.
    pub fn parse_literal(text: &str) -> Option<Number> {
        if text.contains(['e', 'E']) {
            return f64::from_str(text).ok().map(Number::Float);
        }
        if text.contains('.') {
            if let Ok(d) = Decimal::from_str_exact(text) {
                let den = 10i128.checked_pow(d.scale())?;
                if let Ok(r) = Rational::new(d.mantissa(), den) {
                    return Some(Number::Rational(r));
                }
            }
            return f64::from_str(text).ok().map(Number::Float);
        }
        if let Ok(n) = i128::from_str(text) {
            return Some(Number::integer(n));
        }
        f64::from_str(text).ok().map(Number::Float)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// The exact integer value, if this is an integral rational.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Number::Rational(r) if r.is_integer() => Some(r.numerator()),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Rational(r) => r.is_zero(),
            Number::Float(f) => *f == 0.0,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Rational(r) => r.to_f64(),
            Number::Float(f) => *f,
        }
    }

    pub fn add(&self, other: &Number) -> Result<Number, EvalError> {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => {
                a.checked_add(b).map(Number::Rational)
            }
            _ => Ok(Number::Float(self.to_f64() + other.to_f64())),
        }
    }

    pub fn sub(&self, other: &Number) -> Result<Number, EvalError> {
        self.add(&other.neg()?)
    }

    pub fn mul(&self, other: &Number) -> Result<Number, EvalError> {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => {
                a.checked_mul(b).map(Number::Rational)
            }
            _ => Ok(Number::Float(self.to_f64() * other.to_f64())),
        }
    }

    pub fn div(&self, other: &Number) -> Result<Number, EvalError> {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => {
                a.checked_div(b).map(Number::Rational)
            }
            // Float division by zero follows IEEE
            _ => Ok(Number::Float(self.to_f64() / other.to_f64())),
        }
    }

    pub fn rem(&self, other: &Number) -> Result<Number, EvalError> {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => {
                a.checked_rem(b).map(Number::Rational)
            }
            _ => {
                let (a, b) = (self.to_f64(), other.to_f64());
                Ok(Number::Float(a - b * (a / b).floor()))
            }
        }
    }

    /// Exponentiation. Exact base with integral exponent stays exact
    /// (negative exponents invert); everything else floats.
    pub fn pow(&self, other: &Number) -> Result<Number, EvalError> {
        match (self, other) {
            (Number::Rational(base), Number::Rational(exp)) if exp.is_integer() => {
                if base.is_zero() && exp.numerator() < 0 {
                    return Err(division_by_zero());
                }
                base.checked_pow(exp.numerator()).map(Number::Rational)
            }
            _ => Ok(Number::Float(self.to_f64().powf(other.to_f64()))),
        }
    }

    pub fn neg(&self) -> Result<Number, EvalError> {
        match self {
            Number::Rational(r) => r.checked_neg().map(Number::Rational),
            Number::Float(f) => Ok(Number::Float(-f)),
        }
    }

    pub fn inverse(&self) -> Result<Number, EvalError> {
        match self {
            Number::Rational(r) => r.checked_inverse().map(Number::Rational),
            Number::Float(f) => Ok(Number::Float(1.0 / f)),
        }
    }

    pub fn abs(&self) -> Result<Number, EvalError> {
        match self {
            Number::Rational(r) if r.numerator() < 0 => {
                r.checked_neg().map(Number::Rational)
            }
            Number::Rational(r) => Ok(Number::Rational(*r)),
            Number::Float(f) => Ok(Number::Float(f.abs())),
        }
    }

    /// Numeric ordering across representations; `None` only for NaN.
    pub fn compare(&self, other: &Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => Some(a.compare(b)),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    /// Value equality across representations (`1 == 1.0`).
    pub fn eq_value(&self, other: &Number) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Rational(r) if r.is_integer() => write!(f, "{}", r.numerator()),
            Number::Rational(r) => write!(f, "{}/{}", r.numerator(), r.denominator()),
            Number::Float(v) if v.is_nan() => write!(f, "NaN"),
            Number::Float(v) if v.is_infinite() && *v > 0.0 => write!(f, "Infinity"),
            Number::Float(v) if v.is_infinite() => write!(f, "-Infinity"),
            Number::Float(v) if v.fract() == 0.0 => write!(f, "{:.1}", v),
            Number::Float(v) => write!(f, "{}", v),
        }
    }
}
