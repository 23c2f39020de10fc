//! Numeric model shared by the arithmetic operators.
//!
//! Integers stay integers while they fit; anything else falls back to `f64`.
//! Integral float results are folded back to integers so `5 * 1.2` is `6`.

use serde_json::{Number, Value};

/// Largest integer an `f64` represents exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    pub(crate) const ZERO: Self = Self::Int(0);
    pub(crate) const ONE: Self = Self::Int(1);

    pub(crate) fn from_value(value: &Value) -> Option<Self> {
        let Value::Number(number) = value else {
            return None;
        };
        number
            .as_i64()
            .map(Self::Int)
            .or_else(|| number.as_f64().map(Self::Float))
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "mixed integer and float arithmetic follows f64 semantics"
    )]
    fn as_f64(self) -> f64 {
        match self {
            Self::Int(value) => value as f64,
            Self::Float(value) => value,
        }
    }

    pub(crate) fn add(self, other: Self) -> Self {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a
                .checked_add(b)
                .map_or_else(|| Self::Float(self.as_f64() + other.as_f64()), Self::Int),
            _ => Self::Float(self.as_f64() + other.as_f64()),
        }
    }

    pub(crate) fn mul(self, other: Self) -> Self {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a
                .checked_mul(b)
                .map_or_else(|| Self::Float(self.as_f64() * other.as_f64()), Self::Int),
            _ => Self::Float(self.as_f64() * other.as_f64()),
        }
    }

    pub(crate) fn into_value(self) -> Value {
        match self {
            Self::Int(value) => Value::from(value),
            Self::Float(value) => number_value(value),
        }
    }
}

/// Convert an `f64` into a JSON number using the crate's numeric model.
///
/// Integral values within the exactly representable range become integers,
/// non-finite values become `null`.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tree_ops::number_value;
///
/// assert_eq!(number_value(5.0 * 1.2), json!(6));
/// assert_eq!(number_value(0.5), json!(0.5));
/// assert_eq!(number_value(f64::NAN), json!(null));
/// ```
#[must_use]
pub fn number_value(value: f64) -> Value {
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "value is integral and within the exactly representable range"
        )]
        let integral = value as i64;
        return Value::from(integral);
    }
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}
