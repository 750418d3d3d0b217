//! The typed runtime value produced by expression evaluation.
//!
//! Every value renders to a string with [`Value::as_string`]; numeric
//! variants round-trip through that rendering without loss within their
//! domain. A value never borrows from the record that produced it.

pub mod decimal;

pub use decimal::Decimal;

use crate::error::EvaluationError;
use std::fmt;

/// A tagged runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// UTF-8 text, the canonical form.
    String(String),
    /// Base-10 integer literal or exact integer arithmetic result.
    SignedInt(i64),
    /// Result of radix conversions.
    UnsignedInt(u64),
    /// Extended-precision number, used whenever a decimal point or
    /// exponent appears or an integer operation would overflow.
    Decimal(Decimal),
    /// Boolean.
    Bool(bool),
    /// The null-marker: a referenced attribute that no record defines.
    /// Renders as the empty string but stays distinguishable from it.
    Null,
}

/// A coerced numeric operand: integers stay exact, everything else is
/// extended-precision.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Number {
    SignedInt(i64),
    Decimal(Decimal),
}

impl Number {
    pub(crate) fn to_decimal(self) -> Decimal {
        match self {
            Number::SignedInt(v) => Decimal::from_i64(v),
            Number::Decimal(d) => d,
        }
    }
}

impl Value {
    /// Human-readable variant name, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::SignedInt(_) => "integer",
            Value::UnsignedInt(_) => "unsigned integer",
            Value::Decimal(_) => "decimal",
            Value::Bool(_) => "boolean",
            Value::Null => "null",
        }
    }

    /// True iff this is the null-marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Render to a string. The null-marker renders empty.
    pub fn as_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::SignedInt(v) => v.to_string(),
            Value::UnsignedInt(v) => v.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
        }
    }

    /// Coerce to a signed 64-bit integer. Strings parse as base-10 with an
    /// optional leading `-`; decimals truncate toward zero; booleans and
    /// the null-marker have no integer meaning.
    pub fn as_signed_long(&self) -> Result<i64, EvaluationError> {
        match self {
            Value::SignedInt(v) => Ok(*v),
            Value::UnsignedInt(v) => {
                i64::try_from(*v).map_err(|_| EvaluationError::out_of_range(v.to_string()))
            }
            Value::Decimal(d) => d
                .trunc_to_i64()
                .ok_or_else(|| EvaluationError::out_of_range(d.to_string())),
            Value::String(s) => {
                let t = s.trim();
                if let Ok(v) = t.parse::<i64>() {
                    return Ok(v);
                }
                Decimal::parse(t)
                    .and_then(|d| d.trunc_to_i64())
                    .ok_or_else(|| EvaluationError::not_a_number(s.clone()))
            }
            Value::Bool(_) | Value::Null => {
                Err(EvaluationError::not_a_number(self.as_string()))
            }
        }
    }

    /// Coerce to a boolean. A string is true iff it equals `true`
    /// case-insensitively; numerics are true iff non-zero; the null-marker
    /// is false.
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::String(s) => s.eq_ignore_ascii_case("true"),
            Value::SignedInt(v) => *v != 0,
            Value::UnsignedInt(v) => *v != 0,
            Value::Decimal(d) => !d.is_zero(),
            Value::Null => false,
        }
    }

    /// Coerce to a numeric operand. A string is an exact integer iff it is
    /// an optional sign followed by digits and fits `i64`; otherwise it
    /// parses as a decimal (accepting fractional and exponent forms).
    pub(crate) fn as_number(&self) -> Result<Number, EvaluationError> {
        match self {
            Value::SignedInt(v) => Ok(Number::SignedInt(*v)),
            Value::UnsignedInt(v) => match i64::try_from(*v) {
                Ok(v) => Ok(Number::SignedInt(v)),
                Err(_) => Ok(Number::Decimal(Decimal::from_u64(*v))),
            },
            Value::Decimal(d) => Ok(Number::Decimal(*d)),
            Value::String(s) => {
                let t = s.trim();
                if is_integer_literal(t) {
                    if let Ok(v) = t.parse::<i64>() {
                        return Ok(Number::SignedInt(v));
                    }
                }
                Decimal::parse(t)
                    .map(Number::Decimal)
                    .ok_or_else(|| EvaluationError::not_a_number(s.clone()))
            }
            Value::Bool(_) | Value::Null => {
                Err(EvaluationError::not_a_number(self.as_string()))
            }
        }
    }
}

/// Optional sign followed by one or more ASCII digits, nothing else.
fn is_integer_literal(s: &str) -> bool {
    let digits = s
        .strip_prefix('-')
        .or_else(|| s.strip_prefix('+'))
        .unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendering() {
        assert_eq!(Value::String("abc".into()).as_string(), "abc");
        assert_eq!(Value::SignedInt(-42).as_string(), "-42");
        assert_eq!(Value::UnsignedInt(10).as_string(), "10");
        assert_eq!(Value::Bool(true).as_string(), "true");
        assert_eq!(Value::Bool(false).as_string(), "false");
        assert_eq!(Value::Null.as_string(), "");
        assert_eq!(
            Value::Decimal(Decimal::parse("1.50").unwrap()).as_string(),
            "1.5"
        );
    }

    #[test]
    fn signed_long_coercion() {
        assert_eq!(Value::String("11".into()).as_signed_long().unwrap(), 11);
        assert_eq!(Value::String("-11".into()).as_signed_long().unwrap(), -11);
        assert_eq!(Value::String("11.9".into()).as_signed_long().unwrap(), 11);
        assert_eq!(Value::SignedInt(7).as_signed_long().unwrap(), 7);
        assert!(Value::Bool(true).as_signed_long().is_err());
        assert!(Value::Null.as_signed_long().is_err());
        assert!(Value::String("abc".into()).as_signed_long().is_err());
    }

    #[test]
    fn bool_coercion() {
        assert!(Value::String("true".into()).as_bool());
        assert!(Value::String("TRUE".into()).as_bool());
        assert!(!Value::String("false".into()).as_bool());
        assert!(!Value::String("anything else".into()).as_bool());
        assert!(Value::SignedInt(-1).as_bool());
        assert!(!Value::SignedInt(0).as_bool());
        assert!(!Value::Null.as_bool());
    }

    #[test]
    fn number_classification() {
        assert!(matches!(
            Value::String("11".into()).as_number().unwrap(),
            Number::SignedInt(11)
        ));
        assert!(matches!(
            Value::String("11.1".into()).as_number().unwrap(),
            Number::Decimal(_)
        ));
        assert!(matches!(
            Value::String("10e+6".into()).as_number().unwrap(),
            Number::Decimal(_)
        ));
        // Too wide for i64, still numeric.
        assert!(matches!(
            Value::String("99999999999999999999".into()).as_number().unwrap(),
            Number::Decimal(_)
        ));
        assert!(Value::Null.as_number().is_err());
    }
}
