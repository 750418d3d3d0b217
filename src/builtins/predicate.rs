//! Null tests, numeric comparisons, and boolean logic.

use crate::builtins::string::trim_ascii;
use crate::error::EvaluationError;
use crate::value::{Number, Value};
use std::cmp::Ordering;

/// True iff the subject is the null-marker.
pub(crate) fn is_null(args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::Bool(args[0].is_null()))
}

/// Negation of [`is_null`].
pub(crate) fn not_null(args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::Bool(!args[0].is_null()))
}

/// True iff the subject is the null-marker or trims to the empty string.
pub(crate) fn is_empty(args: &[Value]) -> Result<Value, EvaluationError> {
    let s = args[0].as_string();
    Ok(Value::Bool(trim_ascii(&s).is_empty()))
}

fn compare(args: &[Value]) -> Result<Ordering, EvaluationError> {
    let a = args[0].as_number()?;
    let b = args[1].as_number()?;
    Ok(match (a, b) {
        (Number::SignedInt(x), Number::SignedInt(y)) => x.cmp(&y),
        _ => a.to_decimal().cmp(&b.to_decimal()),
    })
}

pub(crate) fn greater_than(args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::Bool(compare(args)? == Ordering::Greater))
}

pub(crate) fn greater_or_equal(args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::Bool(compare(args)? != Ordering::Less))
}

pub(crate) fn less_than(args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::Bool(compare(args)? == Ordering::Less))
}

pub(crate) fn less_or_equal(args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::Bool(compare(args)? != Ordering::Greater))
}

pub(crate) fn and(args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::Bool(args[0].as_bool() && args[1].as_bool()))
}

pub(crate) fn or(args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::Bool(args[0].as_bool() || args[1].as_bool()))
}

pub(crate) fn not(args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::Bool(!args[0].as_bool()))
}

/// The second argument when the subject is true, the third otherwise.
pub(crate) fn if_else(args: &[Value]) -> Result<Value, EvaluationError> {
    if args[0].as_bool() {
        Ok(args[1].clone())
    } else {
        Ok(args[2].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    #[test]
    fn null_tests_distinguish_null_from_empty() {
        assert_eq!(is_null(&[Value::Null]).unwrap(), Value::Bool(true));
        assert_eq!(is_null(&[s("")]).unwrap(), Value::Bool(false));
        assert_eq!(not_null(&[Value::Null]).unwrap(), Value::Bool(false));
        assert_eq!(is_empty(&[Value::Null]).unwrap(), Value::Bool(true));
        assert_eq!(is_empty(&[s("")]).unwrap(), Value::Bool(true));
        assert_eq!(is_empty(&[s(" \t\r\n ")]).unwrap(), Value::Bool(true));
        assert_eq!(is_empty(&[s(" \t a \t ")]).unwrap(), Value::Bool(false));
    }

    #[test]
    fn integer_comparisons() {
        assert_eq!(greater_than(&[s("6"), s("5")]).unwrap(), Value::Bool(true));
        assert_eq!(greater_than(&[s("5"), s("5")]).unwrap(), Value::Bool(false));
        assert_eq!(
            greater_or_equal(&[s("6"), s("6")]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(less_than(&[s("-2"), s("1")]).unwrap(), Value::Bool(true));
        assert_eq!(less_or_equal(&[s("6"), s("6")]).unwrap(), Value::Bool(true));
    }

    #[test]
    fn decimal_comparisons() {
        assert_eq!(
            greater_than(&[s("6.1"), s("6.05")]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            greater_than(&[s("6.1"), s("6.15")]).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(less_than(&[s("6.1"), s("6.15")]).unwrap(), Value::Bool(true));
    }

    #[test]
    fn boolean_logic() {
        assert_eq!(
            and(&[Value::Bool(true), Value::Bool(false)]).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            or(&[Value::Bool(true), Value::Bool(false)]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(not(&[Value::Bool(true)]).unwrap(), Value::Bool(false));
        // Missing attribute coerces to false.
        assert_eq!(
            and(&[Value::Bool(true), Value::Null]).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn conditional_selection() {
        assert_eq!(
            if_else(&[Value::Bool(true), s("yes"), s("no")])
                .unwrap()
                .as_string(),
            "yes"
        );
        assert_eq!(
            if_else(&[Value::Bool(false), s("yes"), s("no")])
                .unwrap()
                .as_string(),
            "no"
        );
    }
}
