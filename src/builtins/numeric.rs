//! Arithmetic and radix conversion.
//!
//! Addition, subtraction, and multiplication stay in exact `i64` when both
//! operands coerce to integers and the operation does not overflow;
//! anything else proceeds in extended precision. Division always proceeds
//! in extended precision, so `11 / 13` yields a fraction rather than zero.

use crate::error::EvaluationError;
use crate::value::{Decimal, Number, Value};
use rand::Rng;

fn binary_op(
    args: &[Value],
    int_op: fn(i64, i64) -> Option<i64>,
    dec_op: fn(&Decimal, &Decimal) -> Decimal,
) -> Result<Value, EvaluationError> {
    let a = args[0].as_number()?;
    let b = args[1].as_number()?;
    if let (Number::SignedInt(x), Number::SignedInt(y)) = (a, b) {
        if let Some(result) = int_op(x, y) {
            return Ok(Value::SignedInt(result));
        }
    }
    Ok(Value::Decimal(dec_op(&a.to_decimal(), &b.to_decimal())))
}

pub(crate) fn plus(args: &[Value]) -> Result<Value, EvaluationError> {
    binary_op(args, i64::checked_add, |a, b| a.add(b))
}

pub(crate) fn minus(args: &[Value]) -> Result<Value, EvaluationError> {
    binary_op(args, i64::checked_sub, |a, b| a.sub(b))
}

pub(crate) fn multiply(args: &[Value]) -> Result<Value, EvaluationError> {
    binary_op(args, i64::checked_mul, |a, b| a.mul(b))
}

pub(crate) fn divide(args: &[Value]) -> Result<Value, EvaluationError> {
    let a = args[0].as_number()?.to_decimal();
    let b = args[1].as_number()?.to_decimal();
    a.div(&b)
        .map(Value::Decimal)
        .ok_or(EvaluationError::DivisionByZero)
}

fn radix_arg(value: &Value) -> Result<u32, EvaluationError> {
    let radix = value.as_signed_long()?;
    if !(2..=36).contains(&radix) {
        return Err(EvaluationError::InvalidRadix { radix });
    }
    Ok(radix as u32)
}

/// Render the subject integer in the given radix, lowercase, optionally
/// zero-padded to a minimum width after any leading `-`.
pub(crate) fn to_radix(args: &[Value]) -> Result<Value, EvaluationError> {
    let value = args[0].as_signed_long()?;
    let radix = radix_arg(&args[1])?;
    let min_width = if args.len() > 2 {
        args[2].as_signed_long()?.max(0) as usize
    } else {
        0
    };

    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut magnitude = value.unsigned_abs();
    let mut digits = Vec::new();
    loop {
        digits.push(DIGITS[(magnitude % radix as u64) as usize]);
        magnitude /= radix as u64;
        if magnitude == 0 {
            break;
        }
    }
    while digits.len() < min_width {
        digits.push(b'0');
    }
    digits.reverse();

    let body: String = digits.into_iter().map(char::from).collect();
    let out = if value < 0 {
        format!("-{body}")
    } else {
        body
    };
    Ok(Value::String(out))
}

/// Parse the subject as an integer in the given radix; a leading `-` is
/// accepted. Non-negative results are unsigned.
pub(crate) fn from_radix(args: &[Value]) -> Result<Value, EvaluationError> {
    let s = args[0].as_string();
    let radix = radix_arg(&args[1])?;

    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.as_str()),
    };
    if digits.is_empty() {
        return Err(EvaluationError::not_a_number(s.clone()));
    }

    let mut magnitude: u64 = 0;
    for ch in digits.chars() {
        let digit = ch
            .to_digit(radix)
            .ok_or(EvaluationError::InvalidDigit {
                digit: ch,
                radix: radix as i64,
            })?;
        magnitude = magnitude
            .checked_mul(radix as u64)
            .and_then(|m| m.checked_add(digit as u64))
            .ok_or_else(|| EvaluationError::out_of_range(s.clone()))?;
    }

    if negative {
        i64::try_from(-(magnitude as i128))
            .map(Value::SignedInt)
            .map_err(|_| EvaluationError::out_of_range(s.clone()))
    } else {
        Ok(Value::UnsignedInt(magnitude))
    }
}

/// A fresh positive signed integer from the process RNG.
pub(crate) fn random(_args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::SignedInt(rand::thread_rng().gen_range(1..=i64::MAX)))
}
