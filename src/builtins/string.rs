//! String manipulation functions.
//!
//! The null-marker renders as the empty string through `as_string`, so the
//! functions here treat a missing attribute like `""` unless they inspect
//! nullness explicitly (`replaceNull`, `replaceEmpty`).

use crate::error::EvaluationError;
use crate::value::Value;

/// Uppercase ASCII letters; other bytes untouched.
pub(crate) fn to_upper(args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::String(args[0].as_string().to_ascii_uppercase()))
}

/// Lowercase ASCII letters; other bytes untouched.
pub(crate) fn to_lower(args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::String(args[0].as_string().to_ascii_lowercase()))
}

/// Strip ASCII whitespace from both ends.
pub(crate) fn trim(args: &[Value]) -> Result<Value, EvaluationError> {
    let s = args[0].as_string();
    Ok(Value::String(trim_ascii(&s).to_string()))
}

pub(crate) fn trim_ascii(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_ascii_whitespace())
}

/// `substring(start)` / `substring(start, length)`, byte positions on the
/// UTF-8 representation, out-of-range clamped.
pub(crate) fn substring(args: &[Value]) -> Result<Value, EvaluationError> {
    let s = args[0].as_string();
    let start = args[1].as_signed_long()?.max(0) as usize;
    let start = start.min(s.len());
    let end = if args.len() > 2 {
        let length = args[2].as_signed_long()?.max(0) as usize;
        start.saturating_add(length).min(s.len())
    } else {
        s.len()
    };
    let bytes = &s.as_bytes()[start..end];
    Ok(Value::String(
        String::from_utf8_lossy(bytes).into_owned(),
    ))
}

/// Everything before the first occurrence of the separator; the whole
/// string when absent.
pub(crate) fn substring_before(args: &[Value]) -> Result<Value, EvaluationError> {
    let s = args[0].as_string();
    let sep = args[1].as_string();
    let cut = s.find(&sep).unwrap_or(s.len());
    Ok(Value::String(s[..cut].to_string()))
}

/// Everything before the last occurrence of the separator; the whole
/// string when absent.
pub(crate) fn substring_before_last(args: &[Value]) -> Result<Value, EvaluationError> {
    let s = args[0].as_string();
    let sep = args[1].as_string();
    let cut = s.rfind(&sep).unwrap_or(s.len());
    Ok(Value::String(s[..cut].to_string()))
}

/// Everything after the first occurrence of the separator; empty when
/// absent.
pub(crate) fn substring_after(args: &[Value]) -> Result<Value, EvaluationError> {
    let s = args[0].as_string();
    let sep = args[1].as_string();
    let out = match s.find(&sep) {
        Some(idx) => s[idx + sep.len()..].to_string(),
        None => String::new(),
    };
    Ok(Value::String(out))
}

/// Everything after the last occurrence of the separator; empty when
/// absent.
pub(crate) fn substring_after_last(args: &[Value]) -> Result<Value, EvaluationError> {
    let s = args[0].as_string();
    let sep = args[1].as_string();
    let out = match s.rfind(&sep) {
        Some(idx) => s[idx + sep.len()..].to_string(),
        None => String::new(),
    };
    Ok(Value::String(out))
}

/// Literal, case-sensitive prefix test.
pub(crate) fn starts_with(args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::Bool(
        args[0].as_string().starts_with(&args[1].as_string()),
    ))
}

/// Literal, case-sensitive suffix test.
pub(crate) fn ends_with(args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::Bool(
        args[0].as_string().ends_with(&args[1].as_string()),
    ))
}

/// Literal, case-sensitive containment test.
pub(crate) fn contains(args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::Bool(
        args[0].as_string().contains(&args[1].as_string()),
    ))
}

/// True iff the subject equals any of the candidate strings.
pub(crate) fn in_list(args: &[Value]) -> Result<Value, EvaluationError> {
    let subject = args[0].as_string();
    Ok(Value::Bool(
        args[1..].iter().any(|v| v.as_string() == subject),
    ))
}

/// String equality after coercing both sides.
pub(crate) fn equals(args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::Bool(args[0].as_string() == args[1].as_string()))
}

/// ASCII case-insensitive string equality after coercing both sides.
pub(crate) fn equals_ignore_case(args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::Bool(
        args[0]
            .as_string()
            .eq_ignore_ascii_case(&args[1].as_string()),
    ))
}

/// Byte length of the rendering.
pub(crate) fn length(args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::SignedInt(args[0].as_string().len() as i64))
}

/// The argument followed by the subject.
pub(crate) fn prepend(args: &[Value]) -> Result<Value, EvaluationError> {
    let mut out = args[1].as_string();
    out.push_str(&args[0].as_string());
    Ok(Value::String(out))
}

/// The subject followed by the argument.
pub(crate) fn append(args: &[Value]) -> Result<Value, EvaluationError> {
    let mut out = args[0].as_string();
    out.push_str(&args[1].as_string());
    Ok(Value::String(out))
}

/// Substitute the argument when the subject is the null-marker.
pub(crate) fn replace_null(args: &[Value]) -> Result<Value, EvaluationError> {
    if args[0].is_null() {
        Ok(args[1].clone())
    } else {
        Ok(args[0].clone())
    }
}

/// Substitute the argument when the subject trims to nothing (the
/// null-marker included).
pub(crate) fn replace_empty(args: &[Value]) -> Result<Value, EvaluationError> {
    let s = args[0].as_string();
    if trim_ascii(&s).is_empty() {
        Ok(args[1].clone())
    } else {
        Ok(args[0].clone())
    }
}
