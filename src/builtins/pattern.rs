//! Regex-backed text functions, compiled only with the `regex` feature.
//!
//! Compiled patterns are cached process-wide. The cache is bounded and
//! cleared wholesale when full; patterns beyond a length bound are
//! rejected before compilation.

use crate::error::EvaluationError;
use crate::value::Value;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use std::collections::HashMap;

/// Longest pattern the backend will compile.
const MAX_PATTERN_LEN: usize = 1000;

/// Bound on distinct cached patterns.
const MAX_CACHE_SIZE: usize = 100;

static PATTERN_CACHE: Lazy<Mutex<HashMap<String, Regex>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn cached_regex(pattern: &str) -> Result<Regex, EvaluationError> {
    if pattern.len() > MAX_PATTERN_LEN {
        return Err(EvaluationError::PatternTooLong {
            length: pattern.len(),
        });
    }
    let mut cache = PATTERN_CACHE.lock();
    if let Some(re) = cache.get(pattern) {
        return Ok(re.clone());
    }
    let re = Regex::new(pattern)?;
    if cache.len() >= MAX_CACHE_SIZE {
        cache.clear();
    }
    cache.insert(pattern.to_string(), re.clone());
    Ok(re)
}

/// True iff the pattern matches the entire subject.
pub(crate) fn matches(args: &[Value]) -> Result<Value, EvaluationError> {
    let s = args[0].as_string();
    let pattern = args[1].as_string();
    let re = cached_regex(&format!(r"\A(?:{pattern})\z"))?;
    Ok(Value::Bool(re.is_match(&s)))
}

/// True iff the pattern matches anywhere in the subject.
pub(crate) fn find(args: &[Value]) -> Result<Value, EvaluationError> {
    let s = args[0].as_string();
    let re = cached_regex(&args[1].as_string())?;
    Ok(Value::Bool(re.is_match(&s)))
}

/// Literal replacement of every occurrence.
pub(crate) fn replace(args: &[Value]) -> Result<Value, EvaluationError> {
    let s = args[0].as_string();
    let from = args[1].as_string();
    let to = args[2].as_string();
    Ok(Value::String(s.replace(&from, &to)))
}

/// Regex replacement of the first match; `$1`..`$9` reference capture
/// groups in the replacement.
pub(crate) fn replace_first(args: &[Value]) -> Result<Value, EvaluationError> {
    let s = args[0].as_string();
    let re = cached_regex(&args[1].as_string())?;
    let repl = args[2].as_string();
    Ok(Value::String(re.replace(&s, repl.as_str()).into_owned()))
}

/// Regex replacement of every match; `$1`..`$9` reference capture groups
/// in the replacement.
pub(crate) fn replace_all(args: &[Value]) -> Result<Value, EvaluationError> {
    let s = args[0].as_string();
    let re = cached_regex(&args[1].as_string())?;
    let repl = args[2].as_string();
    Ok(Value::String(re.replace_all(&s, repl.as_str()).into_owned()))
}

/// Byte index of the first occurrence of a literal substring, or -1.
pub(crate) fn index_of(args: &[Value]) -> Result<Value, EvaluationError> {
    let s = args[0].as_string();
    let needle = args[1].as_string();
    Ok(Value::SignedInt(
        s.find(&needle).map(|i| i as i64).unwrap_or(-1),
    ))
}

/// Byte index of the last occurrence of a literal substring, or -1.
pub(crate) fn last_index_of(args: &[Value]) -> Result<Value, EvaluationError> {
    let s = args[0].as_string();
    let needle = args[1].as_string();
    Ok(Value::SignedInt(
        s.rfind(&needle).map(|i| i as i64).unwrap_or(-1),
    ))
}
