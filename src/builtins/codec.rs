//! Escape and unescape codecs: JSON, XML, HTML, CSV.

use crate::error::EvaluationError;
use crate::value::Value;

/// JSON string escaping of `"`, `\`, and control characters.
pub(crate) fn escape_json(args: &[Value]) -> Result<Value, EvaluationError> {
    let s = args[0].as_string();
    let quoted = serde_json::to_string(&s)?;
    // to_string of a &str wraps the escaped body in quotes.
    Ok(Value::String(quoted[1..quoted.len() - 1].to_string()))
}

/// Inverse of [`escape_json`]; also accepts `\/` and `\uXXXX` forms.
pub(crate) fn unescape_json(args: &[Value]) -> Result<Value, EvaluationError> {
    let s = args[0].as_string();
    let unescaped: String = serde_json::from_str(&format!("\"{s}\""))?;
    Ok(Value::String(unescaped))
}

fn replace_pairs(mut s: String, pairs: &[(&str, &str)]) -> String {
    for (from, to) in pairs {
        s = s.replace(from, to);
    }
    s
}

// The XML replacement order is observable: quotes are rewritten before the
// ampersand pass, so `"` renders as `&amp;quot;`; the unescape table runs
// `&amp;` before `&quot;` to invert that.
const XML_ESCAPE: &[(&str, &str)] = &[
    ("\"", "&quot;"),
    ("&", "&amp;"),
    ("'", "&apos;"),
    ("<", "&lt;"),
    (">", "&gt;"),
];

const XML_UNESCAPE: &[(&str, &str)] = &[
    ("&apos;", "'"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
    ("&quot;", "\""),
];

pub(crate) fn escape_xml(args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::String(replace_pairs(args[0].as_string(), XML_ESCAPE)))
}

pub(crate) fn unescape_xml(args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::String(replace_pairs(
        args[0].as_string(),
        XML_UNESCAPE,
    )))
}

const HTML3_ESCAPE: &[(&str, &str)] = &[
    ("&", "&amp;"),
    ("<", "&lt;"),
    (">", "&gt;"),
    ("\"", "&quot;"),
];

const HTML3_UNESCAPE: &[(&str, &str)] = &[
    ("&quot;", "\""),
    ("&gt;", ">"),
    ("&lt;", "<"),
    ("&amp;", "&"),
];

const HTML4_ESCAPE: &[(&str, &str)] = &[
    ("&", "&amp;"),
    ("<", "&lt;"),
    (">", "&gt;"),
    ("\"", "&quot;"),
    ("'", "&apos;"),
];

const HTML4_UNESCAPE: &[(&str, &str)] = &[
    ("&apos;", "'"),
    ("&quot;", "\""),
    ("&gt;", ">"),
    ("&lt;", "<"),
    ("&amp;", "&"),
];

pub(crate) fn escape_html3(args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::String(replace_pairs(
        args[0].as_string(),
        HTML3_ESCAPE,
    )))
}

pub(crate) fn unescape_html3(args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::String(replace_pairs(
        args[0].as_string(),
        HTML3_UNESCAPE,
    )))
}

pub(crate) fn escape_html4(args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::String(replace_pairs(
        args[0].as_string(),
        HTML4_ESCAPE,
    )))
}

pub(crate) fn unescape_html4(args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::String(replace_pairs(
        args[0].as_string(),
        HTML4_UNESCAPE,
    )))
}

/// RFC 4180 field quoting: wrap when the field contains a comma, quote,
/// CR, or LF, doubling embedded quotes.
pub(crate) fn escape_csv(args: &[Value]) -> Result<Value, EvaluationError> {
    let s = args[0].as_string();
    if s.contains([',', '"', '\r', '\n']) {
        Ok(Value::String(format!("\"{}\"", s.replace('"', "\"\""))))
    } else {
        Ok(Value::String(s))
    }
}

/// Inverse of [`escape_csv`]; unquoted input passes through.
pub(crate) fn unescape_csv(args: &[Value]) -> Result<Value, EvaluationError> {
    let s = args[0].as_string();
    let unquoted = s
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .map(|inner| inner.replace("\"\"", "\""));
    Ok(Value::String(unquoted.unwrap_or(s)))
}
