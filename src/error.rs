//! Error types for expression compilation and evaluation.
//!
//! Uses thiserror for clean, idiomatic Rust error definitions. Compilation
//! failures are [`ParseError`]; runtime failures are [`EvaluationError`].
//! An evaluation error never poisons the expression: the caller may catch
//! it and evaluate the same expression again.

use thiserror::Error;

/// Errors raised while compiling a template into an [`Expression`](crate::Expression).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A `${` was opened but never closed.
    #[error("unmatched '${{' opened at byte {position}")]
    UnmatchedExpression { position: usize },

    /// A quoted string reached end of input without its closing quote.
    #[error("unterminated quoted string starting at byte {position}")]
    UnterminatedString { position: usize },

    /// A character that cannot start any token inside `${ ... }`.
    #[error("unexpected character '{character}' at byte {position}")]
    UnexpectedCharacter { character: char, position: usize },

    /// A well-formed token in a position the grammar does not allow.
    #[error("unexpected {found} at byte {position}")]
    UnexpectedToken { found: String, position: usize },

    /// A numeric literal that is neither an integer nor a valid decimal.
    #[error("malformed numeric literal \"{literal}\"")]
    InvalidNumber { literal: String },

    /// A function name with no registry entry.
    #[error("unknown expression language function \"{name}\"")]
    UnknownFunction { name: String },

    /// A known function called with the wrong number of arguments. The
    /// count includes the chained subject.
    #[error("Expression language function {name} called with {given} argument(s), but {required} are required")]
    WrongArgumentCount {
        name: String,
        given: usize,
        required: usize,
    },

    /// A regex-dependent function compiled without the `regex` feature.
    #[error("regex functions unavailable")]
    RegexUnavailable,

    /// Nested `${ ... }` interpolations exceeded the parser depth limit.
    #[error("expression nesting exceeds {limit} levels")]
    TooDeep { limit: usize },
}

/// Errors raised while evaluating a compiled expression against a record set.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum EvaluationError {
    /// A value that cannot be coerced to a number where one is required.
    #[error("expected a numeric value, got \"{value}\"")]
    NotANumber { value: String },

    /// A numeric value outside the 64-bit signed integer range.
    #[error("integer value out of range: \"{value}\"")]
    IntegerOutOfRange { value: String },

    /// A boolean context received a value with no boolean meaning.
    #[error("expected a boolean value, got \"{value}\"")]
    NotABoolean { value: String },

    /// A radix outside the supported 2..=36 range.
    #[error("invalid radix {radix}: must be between 2 and 36")]
    InvalidRadix { radix: i64 },

    /// A digit that does not exist in the requested radix.
    #[error("invalid digit '{digit}' for radix {radix}")]
    InvalidDigit { digit: char, radix: i64 },

    /// Division with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// JSON escaping or unescaping failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation or matching failure from the backend.
    #[cfg(feature = "regex")]
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A regex pattern longer than the backend is willing to compile.
    #[cfg(feature = "regex")]
    #[error("regex pattern too long ({length} bytes)")]
    PatternTooLong { length: usize },
}

impl EvaluationError {
    /// Create a not-a-number error from the offending rendering.
    pub(crate) fn not_a_number(value: impl Into<String>) -> Self {
        Self::NotANumber {
            value: value.into(),
        }
    }

    /// Create an out-of-range error from the offending rendering.
    pub(crate) fn out_of_range(value: impl Into<String>) -> Self {
        Self::IntegerOutOfRange {
            value: value.into(),
        }
    }
}

/// Combined error for call sites that can fail either way, such as
/// [`MaybeExpression::resolve`](crate::MaybeExpression::resolve) which
/// compiles lazily.
#[derive(Error, Debug)]
pub enum ExpressionError {
    /// The template failed to compile.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The compiled expression failed to evaluate.
    #[error(transparent)]
    Eval(#[from] EvaluationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_argument_count_message() {
        let err = ParseError::WrongArgumentCount {
            name: "substringBefore".to_string(),
            given: 1,
            required: 2,
        };
        assert_eq!(
            err.to_string(),
            "Expression language function substringBefore called with 1 argument(s), but 2 are required"
        );
    }

    #[test]
    fn regex_unavailable_message() {
        assert_eq!(
            ParseError::RegexUnavailable.to_string(),
            "regex functions unavailable"
        );
    }

    #[test]
    fn evaluation_error_messages() {
        assert!(EvaluationError::not_a_number("abc")
            .to_string()
            .contains("abc"));
        assert_eq!(
            EvaluationError::DivisionByZero.to_string(),
            "division by zero"
        );
    }
}
