//! Built-in functions of the expression language, organized by category.
//!
//! All functions live in a single registry mapping a name to an arity and
//! a [`Function`] id. The parser resolves names and checks arities at
//! compile time; the evaluator dispatches through [`Function::call`] with
//! the already-evaluated arguments, the chained subject first.

pub(crate) mod codec;
pub(crate) mod environment;
pub(crate) mod numeric;
#[cfg(feature = "regex")]
pub(crate) mod pattern;
pub(crate) mod predicate;
pub(crate) mod string;

use crate::error::{EvaluationError, ParseError};
use crate::value::Value;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Identifier of a resolved built-in function, embedded in the AST.
/// Variant names match the registered function names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
#[allow(missing_docs)]
pub enum Function {
    // String
    ToUpper,
    ToLower,
    Trim,
    Substring,
    SubstringBefore,
    SubstringAfter,
    SubstringBeforeLast,
    SubstringAfterLast,
    StartsWith,
    EndsWith,
    Contains,
    In,
    Equals,
    EqualsIgnoreCase,
    Length,
    Prepend,
    Append,
    ReplaceNull,
    ReplaceEmpty,

    // Regex-backed
    #[cfg(feature = "regex")]
    Matches,
    #[cfg(feature = "regex")]
    Find,
    #[cfg(feature = "regex")]
    Replace,
    #[cfg(feature = "regex")]
    ReplaceFirst,
    #[cfg(feature = "regex")]
    ReplaceAll,
    #[cfg(feature = "regex")]
    IndexOf,
    #[cfg(feature = "regex")]
    LastIndexOf,

    // Numeric
    Plus,
    Minus,
    Multiply,
    Divide,
    ToRadix,
    FromRadix,
    Random,

    // Predicates
    IsNull,
    NotNull,
    IsEmpty,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    And,
    Or,
    Not,
    IfElse,

    // Codecs
    EscapeJson,
    UnescapeJson,
    EscapeXml,
    UnescapeXml,
    EscapeHtml3,
    EscapeHtml4,
    UnescapeHtml3,
    UnescapeHtml4,
    EscapeCsv,
    UnescapeCsv,

    // Environmental
    Hostname,
    Now,
    Literal,
    Uuid,
}

impl Function {
    /// Apply the function to evaluated arguments (subject first for
    /// chained calls). Arity was validated at compile time.
    pub(crate) fn call(&self, args: &[Value]) -> Result<Value, EvaluationError> {
        match self {
            Function::ToUpper => string::to_upper(args),
            Function::ToLower => string::to_lower(args),
            Function::Trim => string::trim(args),
            Function::Substring => string::substring(args),
            Function::SubstringBefore => string::substring_before(args),
            Function::SubstringAfter => string::substring_after(args),
            Function::SubstringBeforeLast => string::substring_before_last(args),
            Function::SubstringAfterLast => string::substring_after_last(args),
            Function::StartsWith => string::starts_with(args),
            Function::EndsWith => string::ends_with(args),
            Function::Contains => string::contains(args),
            Function::In => string::in_list(args),
            Function::Equals => string::equals(args),
            Function::EqualsIgnoreCase => string::equals_ignore_case(args),
            Function::Length => string::length(args),
            Function::Prepend => string::prepend(args),
            Function::Append => string::append(args),
            Function::ReplaceNull => string::replace_null(args),
            Function::ReplaceEmpty => string::replace_empty(args),

            #[cfg(feature = "regex")]
            Function::Matches => pattern::matches(args),
            #[cfg(feature = "regex")]
            Function::Find => pattern::find(args),
            #[cfg(feature = "regex")]
            Function::Replace => pattern::replace(args),
            #[cfg(feature = "regex")]
            Function::ReplaceFirst => pattern::replace_first(args),
            #[cfg(feature = "regex")]
            Function::ReplaceAll => pattern::replace_all(args),
            #[cfg(feature = "regex")]
            Function::IndexOf => pattern::index_of(args),
            #[cfg(feature = "regex")]
            Function::LastIndexOf => pattern::last_index_of(args),

            Function::Plus => numeric::plus(args),
            Function::Minus => numeric::minus(args),
            Function::Multiply => numeric::multiply(args),
            Function::Divide => numeric::divide(args),
            Function::ToRadix => numeric::to_radix(args),
            Function::FromRadix => numeric::from_radix(args),
            Function::Random => numeric::random(args),

            Function::IsNull => predicate::is_null(args),
            Function::NotNull => predicate::not_null(args),
            Function::IsEmpty => predicate::is_empty(args),
            Function::GreaterThan => predicate::greater_than(args),
            Function::GreaterOrEqual => predicate::greater_or_equal(args),
            Function::LessThan => predicate::less_than(args),
            Function::LessOrEqual => predicate::less_or_equal(args),
            Function::And => predicate::and(args),
            Function::Or => predicate::or(args),
            Function::Not => predicate::not(args),
            Function::IfElse => predicate::if_else(args),

            Function::EscapeJson => codec::escape_json(args),
            Function::UnescapeJson => codec::unescape_json(args),
            Function::EscapeXml => codec::escape_xml(args),
            Function::UnescapeXml => codec::unescape_xml(args),
            Function::EscapeHtml3 => codec::escape_html3(args),
            Function::EscapeHtml4 => codec::escape_html4(args),
            Function::UnescapeHtml3 => codec::unescape_html3(args),
            Function::UnescapeHtml4 => codec::unescape_html4(args),
            Function::EscapeCsv => codec::escape_csv(args),
            Function::UnescapeCsv => codec::unescape_csv(args),

            Function::Hostname => environment::hostname(args),
            Function::Now => environment::now(args),
            Function::Literal => environment::literal(args),
            Function::Uuid => environment::uuid(args),
        }
    }
}

/// How many arguments a function accepts, chained subject included.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Arity {
    Exact(usize),
    Range(usize, usize),
    AtLeast(usize),
}

impl Arity {
    fn check(&self, name: &str, given: usize) -> Result<(), ParseError> {
        let required = match *self {
            Arity::Exact(n) if given != n => n,
            Arity::Range(lo, _) if given < lo => lo,
            Arity::Range(_, hi) if given > hi => hi,
            Arity::AtLeast(lo) if given < lo => lo,
            _ => return Ok(()),
        };
        Err(ParseError::WrongArgumentCount {
            name: name.to_string(),
            given,
            required,
        })
    }
}

/// Registry of all built-in functions.
struct BuiltinRegistry {
    functions: HashMap<&'static str, (Arity, Function)>,
}

/// Names that require the regex backend; when the `regex` feature is off
/// these must fail with a dedicated message rather than "unknown".
#[cfg(not(feature = "regex"))]
const REGEX_FUNCTION_NAMES: &[&str] = &[
    "matches",
    "find",
    "replace",
    "replaceFirst",
    "replaceAll",
    "indexOf",
    "lastIndexOf",
];

impl BuiltinRegistry {
    fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };

        registry.register_string_functions();
        #[cfg(feature = "regex")]
        registry.register_pattern_functions();
        registry.register_numeric_functions();
        registry.register_predicate_functions();
        registry.register_codec_functions();
        registry.register_environment_functions();

        registry
    }

    fn register(&mut self, name: &'static str, arity: Arity, function: Function) {
        self.functions.insert(name, (arity, function));
    }

    fn resolve(&self, name: &str, argc: usize) -> Result<Function, ParseError> {
        let Some((arity, function)) = self.functions.get(name) else {
            #[cfg(not(feature = "regex"))]
            if REGEX_FUNCTION_NAMES.contains(&name) {
                return Err(ParseError::RegexUnavailable);
            }
            return Err(ParseError::UnknownFunction {
                name: name.to_string(),
            });
        };
        arity.check(name, argc)?;
        Ok(*function)
    }

    fn register_string_functions(&mut self) {
        self.register("toUpper", Arity::Exact(1), Function::ToUpper);
        self.register("toLower", Arity::Exact(1), Function::ToLower);
        self.register("trim", Arity::Exact(1), Function::Trim);
        self.register("substring", Arity::Range(2, 3), Function::Substring);
        self.register("substringBefore", Arity::Exact(2), Function::SubstringBefore);
        self.register("substringAfter", Arity::Exact(2), Function::SubstringAfter);
        self.register(
            "substringBeforeLast",
            Arity::Exact(2),
            Function::SubstringBeforeLast,
        );
        self.register(
            "substringAfterLast",
            Arity::Exact(2),
            Function::SubstringAfterLast,
        );
        self.register("startsWith", Arity::Exact(2), Function::StartsWith);
        self.register("endsWith", Arity::Exact(2), Function::EndsWith);
        self.register("contains", Arity::Exact(2), Function::Contains);
        self.register("in", Arity::AtLeast(2), Function::In);
        self.register("equals", Arity::Exact(2), Function::Equals);
        self.register(
            "equalsIgnoreCase",
            Arity::Exact(2),
            Function::EqualsIgnoreCase,
        );
        self.register("length", Arity::Exact(1), Function::Length);
        self.register("prepend", Arity::Exact(2), Function::Prepend);
        self.register("append", Arity::Exact(2), Function::Append);
        self.register("replaceNull", Arity::Exact(2), Function::ReplaceNull);
        self.register("replaceEmpty", Arity::Exact(2), Function::ReplaceEmpty);
    }

    #[cfg(feature = "regex")]
    fn register_pattern_functions(&mut self) {
        self.register("matches", Arity::Exact(2), Function::Matches);
        self.register("find", Arity::Exact(2), Function::Find);
        self.register("replace", Arity::Exact(3), Function::Replace);
        self.register("replaceFirst", Arity::Exact(3), Function::ReplaceFirst);
        self.register("replaceAll", Arity::Exact(3), Function::ReplaceAll);
        self.register("indexOf", Arity::Exact(2), Function::IndexOf);
        self.register("lastIndexOf", Arity::Exact(2), Function::LastIndexOf);
    }

    fn register_numeric_functions(&mut self) {
        self.register("plus", Arity::Exact(2), Function::Plus);
        self.register("minus", Arity::Exact(2), Function::Minus);
        self.register("multiply", Arity::Exact(2), Function::Multiply);
        self.register("divide", Arity::Exact(2), Function::Divide);
        self.register("toRadix", Arity::Range(2, 3), Function::ToRadix);
        self.register("fromRadix", Arity::Exact(2), Function::FromRadix);
        self.register("random", Arity::Exact(0), Function::Random);
    }

    fn register_predicate_functions(&mut self) {
        self.register("isNull", Arity::Exact(1), Function::IsNull);
        self.register("notNull", Arity::Exact(1), Function::NotNull);
        self.register("isEmpty", Arity::Exact(1), Function::IsEmpty);
        self.register("gt", Arity::Exact(2), Function::GreaterThan);
        self.register("ge", Arity::Exact(2), Function::GreaterOrEqual);
        self.register("lt", Arity::Exact(2), Function::LessThan);
        self.register("le", Arity::Exact(2), Function::LessOrEqual);
        self.register("and", Arity::Exact(2), Function::And);
        self.register("or", Arity::Exact(2), Function::Or);
        self.register("not", Arity::Exact(1), Function::Not);
        self.register("ifElse", Arity::Exact(3), Function::IfElse);
    }

    fn register_codec_functions(&mut self) {
        self.register("escapeJson", Arity::Exact(1), Function::EscapeJson);
        self.register("unescapeJson", Arity::Exact(1), Function::UnescapeJson);
        self.register("escapeXml", Arity::Exact(1), Function::EscapeXml);
        self.register("unescapeXml", Arity::Exact(1), Function::UnescapeXml);
        self.register("escapeHtml3", Arity::Exact(1), Function::EscapeHtml3);
        self.register("escapeHtml4", Arity::Exact(1), Function::EscapeHtml4);
        self.register("unescapeHtml3", Arity::Exact(1), Function::UnescapeHtml3);
        self.register("unescapeHtml4", Arity::Exact(1), Function::UnescapeHtml4);
        self.register("escapeCsv", Arity::Exact(1), Function::EscapeCsv);
        self.register("unescapeCsv", Arity::Exact(1), Function::UnescapeCsv);
    }

    fn register_environment_functions(&mut self) {
        self.register("hostname", Arity::Exact(0), Function::Hostname);
        self.register("now", Arity::Exact(0), Function::Now);
        self.register("literal", Arity::Exact(1), Function::Literal);
        self.register("UUID", Arity::Exact(0), Function::Uuid);
    }
}

static REGISTRY: Lazy<BuiltinRegistry> = Lazy::new(BuiltinRegistry::new);

/// Resolve a function name and argument count to a [`Function`] id.
pub(crate) fn resolve(name: &str, argc: usize) -> Result<Function, ParseError> {
    REGISTRY.resolve(name, argc)
}
