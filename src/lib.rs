#![warn(clippy::all)]
#![warn(missing_docs)]

//! # conduit-expression
//!
//! Expression language for parameterizing dataflow processor properties.
//!
//! A property template mixes literal text with `${ ... }` expressions that
//! read per-record attributes, invoke built-in functions, and compose them
//! through a pipe-like chaining operator:
//!
//! - Attribute reference: `${filename}`, `${'quoted attribute name'}`
//! - Chained calls: `${filename:toLower():substringBefore('.')}`
//! - Literal escape: `$$` renders a single `$`
//! - Nested interpolation: `${a:equals( ${b} )}`
//!
//! A template compiles once into an immutable [`Expression`] which is then
//! evaluated against ordered sets of [`Record`]s, producing a typed
//! [`Value`] that renders to a string in interpolation contexts.
//!
//! ## Quick start
//!
//! ```
//! use conduit_expression::compile;
//! use std::collections::HashMap;
//!
//! let expr = compile("text_before${attr_a}text_after").unwrap();
//!
//! let mut record = HashMap::new();
//! record.insert("attr_a".to_string(), "__v__".to_string());
//!
//! let result = expr.evaluate(&[&record]).unwrap();
//! assert_eq!(result.as_string(), "text_before__v__text_after");
//! ```
//!
//! ## Typed results
//!
//! A lone expression keeps its type, so numeric chains can be read back
//! without a string round-trip:
//!
//! ```
//! use conduit_expression::compile;
//!
//! let expr = compile("${literal(10):multiply(2):plus(1):multiply(2)}").unwrap();
//! assert_eq!(expr.evaluate(&[]).unwrap().as_signed_long().unwrap(), 42);
//! ```
//!
//! ## Built-in functions
//!
//! The library covers string manipulation (`toUpper`, `trim`,
//! `substring`, the `substringBefore`/`After` family, `replaceNull`,
//! `replaceEmpty`), predicates (`isNull`, `isEmpty`, `gt`, `and`,
//! `ifElse`), arithmetic in exact integers with an extended-precision
//! fallback (`plus`, `minus`, `multiply`, `divide`), radix conversion
//! (`toRadix`, `fromRadix`), escape codecs (JSON, XML, HTML, CSV), and
//! environmental values (`hostname()`, `now()`, `random()`, `UUID()`,
//! `literal(x)`).
//!
//! Regex-backed functions (`matches`, `find`, `replace`, `replaceFirst`,
//! `replaceAll`, `indexOf`, `lastIndexOf`) require the `regex` cargo
//! feature, which is on by default; without it, compiling any of those
//! names fails with a parse error.
//!
//! ## Concurrency
//!
//! [`Expression`] is immutable, cheap to clone, and `Send + Sync`: one
//! compiled template may be evaluated from many threads over different
//! record sets. Evaluation itself is synchronous and holds no shared
//! mutable state.

pub mod builtins;
pub mod core;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod maybe;
pub mod parser;
pub mod record;
pub mod value;

use crate::core::ast::ExprNode;
use crate::eval::Evaluator;
use crate::lexer::Lexer;
use std::sync::Arc;
use tracing::trace;

pub use error::{EvaluationError, ExpressionError, ParseError};
pub use maybe::MaybeExpression;
pub use record::Record;
pub use value::{Decimal, Value};

/// Compile a template into an immutable, shareable [`Expression`].
pub fn compile(template: &str) -> Result<Expression, ParseError> {
    trace!(template, "compiling expression template");
    let tokens = Lexer::new(template).tokenize()?;
    let root = parser::parse(tokens)?;
    Ok(Expression {
        root: Arc::new(root),
    })
}

/// A compiled template.
///
/// Immutable and cheap to clone; clones share the underlying AST. Safe to
/// evaluate from multiple threads concurrently.
#[derive(Debug, Clone)]
pub struct Expression {
    root: Arc<ExprNode>,
}

impl Expression {
    /// Evaluate against an ordered record set. Attribute references take
    /// the first record that defines the name; records are only borrowed
    /// for the duration of the call.
    ///
    /// An error leaves the expression untouched and reusable.
    pub fn evaluate(&self, records: &[&dyn Record]) -> Result<Value, EvaluationError> {
        trace!(record_count = records.len(), "evaluating expression");
        Evaluator::new(records).eval(&self.root)
    }

    /// Access the compiled AST for inspection.
    pub fn ast(&self) -> &ExprNode {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn compile_once_evaluate_many() {
        let expr = compile("text_before${attr_a}text_after").unwrap();

        let a = record(&[("attr_a", "__flow_a_attr_value_a__")]);
        assert_eq!(
            expr.evaluate(&[&a]).unwrap().as_string(),
            "text_before__flow_a_attr_value_a__text_after"
        );

        let b = record(&[("attr_a", "__flow_b_attr_value_a__")]);
        assert_eq!(
            expr.evaluate(&[&b]).unwrap().as_string(),
            "text_before__flow_b_attr_value_a__text_after"
        );
    }

    #[test]
    fn expression_is_shareable_across_threads() {
        let expr = compile("${attr:toUpper()}").unwrap();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let expr = expr.clone();
                std::thread::spawn(move || {
                    let rec = record(&[("attr", &format!("value-{i}"))]);
                    expr.evaluate(&[&rec]).unwrap().as_string()
                })
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), format!("VALUE-{i}"));
        }
    }

    #[test]
    fn evaluation_error_leaves_expression_usable() {
        let expr = compile("${attr:plus(1)}").unwrap();
        assert!(expr.evaluate(&[]).is_err());
        let rec = record(&[("attr", "41")]);
        assert_eq!(expr.evaluate(&[&rec]).unwrap().as_signed_long().unwrap(), 42);
    }
}
