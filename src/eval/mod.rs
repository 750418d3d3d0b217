//! AST evaluation against a record set.
//!
//! Evaluation is synchronous, CPU-bound, and re-entrant: an evaluator
//! borrows its record set, holds no other state, and many may run over
//! the same AST in parallel.

use crate::core::ast::ExprNode;
use crate::error::EvaluationError;
use crate::record::{lookup_attribute, Record};
use crate::value::Value;

/// Evaluator over a borrowed record set.
pub struct Evaluator<'a> {
    records: &'a [&'a dyn Record],
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator borrowing an ordered record set.
    pub fn new(records: &'a [&'a dyn Record]) -> Self {
        Self { records }
    }

    /// Evaluate a node, producing a typed value.
    pub fn eval(&self, node: &ExprNode) -> Result<Value, EvaluationError> {
        match node {
            ExprNode::Text(text) => Ok(Value::String(text.clone())),

            ExprNode::Literal(value) => Ok(value.clone()),

            ExprNode::AttrRef(name) => Ok(lookup_attribute(self.records, name)),

            ExprNode::Call { function, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval(arg)?);
                }
                function.call(&values)
            }

            ExprNode::Concat(children) => {
                let mut out = String::new();
                for child in children {
                    out.push_str(&self.eval(child)?.as_string());
                }
                Ok(Value::String(out))
            }
        }
    }
}
