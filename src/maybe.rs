//! MaybeExpression type for property values that may contain expressions.
//!
//! Processor properties are plain strings most of the time; only some
//! carry `${ ... }` templates. `MaybeExpression` detects which at
//! construction, compiles lazily on first resolve, and caches the
//! compiled expression for subsequent evaluations.

use crate::error::ExpressionError;
use crate::record::Record;
use crate::{compile, Expression};
use once_cell::sync::OnceCell;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Internal holder for a lazily compiled template.
#[derive(Debug)]
pub struct CachedExpression {
    source: String,
    compiled: OnceCell<Expression>,
}

impl Clone for CachedExpression {
    fn clone(&self) -> Self {
        // Let the clone re-compile on first use rather than sharing.
        Self {
            source: self.source.clone(),
            compiled: OnceCell::new(),
        }
    }
}

impl PartialEq for CachedExpression {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// A property value that is either concrete text or a template to
/// evaluate per record set.
///
/// Serializes transparently as the underlying string; deserializing a
/// string detects templates by the presence of `${` (or the `$$` escape,
/// which also requires a compile pass to collapse).
#[derive(Debug, Clone, PartialEq)]
pub enum MaybeExpression {
    /// Concrete text, returned as-is.
    Value(String),
    /// A template, compiled lazily and cached.
    Expression(CachedExpression),
}

impl MaybeExpression {
    /// Create from a string, detecting whether it needs compilation.
    pub fn from_string(s: impl Into<String>) -> Self {
        let s = s.into();
        if needs_compilation(&s) {
            Self::Expression(CachedExpression {
                source: s,
                compiled: OnceCell::new(),
            })
        } else {
            Self::Value(s)
        }
    }

    /// True iff this value carries a template.
    pub fn is_expression(&self) -> bool {
        matches!(self, Self::Expression(_))
    }

    /// The underlying string, template source or concrete text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Value(s) => s,
            Self::Expression(cached) => &cached.source,
        }
    }

    /// Resolve against a record set: concrete text comes back verbatim,
    /// templates compile (once) and evaluate.
    pub fn resolve(&self, records: &[&dyn Record]) -> Result<String, ExpressionError> {
        match self {
            Self::Value(s) => Ok(s.clone()),
            Self::Expression(cached) => {
                let expression = cached
                    .compiled
                    .get_or_try_init(|| compile(&cached.source))?;
                Ok(expression.evaluate(records)?.as_string())
            }
        }
    }
}

fn needs_compilation(s: &str) -> bool {
    s.contains("${") || s.contains("$$")
}

impl From<&str> for MaybeExpression {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}

impl From<String> for MaybeExpression {
    fn from(s: String) -> Self {
        Self::from_string(s)
    }
}

impl Serialize for MaybeExpression {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MaybeExpression {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_string(s))
    }
}
