//! The record contract consumed by expression evaluation.
//!
//! Evaluation never owns records; they are borrowed for the duration of a
//! single [`Expression::evaluate`](crate::Expression::evaluate) call and
//! the produced [`Value`] carries no reference back to them.

use crate::value::Value;
use std::collections::{BTreeMap, HashMap};

/// Read-only access to a record's string attributes.
pub trait Record {
    /// Look up an attribute by name.
    fn attribute(&self, name: &str) -> Option<&str>;
}

impl Record for HashMap<String, String> {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl Record for BTreeMap<String, String> {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// Resolve an attribute against an ordered record set: the first record
/// that defines the name wins; when none does, the null-marker.
pub(crate) fn lookup_attribute(records: &[&dyn Record], name: &str) -> Value {
    records
        .iter()
        .find_map(|record| record.attribute(name))
        .map(|value| Value::String(value.to_string()))
        .unwrap_or(Value::Null)
}
