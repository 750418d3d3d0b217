//! Environmental functions: host identity, clock, RNG-backed identifiers.
//!
//! These are the only nondeterministic builtins. They read process-wide
//! resources (the system clock, the RNG, the hostname syscall) and never
//! touch files or sockets.

use crate::error::EvaluationError;
use crate::value::Value;
use chrono::Utc;
use sysinfo::System;
use uuid::Uuid;

/// The operating-system host name.
pub(crate) fn hostname(_args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::String(
        System::host_name().unwrap_or_else(|| "Unknown".to_string()),
    ))
}

/// Current wall-clock time as milliseconds since the Unix epoch.
pub(crate) fn now(_args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::SignedInt(Utc::now().timestamp_millis()))
}

/// The argument, verbatim; numeric literals keep their numeric type.
pub(crate) fn literal(args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(args[0].clone())
}

/// A fresh v4 UUID string.
pub(crate) fn uuid(_args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(Value::String(Uuid::new_v4().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_preserves_type() {
        assert_eq!(
            literal(&[Value::SignedInt(10)]).unwrap(),
            Value::SignedInt(10)
        );
        assert_eq!(
            literal(&[Value::String("x".into())]).unwrap(),
            Value::String("x".into())
        );
    }

    #[test]
    fn uuid_shape() {
        let v = uuid(&[]).unwrap().as_string();
        assert_eq!(v.len(), 36);
        assert_eq!(v.matches('-').count(), 4);
    }

    #[test]
    fn now_is_after_2020() {
        let Value::SignedInt(ms) = now(&[]).unwrap() else {
            panic!("expected a signed integer");
        };
        assert!(ms > 1_577_836_800_000);
    }

    #[test]
    fn hostname_is_not_empty() {
        assert!(!hostname(&[]).unwrap().as_string().is_empty());
    }
}
