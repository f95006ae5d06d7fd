//! # Exit codes for process termination.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Caller-supplied exit cause, string or numeric.
///
/// Examples: `ok`, `user-create-failed`, `2`. The failure path of
/// [`Gulog::spawn`](crate::Gulog::spawn) uses the generic
/// [`ExitCode::error`].
///
/// # Example
/// ```
/// use gulog::ExitCode;
///
/// assert_eq!(ExitCode::from("ok"), ExitCode::ok());
/// assert_eq!(ExitCode::from(2).to_string(), "2");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExitCode {
    /// Symbolic exit cause.
    Named(Arc<str>),
    /// Numeric exit cause.
    Code(i64),
}

impl ExitCode {
    /// The conventional success code, `ok`.
    pub fn ok() -> Self {
        ExitCode::Named("ok".into())
    }

    /// The generic failure code, `error`.
    pub fn error() -> Self {
        ExitCode::Named("error".into())
    }

    /// Wire form: string for named codes, number for numeric ones.
    pub fn as_wire(&self) -> Value {
        match self {
            ExitCode::Named(name) => Value::String(name.to_string()),
            ExitCode::Code(code) => Value::from(*code),
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Named(name) => f.write_str(name),
            ExitCode::Code(code) => code.fmt(f),
        }
    }
}

impl From<&str> for ExitCode {
    fn from(name: &str) -> Self {
        ExitCode::Named(name.into())
    }
}

impl From<String> for ExitCode {
    fn from(name: String) -> Self {
        ExitCode::Named(name.into())
    }
}

impl From<i64> for ExitCode {
    fn from(code: i64) -> Self {
        ExitCode::Code(code)
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        ExitCode::Code(code.into())
    }
}
