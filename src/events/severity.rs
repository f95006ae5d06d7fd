//! # Log severity levels.

use std::fmt;

use serde::Serialize;

/// Severity of a log event.
///
/// `Info`, `Warn` and `Error` map to the matching record methods;
/// `Success` and `Critical` are available through
/// [`Process::log_with`](crate::Process::log_with).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warn,
    Error,
    Critical,
}

impl Severity {
    /// Returns the stable lowercase name used on the wire and in the
    /// console mirror.
    ///
    /// # Example
    /// ```
    /// use gulog::Severity;
    ///
    /// assert_eq!(Severity::Warn.as_str(), "warn");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Critical => "critical",
        }
    }

    /// Returns true for severities mirrored to stderr rather than stdout.
    pub fn is_error_stream(&self) -> bool {
        matches!(self, Severity::Warn | Severity::Error | Severity::Critical)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
