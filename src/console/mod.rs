//! # Console mirroring of log and lifecycle events.
//!
//! Every log call and every `end` produces one human-readable line of the
//! form:
//!
//! ```text
//! [job:17] info fetching page 3
//! [job:17 > page-fetch:?] warn retrying
//! [job:17] end ok
//! ```
//!
//! where the bracketed prefix is the record's ancestor chain rendered as
//! `kind:identity` segments (see [`Process::trace_label`](crate::Process::trace_label)),
//! with `?` for identities that have not resolved yet.
//!
//! Mirroring is synchronous relative to the logging call — the line is
//! written before any remote submission is attempted — and is suppressed
//! entirely by [`Config::mute_console`](crate::Config::mute_console).
//!
//! ## Rules
//! - A sink must not block: it is called from the caller's context.
//! - Mute suppresses mirroring only, never remote delivery.
//! - Transport failures are mirrored as `warn` lines through the same sink.

use crate::events::Severity;

/// Destination for console mirror lines.
///
/// Implement this to redirect mirroring (capture in tests, forward to a
/// logging framework). The default is [`StdoutConsole`].
pub trait ConsoleSink: Send + Sync + 'static {
    /// Writes one already-formatted mirror line.
    ///
    /// `severity` is provided for stream selection; lifecycle lines (`end`)
    /// are written as [`Severity::Info`].
    fn write_line(&self, severity: Severity, line: &str);
}

/// Default sink: stdout for info/success, stderr for warn/error/critical.
#[derive(Default)]
pub struct StdoutConsole;

impl StdoutConsole {
    /// Constructs a new [`StdoutConsole`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ConsoleSink for StdoutConsole {
    fn write_line(&self, severity: Severity, line: &str) {
        if severity.is_error_stream() {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
}

/// Formats one mirror line: `[<trace label>] <name> <payload...>`.
///
/// `name` is a severity for log events or the event name (`end`) for
/// lifecycle transitions. An empty body renders without a trailing space.
pub(crate) fn format_line(label: &str, name: &str, body: &str) -> String {
    if body.is_empty() {
        format!("[{label}] {name}")
    } else {
        format!("[{label}] {name} {body}")
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_format_matches_mirror_contract() {
        assert_eq!(format_line("job:?", "info", "x"), "[job:?] info x");
        assert_eq!(format_line("job:17", "end", "ok"), "[job:17] end ok");
        assert_eq!(format_line("job:17", "end", ""), "[job:17] end");
    }
}
