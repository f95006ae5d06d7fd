//! Error types used by the gulog client and its transport boundary.
//!
//! This module defines two main error enums:
//!
//! - [`ConfigError`] — configuration misuse, the only error class that is
//!   surfaced to callers.
//! - [`TransportError`] — failures of remote collector calls; absorbed at
//!   the lifecycle/transport boundary and reported, never propagated.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for
//! logging/diagnostics.

use thiserror::Error;

/// # Configuration misuse.
///
/// Returned from client construction when the supplied
/// [`Config`](crate::Config) cannot be used. This is the only failure a
/// caller of the SDK has to handle: everything downstream of a constructed
/// client is fire-and-forget.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No credential token was supplied.
    #[error("missing collector token")]
    MissingToken,

    /// No software version was supplied.
    #[error("missing software version")]
    MissingVersion,

    /// No transport was configured and the default `http` feature is
    /// disabled.
    #[error("no transport configured")]
    MissingTransport,
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use gulog::ConfigError;
    ///
    /// assert_eq!(ConfigError::MissingToken.as_label(), "config_missing_token");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::MissingToken => "config_missing_token",
            ConfigError::MissingVersion => "config_missing_version",
            ConfigError::MissingTransport => "config_missing_transport",
        }
    }
}

/// # Failures of remote collector calls.
///
/// Produced by [`Transport`](crate::Transport) implementations. The
/// lifecycle engine catches every variant at the boundary: a failed
/// registration resolves the record's outcome to `Failed`, a failed
/// log/close submission is reported as a console warning. None of them
/// reach the caller of `log`/`end`.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request never reached the collector (connection, DNS, TLS, ...).
    #[error("could not reach collector: {message}")]
    Connect {
        /// The underlying error message.
        message: String,
    },

    /// The collector answered with a non-success status.
    #[error("collector rejected request: status {status}")]
    Status {
        /// HTTP status code of the response.
        status: u16,
    },

    /// The collector's response body could not be decoded.
    #[error("could not decode collector response: {message}")]
    Decode {
        /// The underlying error message.
        message: String,
    },
}

impl TransportError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use gulog::TransportError;
    ///
    /// let err = TransportError::Status { status: 503 };
    /// assert_eq!(err.as_label(), "transport_status");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TransportError::Connect { .. } => "transport_connect",
            TransportError::Status { .. } => "transport_status",
            TransportError::Decode { .. } => "transport_decode",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TransportError::Connect { message } => format!("connect: {message}"),
            TransportError::Status { status } => format!("status: {status}"),
            TransportError::Decode { message } => format!("decode: {message}"),
        }
    }
}
