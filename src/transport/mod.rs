//! # Transport boundary to the remote collector.
//!
//! The lifecycle engine talks to the collector exclusively through the
//! [`Transport`] trait: three operations, request structs that carry every
//! field the wire needs, and a [`Result`] outcome. Implementations must
//! never panic across this boundary — failures are values.
//!
//! ## Architecture
//! ```text
//! Process::create ── RegisterRequest ──► Transport::register_process ─► ProcessId
//! Process::log    ── LogRequest      ──► Transport::submit_log
//! Process::end    ── CloseRequest    ──► Transport::close_process
//! ```
//!
//! The collector endpoint is passed per call: per-record overrides may
//! point individual records at different collectors, while transport
//! instances stay shareable.
//!
//! The default implementation is [`HttpTransport`](crate::HttpTransport)
//! (cargo feature `http`, enabled by default). Bring your own
//! implementation to test or to tunnel through an existing client.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TransportError;
use crate::events::Severity;

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpTransport;

/// Collector-assigned identity of a registered process.
///
/// Opaque to the SDK; only rendered (trace labels) and echoed back on
/// log/close requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub i64);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Registration request: announces a started process to the collector.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Free-form process type tag, e.g. `user-create`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Opaque caller-supplied attribute bag, forwarded verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initiator_data: Option<Value>,
    /// Best-effort environment descriptor (hostname, OS, arch).
    pub user_agent: String,
    /// Identity of the parent process, when it registered successfully.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_process_id: Option<ProcessId>,
    /// Software version from the record's effective config.
    pub software_version: String,
    /// Credential token from the record's effective config.
    pub token: String,
    /// Creation timestamp of the record.
    pub started_at: DateTime<Utc>,
}

/// Response body of a successful registration.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    /// The collector-assigned identity.
    pub process_id: ProcessId,
}

/// Log submission request.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRequest {
    /// Payload in wire form (single value unwrapped, otherwise an array).
    pub data: Value,
    /// Severity of the event.
    pub severity: Severity,
    /// Identity of the owning process.
    pub process_id: ProcessId,
    /// Credential token from the record's effective config.
    pub token: String,
    /// Timestamp of the log call.
    pub at: DateTime<Utc>,
}

/// Termination request.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseRequest {
    /// Identity of the process being closed.
    pub process_id: ProcessId,
    /// Caller-supplied exit code in wire form.
    pub exit_code: Value,
    /// Credential token from the record's effective config.
    pub token: String,
    /// Timestamp of the `end` call.
    pub ended_at: DateTime<Utc>,
}

/// # Remote collector operations.
///
/// Implementations perform the three collector calls and report failures as
/// [`TransportError`] values. The lifecycle engine absorbs every failure:
/// nothing an implementation returns reaches SDK callers.
///
/// Calls are not cancellable; once issued they run to completion. The
/// engine never retries.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Registers a started process, returning its collector identity.
    async fn register_process(
        &self,
        endpoint: &str,
        req: RegisterRequest,
    ) -> Result<ProcessId, TransportError>;

    /// Submits one log event for a registered process.
    async fn submit_log(&self, endpoint: &str, req: LogRequest) -> Result<(), TransportError>;

    /// Reports a process termination.
    async fn close_process(&self, endpoint: &str, req: CloseRequest) -> Result<(), TransportError>;
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn register_request_wire_shape() {
        let req = RegisterRequest {
            kind: "user-create".into(),
            initiator_data: Some(json!({"user": 9})),
            user_agent: "host linux x86_64".into(),
            parent_process_id: Some(ProcessId(4)),
            software_version: "1.0.0".into(),
            token: "t".into(),
            started_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["type"], "user-create");
        assert_eq!(v["initiatorData"], json!({"user": 9}));
        assert_eq!(v["parentProcessId"], 4);
        assert_eq!(v["softwareVersion"], "1.0.0");
        assert_eq!(v["userAgent"], "host linux x86_64");
    }

    #[test]
    fn absent_optionals_are_omitted() {
        let req = RegisterRequest {
            kind: "job".into(),
            initiator_data: None,
            user_agent: String::new(),
            parent_process_id: None,
            software_version: "1.0.0".into(),
            token: "t".into(),
            started_at: Utc::now(),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert!(v.get("initiatorData").is_none());
        assert!(v.get("parentProcessId").is_none());
    }

    #[test]
    fn log_request_uses_lowercase_severity() {
        let req = LogRequest {
            data: json!("x"),
            severity: Severity::Critical,
            process_id: ProcessId(7),
            token: "t".into(),
            at: Utc::now(),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["severity"], "critical");
        assert_eq!(v["processId"], 7);
    }
}
