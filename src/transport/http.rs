//! # Default HTTP transport (reqwest).
//!
//! Maps the three collector operations onto the collector's JSON API:
//!
//! ```text
//! register_process ─► POST   {endpoint}/api/process
//! submit_log       ─► POST   {endpoint}/api/log
//! close_process    ─► DELETE {endpoint}/api/process
//! ```
//!
//! No retries, no timeouts beyond reqwest defaults: delivery is best-effort
//! and the lifecycle engine absorbs every error this module returns.

use async_trait::async_trait;
use reqwest::Client;

use super::{CloseRequest, LogRequest, ProcessId, RegisterRequest, RegisterResponse, Transport};
use crate::error::TransportError;

/// Reqwest-backed [`Transport`].
///
/// Cheap to clone; one instance is shared by every record of a client. The
/// collector endpoint comes in per call so per-record overrides can point
/// records at different collectors through the same connection pool.
#[derive(Clone, Default)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    /// Constructs a transport with a fresh connection pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }

    /// Constructs a transport on top of an existing reqwest client.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    fn check_status(status: reqwest::StatusCode) -> Result<(), TransportError> {
        if status.is_success() {
            Ok(())
        } else {
            Err(TransportError::Status {
                status: status.as_u16(),
            })
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => TransportError::Status {
                status: status.as_u16(),
            },
            None => TransportError::Connect {
                message: err.to_string(),
            },
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn register_process(
        &self,
        endpoint: &str,
        req: RegisterRequest,
    ) -> Result<ProcessId, TransportError> {
        let res = self
            .http
            .post(format!("{endpoint}/api/process"))
            .json(&req)
            .send()
            .await?;
        Self::check_status(res.status())?;
        let body: RegisterResponse = res.json().await.map_err(|e| TransportError::Decode {
            message: e.to_string(),
        })?;
        Ok(body.process_id)
    }

    async fn submit_log(&self, endpoint: &str, req: LogRequest) -> Result<(), TransportError> {
        let res = self
            .http
            .post(format!("{endpoint}/api/log"))
            .json(&req)
            .send()
            .await?;
        Self::check_status(res.status())
    }

    async fn close_process(&self, endpoint: &str, req: CloseRequest) -> Result<(), TransportError> {
        let res = self
            .http
            .delete(format!("{endpoint}/api/process"))
            .json(&req)
            .send()
            .await?;
        Self::check_status(res.status())
    }
}
