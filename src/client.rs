//! # Client: validated configuration wired to a transport and console sink.
//!
//! [`Gulog`] replaces the implicit global settings of older SDKs with an
//! explicit handle: construction validates the [`Config`] (the
//! "initialize before use" precondition), and every record-scoped
//! operation exists only through a constructed client. A missing token or
//! version fails loudly here; everything after construction is
//! fire-and-forget.
//!
//! ## Example
//! ```rust,no_run
//! use gulog::{Config, ExitCode, Gulog};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Gulog::new(Config::new("t0k3n", env!("CARGO_PKG_VERSION")))?;
//!
//!     let job = client.process("calculate-math");
//!     job.log("starting...");
//!
//!     let sum = gulog::scope::enter(job.clone(), async {
//!         // children created in here discover `job` as their parent
//!         client
//!             .spawn("sum-chunk", |p| async move {
//!                 p.info("adding");
//!                 Ok::<_, std::io::Error>((ExitCode::ok(), 42))
//!             })
//!             .await
//!     })
//!     .await?;
//!
//!     job.info(format!("done: {sum}"));
//!     job.end("ok");
//!     Ok(())
//! }
//! ```

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;

use crate::config::{Config, Overrides};
use crate::console::{ConsoleSink, StdoutConsole};
use crate::error::ConfigError;
use crate::process::{ExitCode, Process};
use crate::scope;
use crate::transport::Transport;

/// Wiring shared by every record of one client.
pub(crate) struct Shared {
    pub(crate) config: Config,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) console: Arc<dyn ConsoleSink>,
}

/// Entry point of the SDK.
///
/// Cheap to clone; all records created through a client share its
/// transport and console sink. See the [module docs](self) for an
/// end-to-end example.
#[derive(Clone)]
pub struct Gulog {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for Gulog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gulog").finish_non_exhaustive()
    }
}

impl Gulog {
    /// Constructs a client with the default HTTP transport and stdout
    /// console.
    ///
    /// Fails with [`ConfigError`] when the config is unusable — the one
    /// caller-visible error of the SDK.
    #[cfg(feature = "http")]
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        Self::builder(config).build()
    }

    /// Starts a builder for a client with a custom transport or console.
    pub fn builder(config: Config) -> GulogBuilder {
        GulogBuilder {
            config,
            transport: None,
            console: None,
        }
    }

    /// Returns the client-wide configuration.
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    /// Creates a root record and immediately begins its registration.
    ///
    /// The record is usable right away; log events queue on the
    /// registration outcome internally.
    pub fn process(&self, kind: &str) -> Process {
        self.process_with(kind, None, &Overrides::default())
    }

    /// Creates a root record with an initiator bag and setting overrides.
    ///
    /// `initiator` is forwarded verbatim to the registration call —
    /// typical contents: the acting user, the API token name.
    pub fn process_with(
        &self,
        kind: &str,
        initiator: Option<Value>,
        overrides: &Overrides,
    ) -> Process {
        let settings = self.shared.config.merged(overrides);
        Process::create(Arc::clone(&self.shared), kind, settings, initiator, None)
    }

    /// Runs `body` as a child process of the ambient scope.
    ///
    /// Resolves the parent from [`scope::current`], creates the child
    /// record, and runs `body(child)` with the child as the ambient
    /// current process. `body` resolves to `Result<(ExitCode, T), E>`:
    ///
    /// - `Ok((code, value))` — the record is ended with `code`, `value`
    ///   is returned;
    /// - `Err(e)` — the record is ended with the generic `error` code and
    ///   `e` is returned to the caller;
    /// - a panic — the record is ended with `error`, then the panic
    ///   resumes.
    pub async fn spawn<T, E, F, Fut>(&self, kind: &str, body: F) -> Result<T, E>
    where
        F: FnOnce(Process) -> Fut,
        Fut: Future<Output = Result<(ExitCode, T), E>>,
    {
        self.spawn_with(kind, None, &Overrides::default(), body).await
    }

    /// [`Gulog::spawn`] with an initiator bag and setting overrides.
    pub async fn spawn_with<T, E, F, Fut>(
        &self,
        kind: &str,
        initiator: Option<Value>,
        overrides: &Overrides,
        body: F,
    ) -> Result<T, E>
    where
        F: FnOnce(Process) -> Fut,
        Fut: Future<Output = Result<(ExitCode, T), E>>,
    {
        let parent = scope::current();
        let settings = self.shared.config.merged(overrides);
        let process = Process::create(
            Arc::clone(&self.shared),
            kind,
            settings,
            initiator,
            parent,
        );

        let fut = scope::enter(process.clone(), body(process.clone()));
        match std::panic::AssertUnwindSafe(fut).catch_unwind().await {
            Ok(Ok((exit, value))) => {
                process.end(exit);
                Ok(value)
            }
            Ok(Err(err)) => {
                process.end(ExitCode::error());
                Err(err)
            }
            Err(panic) => {
                process.end(ExitCode::error());
                std::panic::resume_unwind(panic);
            }
        }
    }
}

/// Builder for a [`Gulog`] client with optional custom wiring.
pub struct GulogBuilder {
    config: Config,
    transport: Option<Arc<dyn Transport>>,
    console: Option<Arc<dyn ConsoleSink>>,
}

impl GulogBuilder {
    /// Sets the transport used for every collector call.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the sink that receives console mirror lines.
    pub fn with_console(mut self, console: Arc<dyn ConsoleSink>) -> Self {
        self.console = Some(console);
        self
    }

    /// Validates the config and builds the client.
    pub fn build(self) -> Result<Gulog, ConfigError> {
        self.config.validate()?;
        let transport = match self.transport {
            Some(transport) => transport,
            None => Self::default_transport()?,
        };
        let console = self
            .console
            .unwrap_or_else(|| Arc::new(StdoutConsole::new()));
        Ok(Gulog {
            shared: Arc::new(Shared {
                config: self.config,
                transport,
                console,
            }),
        })
    }

    #[cfg(feature = "http")]
    fn default_transport() -> Result<Arc<dyn Transport>, ConfigError> {
        Ok(Arc::new(crate::transport::HttpTransport::new()))
    }

    #[cfg(not(feature = "http"))]
    fn default_transport() -> Result<Arc<dyn Transport>, ConfigError> {
        Err(ConfigError::MissingTransport)
    }
}
