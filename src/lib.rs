//! # gulog
//!
//! **gulog** is a client SDK that tracks a hierarchy of logical processes
//! (units of work, possibly nested) and streams their log events and
//! lifecycle transitions to a remote collector.
//!
//! It is not a plain logger: every nested or concurrently fanned-out unit
//! of work gets correct, automatic lineage — without threading handles
//! through call sites — and ordering toward the collector is guaranteed
//! even while remote registration is still in flight.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌────────────────┐      ┌───────────────────────────────────────┐
//!     │  Gulog client  │──┬──►│ Process "job"          (root record)  │
//!     │  Config        │  │   │  registration: Pending ─► id 17       │
//!     │  Transport     │  │   └──────┬────────────────────────────────┘
//!     │  ConsoleSink   │  │          │ fork / spawn
//!     └────────────────┘  │   ┌──────▼────────────────────────────────┐
//!                         └──►│ Process "job-chunk"    (child record) │
//!                             │  registers only after the parent did  │
//!                             └──────┬────────────────────────────────┘
//!                                    │ log / end
//!              ┌─────────────────────┼──────────────────────┐
//!              ▼                     ▼                      ▼
//!        ConsoleSink          detached task            detached task
//!     (one mirror line,    await registration       await registration
//!      synchronous)        ──► submit_log           ──► close_process
//! ```
//!
//! ### Record lifecycle
//! ```text
//! create ──► detached registration task
//!   │           ├─ parent present? await its outcome first
//!   │           ├─ Ok(id)  ─► Registered(id)      (resolves exactly once)
//!   │           └─ Err     ─► Failed              (warned once, no retry)
//!   │
//!   ├─ log(..)  ─► mirror `[kind:?] info ...` now, submit remotely after
//!   │             the outcome resolves (skipped if registration failed)
//!   ├─ fork(..) ─► child record, parent link, inherited settings
//!   └─ end(..)  ─► mirror `[kind:17] end ok`, close remotely after the
//!                  outcome resolves
//! ```
//!
//! Delivery is best-effort by design: a failed registration, log or close
//! is mirrored as a warning and absorbed — telemetry never crashes the
//! observed program. The only caller-visible error is constructing a
//! client from an unusable [`Config`].
//!
//! ## Features
//! | Area                | Description                                                      | Key types / traits                    |
//! |---------------------|------------------------------------------------------------------|---------------------------------------|
//! | **Client**          | Validated config wired to a transport and console sink.          | [`Gulog`], [`Config`], [`Overrides`]  |
//! | **Records**         | Identity, lineage, log/fork/end, trace labels.                   | [`Process`], [`ExitCode`]             |
//! | **Ambient scope**   | Task-local "current process" for nested/concurrent work.         | [`scope::current`], [`scope::enter`]  |
//! | **Transport**       | The three collector calls behind an async trait.                 | [`Transport`], [`HttpTransport`]      |
//! | **Console mirror**  | One human-readable line per event, synchronously.                | [`ConsoleSink`], [`StdoutConsole`]    |
//!
//! ## Optional features
//! - `http` *(default)*: the reqwest-backed [`HttpTransport`]. Disable it
//!   and supply your own [`Transport`] to integrate an existing client.
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
//!         // concurrent children each see "calculate-math" as their parent
//!         let (a, b) = tokio::join!(
//!             client.spawn("sum-left", |p| async move {
//!                 p.info("adding left half");
//!                 Ok::<_, std::io::Error>((ExitCode::ok(), 21))
//!             }),
//!             client.spawn("sum-right", |p| async move {
//!                 p.info("adding right half");
//!                 Ok::<_, std::io::Error>((ExitCode::ok(), 21))
//!             }),
//!         );
//!         Ok::<_, std::io::Error>(a? + b?)
//!     })
//!     .await?;
//!
//!     job.info(format!("sum: {sum}"));
//!     job.end("ok");
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod console;
mod error;
mod events;
mod process;
mod transport;

pub mod scope;

// ---- Public re-exports ----

pub use client::{Gulog, GulogBuilder};
pub use config::{Config, Overrides, DEFAULT_ENDPOINT};
pub use console::{ConsoleSink, StdoutConsole};
pub use error::{ConfigError, TransportError};
pub use events::{Payload, Severity};
pub use process::{ExitCode, Process, RegistrationState};
pub use transport::{
    CloseRequest, LogRequest, ProcessId, RegisterRequest, RegisterResponse, Transport,
};

// Optional: the default reqwest-backed transport.
// Enable with: `--features http` (on by default).
#[cfg(feature = "http")]
pub use transport::HttpTransport;
