//! # Process record: one supervised unit of work.
//!
//! A [`Process`] is a cheap-to-clone handle (`Arc` inner) to one logical
//! unit of work. Creating a record immediately issues an asynchronous
//! registration request; the record is usable for logging right away —
//! every remote submission independently awaits the shared registration
//! outcome, so nothing reaches the collector with an unresolved identity.
//!
//! ## Lifecycle
//! ```text
//! create ──► spawn registration task
//!              │  (await parent outcome first, if any)
//!              ├─ Ok(id)  ─► Registered(id)
//!              └─ Err     ─► Failed (warned once, never retried)
//!
//! log  ──► mirror line (sync) ──► detached task: await outcome ─► submit_log
//! end  ──► mirror line (sync) ──► detached task: await outcome ─► close_process
//! ```
//!
//! ## Rules
//! - `kind`, `parent`, `settings` and the initiator are fixed at creation;
//!   only the registration outcome transitions, exactly once.
//! - A parent's `end` never cancels a child's pending registration.
//! - Transport failures are absorbed here: mirrored as `warn` lines and
//!   detailed via the `log` facade, never surfaced to the caller.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::client::Shared;
use crate::config::Config;
use crate::console;
use crate::events::{Payload, Severity};
use crate::process::exit::ExitCode;
use crate::process::registration::{Registration, RegistrationState, Resolver};
use crate::transport::{CloseRequest, LogRequest, ProcessId, RegisterRequest};

/// Handle to one unit of work tracked for observability.
///
/// Clones share the same record. Records form a tree through read-only
/// `parent` references; roots have no parent.
#[derive(Clone)]
pub struct Process {
    inner: Arc<Inner>,
}

struct Inner {
    kind: Arc<str>,
    parent: Option<Process>,
    settings: Config,
    shared: Arc<Shared>,
    registration: Registration,
    ended: AtomicBool,
}

impl Process {
    /// Creates a record and spawns its registration task.
    ///
    /// `settings` is the already-merged effective config for this record.
    /// Must be called within a tokio runtime.
    pub(crate) fn create(
        shared: Arc<Shared>,
        kind: &str,
        settings: Config,
        initiator: Option<Value>,
        parent: Option<Process>,
    ) -> Process {
        let (resolver, registration) = Registration::channel();
        let process = Process {
            inner: Arc::new(Inner {
                kind: Arc::from(kind),
                parent,
                settings,
                shared,
                registration,
                ended: AtomicBool::new(false),
            }),
        };
        process.spawn_registration(resolver, initiator);
        process
    }

    /// Detached registration: await the parent's outcome, then register.
    fn spawn_registration(&self, resolver: Resolver, initiator: Option<Value>) {
        let this = self.clone();
        let started_at = Utc::now();
        let user_agent = environment_descriptor();
        tokio::spawn(async move {
            let inner = &this.inner;
            // parent-before-child: the collector must see the parent's
            // identity before a child references it
            let parent_id = match &inner.parent {
                Some(parent) => parent.outcome().await.id(),
                None => None,
            };
            let req = RegisterRequest {
                kind: inner.kind.to_string(),
                initiator_data: initiator,
                user_agent,
                parent_process_id: parent_id,
                software_version: inner.settings.version.clone(),
                token: inner.settings.token.clone(),
                started_at,
            };
            match inner
                .shared
                .transport
                .register_process(&inner.settings.endpoint, req)
                .await
            {
                Ok(id) => resolver.resolve(RegistrationState::Registered(id)),
                Err(err) => {
                    log::warn!(
                        "gulog: could not register process {}: {}",
                        inner.kind,
                        err.as_message()
                    );
                    this.mirror(
                        Severity::Warn,
                        "warn",
                        &format!("could not register process: {err}"),
                    );
                    resolver.resolve(RegistrationState::Failed);
                }
            }
        });
    }

    /// Returns the record's type tag.
    pub fn kind(&self) -> &str {
        &self.inner.kind
    }

    /// Returns the parent record, if any.
    pub fn parent(&self) -> Option<&Process> {
        self.inner.parent.as_ref()
    }

    /// Returns the effective configuration captured at creation.
    pub fn settings(&self) -> &Config {
        &self.inner.settings
    }

    /// Returns the collector identity if registration has succeeded.
    pub fn id(&self) -> Option<ProcessId> {
        self.inner.registration.peek().id()
    }

    /// Returns true if both handles refer to the same record.
    pub fn same_record(&self, other: &Process) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Waits for the registration outcome.
    ///
    /// Callers that need to sequence externally (e.g. guarantee a log is
    /// attributable before continuing) can await this; nothing in the SDK
    /// requires it.
    pub async fn outcome(&self) -> RegistrationState {
        self.inner.registration.resolved().await
    }

    /// Creates a child record with `self` as parent, inheriting settings.
    pub fn fork(&self, kind: &str) -> Process {
        self.fork_with(kind, None, &crate::config::Overrides::default())
    }

    /// Creates a child record with an initiator bag and setting overrides.
    ///
    /// Overrides are merged over this record's effective settings; the
    /// parent is not mutated.
    pub fn fork_with(
        &self,
        kind: &str,
        initiator: Option<Value>,
        overrides: &crate::config::Overrides,
    ) -> Process {
        let settings = self.inner.settings.merged(overrides);
        Process::create(
            Arc::clone(&self.inner.shared),
            kind,
            settings,
            initiator,
            Some(self.clone()),
        )
    }

    /// Logs with [`Severity::Info`]. Alias of [`Process::info`].
    pub fn log(&self, payload: impl Into<Payload>) {
        self.log_with(Severity::Info, payload);
    }

    /// Logs with [`Severity::Info`].
    pub fn info(&self, payload: impl Into<Payload>) {
        self.log_with(Severity::Info, payload);
    }

    /// Logs with [`Severity::Warn`].
    pub fn warn(&self, payload: impl Into<Payload>) {
        self.log_with(Severity::Warn, payload);
    }

    /// Logs with [`Severity::Error`].
    pub fn error(&self, payload: impl Into<Payload>) {
        self.log_with(Severity::Error, payload);
    }

    /// Logs with an explicit severity (`Success` and `Critical` have no
    /// shorthand).
    ///
    /// The console mirror line is written synchronously before this call
    /// returns; remote submission happens in a detached task once the
    /// registration outcome resolves, and is skipped if registration
    /// failed. Concurrent log calls are independent: no mutual ordering is
    /// guaranteed at the collector.
    pub fn log_with(&self, severity: Severity, payload: impl Into<Payload>) {
        let payload = payload.into();
        if self.inner.ended.load(Ordering::Relaxed) {
            // caller misuse, flagged in the mirror only; still delivered
            self.mirror(Severity::Warn, "warn", "log event after end");
        }
        self.mirror(severity, severity.as_str(), &payload.render());

        let this = self.clone();
        let at = Utc::now();
        tokio::spawn(async move {
            let inner = &this.inner;
            let id = match inner.registration.resolved().await {
                RegistrationState::Registered(id) => id,
                // registration failure was warned once; skip submission
                _ => return,
            };
            let req = LogRequest {
                data: payload.to_wire(),
                severity,
                process_id: id,
                token: inner.settings.token.clone(),
                at,
            };
            if let Err(err) = inner
                .shared
                .transport
                .submit_log(&inner.settings.endpoint, req)
                .await
            {
                log::warn!(
                    "gulog: could not submit log for {}: {}",
                    this.trace_label(),
                    err.as_message()
                );
                this.mirror(Severity::Warn, "warn", &format!("could not submit log: {err}"));
            }
        });
    }

    /// Ends the record with a caller-supplied exit code.
    ///
    /// Mirrors `[label] end <exit>` synchronously, then issues the close
    /// request in a detached task once the registration outcome resolves
    /// (skipped if registration failed). Calling `end` again re-issues the
    /// close; deduplication is left to the collector. The record stays
    /// usable for logging afterwards, though late logs are flagged.
    pub fn end(&self, exit: impl Into<ExitCode>) {
        let exit = exit.into();
        self.inner.ended.store(true, Ordering::Relaxed);
        self.mirror(Severity::Info, "end", &exit.to_string());

        let this = self.clone();
        let ended_at = Utc::now();
        tokio::spawn(async move {
            let inner = &this.inner;
            let id = match inner.registration.resolved().await {
                RegistrationState::Registered(id) => id,
                _ => return,
            };
            let req = CloseRequest {
                process_id: id,
                exit_code: exit.as_wire(),
                token: inner.settings.token.clone(),
                ended_at,
            };
            if let Err(err) = inner
                .shared
                .transport
                .close_process(&inner.settings.endpoint, req)
                .await
            {
                log::warn!(
                    "gulog: could not close process {}: {}",
                    this.trace_label(),
                    err.as_message()
                );
                this.mirror(
                    Severity::Warn,
                    "warn",
                    &format!("could not close process: {err}"),
                );
            }
        });
    }

    /// Renders the ancestor chain as `kind:identity` segments.
    ///
    /// Pure function of the record tree at call time; unresolved
    /// identities render as `?`:
    /// `user-create:17 > avatar-upload:?`.
    pub fn trace_label(&self) -> String {
        match &self.inner.parent {
            Some(parent) => format!("{} > {}", parent.trace_label(), self.segment()),
            None => self.segment(),
        }
    }

    fn segment(&self) -> String {
        match self.id() {
            Some(id) => format!("{}:{}", self.inner.kind, id),
            None => format!("{}:?", self.inner.kind),
        }
    }

    /// Writes one mirror line unless the record's settings mute it.
    fn mirror(&self, severity: Severity, name: &str, body: &str) {
        if self.inner.settings.mute_console {
            return;
        }
        let line = console::format_line(&self.trace_label(), name, body);
        self.inner.shared.console.write_line(severity, &line);
    }
}

impl fmt::Debug for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("kind", &self.inner.kind)
            .field("id", &self.id())
            .finish_non_exhaustive()
    }
}

/// Best-effort environment descriptor: `hostname (os arch)`.
///
/// Falls back to `os arch` when the hostname is unavailable.
fn environment_descriptor() -> String {
    let host = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_default();
    if host.is_empty() {
        format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
    } else {
        format!(
            "{} ({} {})",
            host,
            std::env::consts::OS,
            std::env::consts::ARCH
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use serde_json::json;

    use crate::client::Gulog;
    use crate::config::{Config, Overrides};
    use crate::console::testing::MemoryConsole;
    use crate::events::Severity;
    use crate::process::RegistrationState;
    use crate::transport::testing::{FakeTransport, WireCall};
    use crate::transport::ProcessId;

    fn client(transport: Arc<FakeTransport>, console: Arc<MemoryConsole>) -> Gulog {
        Gulog::builder(Config::new("t", "1.0.0"))
            .with_transport(transport)
            .with_console(console)
            .build()
            .expect("valid config")
    }

    /// Lets already-runnable detached tasks make progress.
    async fn settle() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn mirror_is_synchronous_remote_is_deferred() {
        let (transport, gate) = FakeTransport::held();
        let console = Arc::new(MemoryConsole::new());
        let client = client(transport.clone(), console.clone());

        let job = client.process("job");
        job.log("x");

        // mirrored before any remote traffic, with the identity unresolved
        assert_eq!(console.lines(), vec!["[job:?] info x".to_string()]);
        assert!(transport.calls().is_empty());

        gate.add_permits(1);
        transport.wait_for_calls(2).await;
        let calls = transport.calls();
        assert_eq!(
            calls[0],
            WireCall::Register {
                kind: "job".into(),
                parent: None
            }
        );
        assert_eq!(
            calls[1],
            WireCall::Log {
                process: ProcessId(1),
                severity: "info".into(),
                data: json!("x"),
            }
        );
    }

    #[tokio::test]
    async fn child_registers_after_parent_resolves() {
        let (transport, gate) = FakeTransport::held();
        let console = Arc::new(MemoryConsole::new());
        let client = client(transport.clone(), console);

        let root = client.process("a");
        let _child = root.fork("b");

        gate.add_permits(1);
        transport.wait_for_calls(1).await;
        assert_eq!(
            transport.calls(),
            vec![WireCall::Register {
                kind: "a".into(),
                parent: None
            }]
        );

        gate.add_permits(1);
        transport.wait_for_calls(2).await;
        assert_eq!(
            transport.calls()[1],
            WireCall::Register {
                kind: "b".into(),
                parent: Some(ProcessId(1))
            }
        );
    }

    #[tokio::test]
    async fn ending_parent_does_not_cancel_child_registration() {
        let (transport, gate) = FakeTransport::held();
        let console = Arc::new(MemoryConsole::new());
        let client = client(transport.clone(), console);

        let root = client.process("a");
        let _child = root.fork("b");
        root.end("ok");

        gate.add_permits(2);
        transport.wait_for_calls(3).await;
        let calls = transport.calls();
        assert!(calls.contains(&WireCall::Register {
            kind: "b".into(),
            parent: Some(ProcessId(1))
        }));
        assert!(calls.contains(&WireCall::Close {
            process: ProcessId(1),
            exit: json!("ok")
        }));
    }

    #[tokio::test]
    async fn failed_registration_skips_remote_logs_and_warns() {
        let transport = FakeTransport::new();
        transport.fail_register.store(true, Ordering::SeqCst);
        let console = Arc::new(MemoryConsole::new());
        let client = client(transport.clone(), console.clone());

        let job = client.process("job");
        job.log("x");
        transport.wait_for_calls(1).await;
        settle().await;

        // register attempt recorded, log submission skipped
        assert_eq!(transport.calls().len(), 1);
        assert_eq!(job.outcome().await, RegistrationState::Failed);
        let lines = console.lines();
        assert!(lines
            .iter()
            .any(|l| l.contains("could not register process")));
    }

    #[tokio::test]
    async fn repeated_end_reissues_close() {
        let transport = FakeTransport::new();
        let console = Arc::new(MemoryConsole::new());
        let client = client(transport.clone(), console);

        let job = client.process("job");
        job.end("ok");
        job.end("ok");

        transport.wait_for_calls(3).await;
        let closes = transport
            .calls()
            .iter()
            .filter(|c| matches!(c, WireCall::Close { .. }))
            .count();
        assert_eq!(closes, 2);
    }

    #[tokio::test]
    async fn late_log_is_flagged_but_still_delivered() {
        let transport = FakeTransport::new();
        let console = Arc::new(MemoryConsole::new());
        let client = client(transport.clone(), console.clone());

        let job = client.process("job");
        job.end("ok");
        job.log("tail");

        let entries = console.entries();
        assert_eq!(entries[0].1, "[job:?] end ok");
        assert_eq!(entries[1], (Severity::Warn, "[job:?] warn log event after end".into()));
        assert_eq!(entries[2].1, "[job:?] info tail");

        // register + close + log all reach the collector
        transport.wait_for_calls(3).await;
        assert!(transport
            .calls()
            .iter()
            .any(|c| matches!(c, WireCall::Log { .. })));
    }

    #[tokio::test]
    async fn mute_console_suppresses_mirror_only() {
        let transport = FakeTransport::new();
        let console = Arc::new(MemoryConsole::new());
        let client = Gulog::builder(Config::new("t", "1.0.0").with_mute_console(true))
            .with_transport(transport.clone())
            .with_console(console.clone())
            .build()
            .unwrap();

        let job = client.process("job");
        job.log("x");

        assert!(console.lines().is_empty());
        transport.wait_for_calls(2).await;
        assert!(transport
            .calls()
            .iter()
            .any(|c| matches!(c, WireCall::Log { .. })));
    }

    #[tokio::test]
    async fn delivery_failure_is_warned_never_raised() {
        let transport = FakeTransport::new();
        transport.fail_submit.store(true, Ordering::SeqCst);
        let console = Arc::new(MemoryConsole::new());
        let client = client(transport.clone(), console.clone());

        let job = client.process("job");
        job.log("x");

        transport.wait_for_calls(2).await;
        settle().await;
        assert!(console
            .lines()
            .iter()
            .any(|l| l.contains("could not submit log")));
    }

    #[tokio::test]
    async fn trace_label_renders_chain_and_is_idempotent() {
        let transport = FakeTransport::new();
        let console = Arc::new(MemoryConsole::new());
        let client = client(transport.clone(), console);

        let root = client.process("user-create");
        assert_eq!(root.outcome().await, RegistrationState::Registered(ProcessId(1)));

        // the child's registration task has not run yet: identity pending
        let child = root.fork("avatar-upload");
        assert_eq!(child.trace_label(), "user-create:1 > avatar-upload:?");
        assert_eq!(child.trace_label(), child.trace_label());

        child.outcome().await;
        assert_eq!(child.trace_label(), "user-create:1 > avatar-upload:2");
    }

    #[tokio::test]
    async fn fork_inherits_and_overrides_settings() {
        let transport = FakeTransport::new();
        let console = Arc::new(MemoryConsole::new());
        let client = client(transport.clone(), console);

        let root = client.process_with(
            "a",
            None,
            &Overrides {
                endpoint: Some("http://localhost:7070".into()),
                ..Overrides::default()
            },
        );
        let child = root.fork("b");
        assert_eq!(child.settings().endpoint, "http://localhost:7070");
        assert_eq!(child.settings().token, "t");

        let rebased = root.fork_with(
            "c",
            None,
            &Overrides {
                token: Some("other".into()),
                ..Overrides::default()
            },
        );
        assert_eq!(rebased.settings().token, "other");
        assert_eq!(rebased.settings().endpoint, "http://localhost:7070");
    }
}
