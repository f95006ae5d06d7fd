//! # Single-resolution registration outcome.
//!
//! Every record owns one [`Registration`], a shared view of the pending →
//! resolved transition of its remote registration. Resolution happens
//! exactly once: the [`Resolver`] half is consumed by `resolve`, so a
//! second transition cannot be expressed. Any number of waiters (log
//! submissions, the close request, child registrations) independently await
//! the same outcome.
//!
//! ## Rules
//! - `Pending` is observable only through [`Registration::peek`]; awaiting
//!   via [`Registration::resolved`] always yields a terminal state.
//! - A resolver dropped without resolving (registration task aborted by a
//!   runtime shutdown) reads as `Failed` to waiters.

use tokio::sync::watch;

use crate::transport::ProcessId;

/// Outcome of a record's remote registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationState {
    /// The registration request has not resolved yet.
    Pending,
    /// The collector accepted the process and assigned an identity.
    Registered(ProcessId),
    /// The registration attempt failed; the record stays identity-less.
    Failed,
}

impl RegistrationState {
    /// Returns true while the outcome has not resolved.
    pub fn is_pending(&self) -> bool {
        matches!(self, RegistrationState::Pending)
    }

    /// Returns the identity, if registration succeeded.
    pub fn id(&self) -> Option<ProcessId> {
        match self {
            RegistrationState::Registered(id) => Some(*id),
            _ => None,
        }
    }
}

/// Shared, awaitable view of one registration outcome.
#[derive(Clone, Debug)]
pub(crate) struct Registration {
    rx: watch::Receiver<RegistrationState>,
}

/// Write half; consumed on resolution.
#[derive(Debug)]
pub(crate) struct Resolver {
    tx: watch::Sender<RegistrationState>,
}

impl Registration {
    /// Creates a pending outcome and its resolver.
    pub(crate) fn channel() -> (Resolver, Registration) {
        let (tx, rx) = watch::channel(RegistrationState::Pending);
        (Resolver { tx }, Registration { rx })
    }

    /// Returns the current state without waiting.
    pub(crate) fn peek(&self) -> RegistrationState {
        *self.rx.borrow()
    }

    /// Waits until the outcome is terminal and returns it.
    pub(crate) async fn resolved(&self) -> RegistrationState {
        let mut rx = self.rx.clone();
        let outcome = match rx.wait_for(|state| !state.is_pending()).await {
            Ok(state) => *state,
            Err(_) => RegistrationState::Failed,
        };
        outcome
    }
}

impl Resolver {
    /// Resolves the outcome. Consumes the resolver: exactly one terminal
    /// transition per record.
    pub(crate) fn resolve(self, state: RegistrationState) {
        let _ = self.tx.send(state);
    }
}
