//! # Ambient process scope.
//!
//! Lets code that does not hold a [`Process`] handle still discover "the
//! process I am currently part of" — helper functions, deeply nested
//! calls, and concurrent branches get correct lineage without the handle
//! threaded through every signature.
//!
//! The mechanism is a `tokio::task_local!` cell: a property of the logical
//! task, never a shared mutable global. That gives exactly the semantics
//! the lifecycle model needs:
//!
//! - [`enter`] binds a record for the whole duration of a future,
//!   across suspension points, and restores the previous binding when the
//!   future completes (stack discipline per logical task);
//! - concurrent tasks each see only their own binding — siblings never
//!   observe each other's nested scopes;
//! - a plain `tokio::spawn` does **not** inherit the binding; use
//!   [`spawn_scoped`] to carry the scope active at the moment of spawn
//!   into the new task.
//!
//! ## Example
//! ```rust,no_run
//! use gulog::Gulog;
//!
//! # async fn demo(client: Gulog) {
//! let job = client.process("import");
//! gulog::scope::enter(job, async {
//!     // any code below, however deeply nested, can ask:
//!     let me = gulog::scope::current().expect("inside a scope");
//!     me.info("step 1");
//! })
//! .await;
//! assert!(gulog::scope::current().is_none());
//! # }
//! ```

use std::future::Future;

use tokio::task::JoinHandle;

use crate::process::Process;

tokio::task_local! {
    static CURRENT_PROCESS: Process;
}

/// Returns the record bound to the logically-enclosing scope, or `None`
/// outside any scope.
pub fn current() -> Option<Process> {
    CURRENT_PROCESS.try_with(|p| p.clone()).ok()
}

/// Runs `body` with `process` as the ambient current process.
///
/// [`current`] returns `process` everywhere inside `body`, including after
/// internal awaits and inside nested sub-futures polled by `body`. On
/// completion the previous binding (if any) is visible again.
pub async fn enter<F>(process: Process, body: F) -> F::Output
where
    F: Future,
{
    CURRENT_PROCESS.scope(process, body).await
}

/// Spawns a task that inherits the scope active at the moment of spawn.
///
/// Without a current scope this is a plain `tokio::spawn`.
pub fn spawn_scoped<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    match current() {
        Some(process) => tokio::spawn(CURRENT_PROCESS.scope(process, future)),
        None => tokio::spawn(future),
    }
}
