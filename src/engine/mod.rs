// src/engine/mod.rs

//! Sequential task runner.
//!
//! This module ties together:
//! - the pure queue state machine ([`core`] + [`event_handlers`]), which
//!   decides which task starts next and which notification fires
//! - the task abstraction ([`task`]) normalizing sync, async and panicking
//!   tasks into one [`TaskResult`]
//! - the listener registry ([`listeners`]) for `end` / `error` notifications
//! - the async shell [`Queue`] ([`queue`]) that owns the store and actually
//!   awaits tasks, one at a time, in FIFO order.

use std::fmt;

use crate::errors::QueueError;

/// Completion of a single task.
pub type TaskResult = Result<(), QueueError>;

/// Lifecycle state of a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueueState {
    /// Nothing running; tasks may be pending.
    #[default]
    Idle,
    /// A task's completion is outstanding.
    Running,
    /// The pending list was found empty; `end` fired.
    Drained,
    /// A task failed; terminal.
    Failed,
}

impl fmt::Display for QueueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QueueState::Idle => "idle",
            QueueState::Running => "running",
            QueueState::Drained => "drained",
            QueueState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Events fed into the core state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEvent {
    /// Caller (or the auto-advance after a success) asks for the next task.
    NextRequested,
    /// The running task completed successfully.
    TaskSucceeded,
    /// The running task failed.
    TaskFailed(QueueError),
}

pub mod core;
pub mod event_handlers;
pub mod listeners;
pub mod queue;
pub mod task;

pub use self::core::QueueCore;
pub use event_handlers::{CoreCommand, CoreStep};
pub use listeners::Listeners;
pub use queue::{Advance, Queue};
pub use task::{IntoTaskResult, Task, TaskFuture, TaskId};
