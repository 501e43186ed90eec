// src/engine/core.rs

//! Pure core queue state machine.
//!
//! The core consumes [`QueueEvent`]s and produces:
//! - an updated state (`pending`, [`QueueState`], recorded failure)
//! - a [`CoreStep`] of commands describing what the async shell does next
//!
//! The shell (`engine::queue::Queue`) is responsible for:
//! - awaiting the task a `Start` command hands out
//! - feeding the completion back as `TaskSucceeded` / `TaskFailed`
//! - firing listeners for `NotifyEnd` / `NotifyError`
//!
//! The core is generic over the task type so it can be unit tested with plain
//! values, without Tokio or a store.

use std::collections::VecDeque;
use std::fmt;

use crate::engine::event_handlers::{
    handle_next_requested, handle_task_failure, handle_task_success, CoreStep,
};
use crate::engine::{QueueEvent, QueueState};
use crate::errors::QueueError;

/// Pure queue state.
///
/// At most one task is handed out at a time; the next one is only released
/// after the previous completion has been reported.
pub struct QueueCore<T> {
    pending: VecDeque<T>,
    state: QueueState,
    failure: Option<QueueError>,
}

impl<T> fmt::Debug for QueueCore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueCore")
            .field("pending", &self.pending.len())
            .field("state", &self.state)
            .field("failure", &self.failure)
            .finish()
    }
}

impl<T> Default for QueueCore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> QueueCore<T> {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            state: QueueState::Idle,
            failure: None,
        }
    }

    /// Append a task to the end of the pending list. Does not start anything.
    pub fn push(&mut self, task: T) {
        self.pending.push_back(task);
    }

    /// Number of tasks not yet started.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn state(&self) -> QueueState {
        self.state
    }

    /// The error that halted the queue, if any.
    pub fn failure(&self) -> Option<&QueueError> {
        self.failure.as_ref()
    }

    /// Handle a single event, updating state and returning the commands for
    /// the shell.
    pub fn step(&mut self, event: QueueEvent) -> CoreStep<T> {
        match event {
            QueueEvent::NextRequested => handle_next_requested(&mut self.pending, &mut self.state),
            QueueEvent::TaskSucceeded => handle_task_success(&mut self.pending, &mut self.state),
            QueueEvent::TaskFailed(error) => {
                handle_task_failure(&mut self.state, &mut self.failure, error)
            }
        }
    }
}
