// src/engine/event_handlers.rs

//! Event handling logic for the core queue.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::engine::QueueState;
use crate::errors::QueueError;

/// Command produced by the pure core, to be executed by the async shell.
#[derive(Debug)]
pub enum CoreCommand<T> {
    /// Invoke this task with the store and report its completion back.
    Start(T),
    /// Fire the `end` notification with the current store.
    NotifyEnd,
    /// Fire the `error` notification.
    NotifyError(QueueError),
}

/// Decision returned by the core after handling a single `QueueEvent`.
#[derive(Debug)]
pub struct CoreStep<T> {
    pub commands: Vec<CoreCommand<T>>,
}

impl<T> CoreStep<T> {
    pub fn idle() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    fn single(command: CoreCommand<T>) -> Self {
        Self {
            commands: vec![command],
        }
    }
}

/// Handle a request to advance the queue.
///
/// - Running: ignored, the outstanding completion will advance the queue.
/// - Failed: a failed sequence never resumes. With tasks still pending the
///   request is ignored; once nothing is pending it signals `end` and the
///   queue stays failed.
/// - Otherwise: start the head task, or report the queue as drained. Draining
///   is not sticky; every request against an empty queue re-fires `end`.
pub fn handle_next_requested<T>(
    pending: &mut VecDeque<T>,
    state: &mut QueueState,
) -> CoreStep<T> {
    match *state {
        QueueState::Running => {
            debug!("next requested while a task is running; ignoring");
            CoreStep::idle()
        }
        QueueState::Failed if pending.is_empty() => {
            debug!("next requested after failure with nothing pending; signalling end");
            CoreStep::single(CoreCommand::NotifyEnd)
        }
        QueueState::Failed => {
            debug!(pending = pending.len(), "next requested after failure; queue is halted");
            CoreStep::idle()
        }
        QueueState::Idle | QueueState::Drained => match pending.pop_front() {
            Some(task) => {
                *state = QueueState::Running;
                debug!(remaining = pending.len(), "starting next task");
                CoreStep::single(CoreCommand::Start(task))
            }
            None => {
                *state = QueueState::Drained;
                debug!("no pending tasks; signalling end");
                CoreStep::single(CoreCommand::NotifyEnd)
            }
        },
    }
}

/// Handle a successful completion: back to idle, then advance immediately.
pub fn handle_task_success<T>(
    pending: &mut VecDeque<T>,
    state: &mut QueueState,
) -> CoreStep<T> {
    if *state != QueueState::Running {
        warn!(%state, "task success reported while no task was running; ignoring");
        return CoreStep::idle();
    }

    *state = QueueState::Idle;
    handle_next_requested(pending, state)
}

/// Handle a failed completion: halt and surface the error once.
pub fn handle_task_failure<T>(
    state: &mut QueueState,
    failure: &mut Option<QueueError>,
    error: QueueError,
) -> CoreStep<T> {
    if *state != QueueState::Running {
        warn!(%state, error = %error, "task failure reported while no task was running; ignoring");
        return CoreStep::idle();
    }

    *state = QueueState::Failed;
    *failure = Some(error.clone());
    CoreStep::single(CoreCommand::NotifyError(error))
}
