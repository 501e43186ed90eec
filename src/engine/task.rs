// src/engine/task.rs

//! Units of work run by the queue.
//!
//! Every task, whatever its shape, is normalized into a boxed async closure
//! `FnOnce(&mut Store) -> TaskFuture`. Running it yields exactly one
//! [`TaskResult`]: returned errors, rejected futures and panics (while
//! building the future or while polling it) all end up as a [`QueueError`].

use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;

use futures::FutureExt;
use tracing::warn;

use crate::engine::TaskResult;
use crate::errors::QueueError;
use crate::store::Store;

/// Future returned by an asynchronous task. Borrows the store while it runs.
pub type TaskFuture<'a> = Pin<Box<dyn Future<Output = TaskResult> + Send + 'a>>;

type TaskFn = Box<dyn for<'a> FnOnce(&'a mut Store) -> TaskFuture<'a> + Send>;

/// Sequence number assigned when a task is added to a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Anything a synchronous task may return.
///
/// `()` means success; a `Result` succeeds with any value (which is
/// discarded) or fails with anything convertible into a [`QueueError`].
pub trait IntoTaskResult {
    fn into_task_result(self) -> TaskResult;
}

impl IntoTaskResult for () {
    fn into_task_result(self) -> TaskResult {
        Ok(())
    }
}

impl<T, E> IntoTaskResult for Result<T, E>
where
    E: Into<QueueError>,
{
    fn into_task_result(self) -> TaskResult {
        self.map(|_| ()).map_err(Into::into)
    }
}

pub struct Task {
    id: TaskId,
    run: TaskFn,
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl Task {
    /// Asynchronous task.
    pub fn new<F>(id: TaskId, run: F) -> Self
    where
        F: for<'a> FnOnce(&'a mut Store) -> TaskFuture<'a> + Send + 'static,
    {
        Self {
            id,
            run: Box::new(run),
        }
    }

    /// Synchronous task. It runs when the task is polled for the first time.
    pub fn from_sync<F, R>(id: TaskId, run: F) -> Self
    where
        F: FnOnce(&mut Store) -> R + Send + 'static,
        R: IntoTaskResult,
    {
        Self::new(id, move |store| {
            Box::pin(async move { run(store).into_task_result() })
        })
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Run the task to completion against `store`.
    pub(crate) async fn execute(self, store: &mut Store) -> TaskResult {
        let Task { id, run } = self;

        let future = match panic::catch_unwind(AssertUnwindSafe(move || run(store))) {
            Ok(future) => future,
            Err(payload) => {
                warn!(task_id = %id, "task panicked before returning a future");
                return Err(QueueError::from_panic(payload));
            }
        };

        match AssertUnwindSafe(future).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => {
                warn!(task_id = %id, "task panicked while running");
                Err(QueueError::from_panic(payload))
            }
        }
    }
}
