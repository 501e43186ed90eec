// src/engine/queue.rs

use std::fmt;

use tracing::{debug, info, warn};

use crate::engine::core::QueueCore;
use crate::engine::event_handlers::CoreCommand;
use crate::engine::listeners::Listeners;
use crate::engine::task::{IntoTaskResult, Task, TaskFuture, TaskId};
use crate::engine::{QueueEvent, QueueState};
use crate::errors::QueueError;
use crate::store::{Store, StoreData};

/// How a call to [`Queue::next`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// The pending list ran empty and `end` fired.
    Drained,
    /// A task failed and `error` fired.
    Failed(QueueError),
    /// Nothing happened (the queue had already failed).
    Halted,
}

/// An asynchronous FIFO task queue with an integrated [`Store`].
///
/// Tasks run strictly one at a time in insertion order. A failing task halts
/// the queue for good; draining the queue fires `end` with the store.
///
/// ```
/// use pagequeue::{Queue, Store};
///
/// # tokio_test_block(async {
/// let mut queue = Queue::new();
///
/// queue.on_end(|store: &Store| {
///     println!("{}", store.dump());
/// });
///
/// queue.add_sync(|store: &mut Store| {
///     store.set("page.title", "Hello world!");
/// });
///
/// queue.add(|store| Box::pin(async move {
///     store.set("page.ready", true);
///     Ok(())
/// }));
///
/// queue.next().await;
/// # });
/// # fn tokio_test_block(f: impl std::future::Future<Output = ()>) {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
pub struct Queue {
    core: QueueCore<Task>,
    store: Store,
    listeners: Listeners,
    next_id: u64,
}

impl fmt::Debug for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue")
            .field("core", &self.core)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl Queue {
    pub fn new() -> Self {
        Self::with_store(Store::new())
    }

    /// Create a queue and hydrate the store with whatever data is already
    /// available.
    pub fn with_initial(initial: StoreData) -> Self {
        Self::with_store(Store::from_data(initial))
    }

    pub fn with_store(store: Store) -> Self {
        Self {
            core: QueueCore::new(),
            store,
            listeners: Listeners::default(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append an asynchronous task. Does not start execution.
    ///
    /// The task borrows the store for as long as its future runs.
    pub fn add<F>(&mut self, task: F) -> TaskId
    where
        F: for<'a> FnOnce(&'a mut Store) -> TaskFuture<'a> + Send + 'static,
    {
        let id = self.allocate_id();
        self.core.push(Task::new(id, task));
        debug!(task_id = %id, pending = self.core.len(), "task added");
        id
    }

    /// Append a synchronous task. Does not start execution.
    pub fn add_sync<F, R>(&mut self, task: F) -> TaskId
    where
        F: FnOnce(&mut Store) -> R + Send + 'static,
        R: IntoTaskResult,
    {
        let id = self.allocate_id();
        self.core.push(Task::from_sync(id, task));
        debug!(task_id = %id, pending = self.core.len(), "sync task added");
        id
    }

    /// Register a listener for "sequence complete". It receives the store
    /// itself; call [`Store::dump`] for an owned snapshot.
    pub fn on_end(&mut self, listener: impl FnMut(&Store) + Send + 'static) {
        self.listeners.on_end(listener);
    }

    /// Register a listener for "sequence failed".
    pub fn on_error(&mut self, listener: impl FnMut(&QueueError) + Send + 'static) {
        self.listeners.on_error(listener);
    }

    /// Read access to the store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn state(&self) -> QueueState {
        self.core.state()
    }

    /// Tasks not yet started.
    pub fn len(&self) -> usize {
        self.core.len()
    }

    pub fn is_empty(&self) -> bool {
        self.core.is_empty()
    }

    /// Run pending tasks in FIFO order until the queue drains or a task fails.
    ///
    /// This is also the way to start the queue. On an empty queue it fires
    /// `end` immediately, and does so again on every later call. After a
    /// failure pending tasks never run: the call does nothing while tasks
    /// remain, and fires `end` once none are left. Errors are reported through
    /// `error` listeners, never returned.
    ///
    /// Dropping the returned future while a task is in flight leaves the
    /// queue `Running` for good, just like a task that never completes.
    pub async fn next(&mut self) -> Advance {
        let mut step = self.core.step(QueueEvent::NextRequested);
        let mut advance = Advance::Halted;

        loop {
            let mut started = None;
            for command in step.commands {
                match command {
                    CoreCommand::Start(task) => started = Some(task),
                    CoreCommand::NotifyEnd => {
                        info!(keys = self.store.len(), "queue drained");
                        self.listeners.notify_end(&self.store);
                        advance = Advance::Drained;
                    }
                    CoreCommand::NotifyError(err) => {
                        warn!(
                            title = %err.title,
                            status_code = err.status_code,
                            pending = self.core.len(),
                            "queue halted by failing task"
                        );
                        self.listeners.notify_error(&err);
                        advance = Advance::Failed(err);
                    }
                }
            }

            let Some(task) = started else {
                break;
            };

            let id = task.id();
            debug!(task_id = %id, "running task");
            let event = match task.execute(&mut self.store).await {
                Ok(()) => {
                    debug!(task_id = %id, "task completed");
                    QueueEvent::TaskSucceeded
                }
                Err(err) => {
                    debug!(task_id = %id, error = %err, "task failed");
                    QueueEvent::TaskFailed(err)
                }
            };
            step = self.core.step(event);
        }

        advance
    }

    /// Run the queue to completion and hand back the final store.
    ///
    /// Listeners still fire. If the queue had already failed, the recorded
    /// error is returned, even when this call drained it and fired `end`.
    pub async fn run(mut self) -> Result<Store, QueueError> {
        match self.next().await {
            Advance::Failed(err) => Err(err),
            Advance::Drained | Advance::Halted => match self.core.failure() {
                Some(err) => Err(err.clone()),
                None if self.core.state() == QueueState::Drained => Ok(self.store),
                None => Err(QueueError::internal("queue halted without a recorded failure")),
            },
        }
    }
}
