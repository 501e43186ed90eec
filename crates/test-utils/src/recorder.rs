use std::sync::{Arc, Mutex};
use std::time::Duration;

use pagequeue::{Queue, QueueError, Store, TaskId};
use serde_json::Value;

/// Shared, ordered log of labels written by recording tasks.
#[derive(Clone, Default)]
pub struct TaskLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl TaskLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    /// Enqueue a sync task that logs `label`.
    pub fn record(&self, queue: &mut Queue, label: &str) -> TaskId {
        let log = self.clone();
        let label = label.to_string();
        queue.add_sync(move |_: &mut Store| log.push(label))
    }

    /// Enqueue an async task that logs `label:start`, sleeps, then logs
    /// `label:end`. Interleaved entries would reveal overlapping tasks.
    pub fn record_async(&self, queue: &mut Queue, label: &str, delay: Duration) -> TaskId {
        let log = self.clone();
        let label = label.to_string();
        queue.add(move |_store| {
            Box::pin(async move {
                log.push(format!("{label}:start"));
                tokio::time::sleep(delay).await;
                log.push(format!("{label}:end"));
                Ok(())
            })
        })
    }

    /// Enqueue a sync task that logs `label` and then fails with `err`.
    pub fn record_failure(&self, queue: &mut Queue, label: &str, err: QueueError) -> TaskId {
        let log = self.clone();
        let label = label.to_string();
        queue.add_sync(move |_: &mut Store| {
            log.push(label);
            Err::<(), _>(err)
        })
    }
}

/// A notification observed through queue listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    End(Value),
    Error(QueueError),
}

/// Captures `end` (as a store dump) and `error` notifications in order.
#[derive(Clone, Default)]
pub struct Notifications {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl Notifications {
    /// Register listeners on `queue` and return the capture handle.
    pub fn attach(queue: &mut Queue) -> Self {
        let this = Self::default();
        {
            let seen = Arc::clone(&this.seen);
            queue.on_end(move |store| seen.lock().unwrap().push(Notification::End(store.dump())));
        }
        {
            let seen = Arc::clone(&this.seen);
            queue.on_error(move |err| seen.lock().unwrap().push(Notification::Error(err.clone())));
        }
        this
    }

    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn ends(&self) -> usize {
        self.all()
            .iter()
            .filter(|n| matches!(n, Notification::End(_)))
            .count()
    }

    pub fn errors(&self) -> Vec<QueueError> {
        self.all()
            .into_iter()
            .filter_map(|n| match n {
                Notification::Error(e) => Some(e),
                Notification::End(_) => None,
            })
            .collect()
    }
}
