// src/exec/step.rs

use std::time::Duration;

use tracing::debug;

use crate::config::{PlanFile, StepConfig};
use crate::engine::{Queue, TaskId};
use crate::errors::QueueError;
use crate::store::Store;

/// Build a queue seeded from `plan.seed` with every step enqueued in order.
pub fn queue_from_plan(plan: PlanFile) -> Queue {
    enqueue_all(Queue::with_initial(plan.seed), plan.steps)
}

/// Enqueue `steps` in order onto an existing queue.
pub fn enqueue_all(mut queue: Queue, steps: Vec<StepConfig>) -> Queue {
    for step in steps {
        enqueue_step(&mut queue, step);
    }
    queue
}

/// Append a single plan step to `queue`.
pub fn enqueue_step(queue: &mut Queue, step: StepConfig) -> TaskId {
    let description = step.describe();

    let id = match step {
        StepConfig::Set { path, value } => {
            queue.add_sync(move |store: &mut Store| store.set(&path, value))
        }
        StepConfig::Remove { path } => queue.add_sync(move |store: &mut Store| {
            store.remove(&path);
        }),
        StepConfig::Merge { data } => {
            queue.add_sync(move |store: &mut Store| store.merge_value(data))
        }
        StepConfig::Delay { ms } => queue.add(move |_store| {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                Ok(())
            })
        }),
        StepConfig::Fail {
            title,
            message,
            status_code,
        } => queue.add_sync(move |_: &mut Store| {
            Err::<(), _>(QueueError::new(title, message, status_code))
        }),
    };

    debug!(task_id = %id, step = %description, "plan step enqueued");
    id
}
