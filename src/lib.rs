// src/lib.rs

//! An asynchronous FIFO task queue with an integrated, path-addressable store.
//!
//! Tasks run one at a time in insertion order, each receiving the shared
//! [`Store`]. A failing task halts the sequence; draining it hands the store
//! to `end` listeners (or back from [`Queue::run`]).

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod store;

pub use engine::{Advance, Queue, QueueState, TaskFuture, TaskId, TaskResult};
pub use errors::{PagequeueError, QueueError};
pub use store::{Store, StoreData};

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde_json::Value;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_and_validate, PlanFile};
use crate::errors::Result;
use crate::exec::enqueue_all;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - plan loading + validation
/// - store seeding (plan seed, then the optional JSON seed file)
/// - queue construction and a run to completion
/// - printing the final store on stdout
pub async fn run(args: CliArgs) -> Result<()> {
    let plan_path = args.plan.as_path();
    let plan = load_and_validate(plan_path)?;

    if args.dry_run {
        print_dry_run(&plan);
        return Ok(());
    }

    let mut store = Store::from_data(plan.seed);
    if let Some(seed_path) = &args.seed {
        store.merge_value(load_seed(seed_path)?);
    }

    let steps = plan.steps.len();
    info!(plan = %plan_path.display(), steps, "running plan");

    let queue = enqueue_all(Queue::with_store(store), plan.steps);
    match queue.run().await {
        Ok(store) => {
            let out = if args.compact {
                serde_json::to_string(&store)?
            } else {
                serde_json::to_string_pretty(&store)?
            };
            println!("{out}");
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", serde_json::to_string(&err)?);
            Err(err.into())
        }
    }
}

/// Read a JSON seed file; it must hold a single object.
fn load_seed(path: &Path) -> Result<Value> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading seed file at {:?}", path))?;
    let value: Value = serde_json::from_str(&contents)?;

    if !value.is_object() {
        return Err(PagequeueError::ConfigError(format!(
            "seed file {:?} must contain a JSON object",
            path
        )));
    }
    Ok(value)
}

/// Simple dry-run output: print the seed namespaces and each step.
fn print_dry_run(plan: &PlanFile) {
    println!("pagequeue dry-run");

    let namespaces: Vec<_> = [
        ("meta", plan.seed.meta.is_some()),
        ("site", plan.seed.site.is_some()),
        ("page", plan.seed.page.is_some()),
    ]
    .into_iter()
    .filter(|(_, present)| *present)
    .map(|(name, _)| name)
    .collect();
    println!("  seed: {:?}", namespaces);
    println!();

    println!("steps ({}):", plan.steps.len());
    for (idx, step) in plan.steps.iter().enumerate() {
        println!("  {}. {}", idx + 1, step.describe());
    }

    debug!("dry-run complete (no execution)");
}
