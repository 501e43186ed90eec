// src/exec/mod.rs

//! Plan execution layer.
//!
//! Turns validated [`crate::config::PlanFile`] steps into queue tasks.
//! - [`step`] maps each `StepConfig` onto a sync or async task.

pub mod step;

pub use step::{enqueue_all, enqueue_step, queue_from_plan};
