// src/config/validate.rs

use crate::config::model::{PlanFile, RawPlanFile, StepConfig};
use crate::errors::{PagequeueError, Result};

/// Upper bound for a single `delay` step.
pub const MAX_DELAY_MS: u64 = 60_000;

impl TryFrom<RawPlanFile> for PlanFile {
    type Error = PagequeueError;

    fn try_from(raw: RawPlanFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_plan(&raw)?;
        Ok(PlanFile::new_unchecked(raw.seed, raw.steps))
    }
}

fn validate_raw_plan(plan: &RawPlanFile) -> Result<()> {
    for (idx, step) in plan.steps.iter().enumerate() {
        // 1-based, matching the order of `[[step]]` tables in the file.
        validate_step(idx + 1, step)?;
    }
    Ok(())
}

fn validate_step(number: usize, step: &StepConfig) -> Result<()> {
    match step {
        StepConfig::Set { path, .. } | StepConfig::Remove { path } => {
            if path.trim().is_empty() {
                return Err(config_error(number, "`path` must not be empty"));
            }
        }
        StepConfig::Merge { data } => {
            if !data.is_object() {
                return Err(config_error(number, "`data` must be a table"));
            }
        }
        StepConfig::Delay { ms } => {
            if *ms > MAX_DELAY_MS {
                return Err(config_error(
                    number,
                    &format!("`ms` must be <= {MAX_DELAY_MS} (got {ms})"),
                ));
            }
        }
        StepConfig::Fail {
            title, status_code, ..
        } => {
            if title.trim().is_empty() {
                return Err(config_error(number, "`title` must not be empty"));
            }
            if !(100..=599).contains(status_code) {
                return Err(config_error(
                    number,
                    &format!("`status_code` must be within 100..=599 (got {status_code})"),
                ));
            }
        }
    }
    Ok(())
}

fn config_error(number: usize, msg: &str) -> PagequeueError {
    PagequeueError::ConfigError(format!("step {number}: {msg}"))
}
