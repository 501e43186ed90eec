// src/config/model.rs

use serde::Deserialize;
use serde_json::Value;

use crate::store::StoreData;

/// Top-level plan as read from a TOML file, before validation.
///
/// ```toml
/// [seed.site]
/// name = "Example"
///
/// [[step]]
/// action = "set"
/// path = "page.title"
/// value = "Hello"
///
/// [[step]]
/// action = "delay"
/// ms = 20
/// ```
///
/// Both sections are optional; an empty plan drains immediately.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlanFile {
    /// Initial store contents from `[seed.meta]`, `[seed.site]`, `[seed.page]`.
    #[serde(default)]
    pub seed: StoreData,

    /// Steps from `[[step]]`, in file order.
    #[serde(default, rename = "step")]
    pub steps: Vec<StepConfig>,
}

/// Validated plan. Construct via `PlanFile::try_from(RawPlanFile)`.
#[derive(Debug, Clone)]
pub struct PlanFile {
    pub seed: StoreData,
    pub steps: Vec<StepConfig>,
}

impl PlanFile {
    pub(crate) fn new_unchecked(seed: StoreData, steps: Vec<StepConfig>) -> Self {
        Self { seed, steps }
    }
}

/// One `[[step]]` entry, selected by its `action` key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum StepConfig {
    /// Write `value` at `path`.
    Set { path: String, value: Value },
    /// Remove whatever is at `path`.
    Remove { path: String },
    /// Deep-merge a table into the store.
    Merge { data: Value },
    /// Sleep before continuing with the next step.
    Delay { ms: u64 },
    /// Fail the sequence with a structured error.
    Fail {
        title: String,
        message: String,
        #[serde(default = "default_status_code")]
        status_code: u16,
    },
}

fn default_status_code() -> u16 {
    500
}

impl StepConfig {
    /// One-line description for dry-run output and logs.
    pub fn describe(&self) -> String {
        match self {
            StepConfig::Set { path, value } => format!("set {path} = {value}"),
            StepConfig::Remove { path } => format!("remove {path}"),
            StepConfig::Merge { data } => format!("merge {data}"),
            StepConfig::Delay { ms } => format!("delay {ms}ms"),
            StepConfig::Fail {
                title, status_code, ..
            } => format!("fail {status_code} ({title})"),
        }
    }
}
