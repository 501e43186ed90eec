use serde_json::{Map, Value};
use pagequeue::config::{PlanFile, RawPlanFile, StepConfig};

/// Builder for `PlanFile` to simplify test setup.
pub struct PlanBuilder {
    plan: RawPlanFile,
}

impl PlanBuilder {
    pub fn new() -> Self {
        Self {
            plan: RawPlanFile::default(),
        }
    }

    pub fn seed_page(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.plan
            .seed
            .page
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value.into());
        self
    }

    pub fn seed_site(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.plan
            .seed
            .site
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value.into());
        self
    }

    pub fn set(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.plan.steps.push(StepConfig::Set {
            path: path.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn merge(mut self, data: Value) -> Self {
        self.plan.steps.push(StepConfig::Merge { data });
        self
    }

    pub fn delay(mut self, ms: u64) -> Self {
        self.plan.steps.push(StepConfig::Delay { ms });
        self
    }

    pub fn fail(mut self, title: &str, status_code: u16) -> Self {
        self.plan.steps.push(StepConfig::Fail {
            title: title.to_string(),
            message: format!("{title} (from test plan)"),
            status_code,
        });
        self
    }

    pub fn build(self) -> PlanFile {
        PlanFile::try_from(self.plan).expect("Failed to build valid plan from builder")
    }
}

impl Default for PlanBuilder {
    fn default() -> Self {
        Self::new()
    }
}
