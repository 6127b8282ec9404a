use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::EvolutionError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a run is driven, as opposed to what is evolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub generations: usize,
    /// Number of most recent pools kept (and ranked) after the run
    pub keep_pools: Option<usize>,
    pub seed: Option<u64>,
    pub parallel_evaluation: bool,
    pub time_limit_secs: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            generations: 10,
            keep_pools: None,
            seed: None,
            parallel_evaluation: true,
            time_limit_secs: None,
        }
    }
}

impl RunConfig {
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs.map(Duration::from_secs)
    }
}

impl ConfigSection for RunConfig {
    fn section_name() -> &'static str {
        "run"
    }

    fn validate(&self) -> Result<(), EvolutionError> {
        if self.keep_pools == Some(0) {
            return Err(EvolutionError::Configuration(
                "keep_pools must keep at least one pool".to_string(),
            ));
        }
        if self.time_limit_secs == Some(0) {
            return Err(EvolutionError::Configuration(
                "time_limit_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Run".to_string(),
            fields: vec![
                FieldManifest::new(
                    "generations",
                    "integer",
                    serde_json::json!(10),
                    (Some(0.0), None),
                    "Number of evolution cycles",
                ),
                FieldManifest::new(
                    "keep_pools",
                    "integer?",
                    serde_json::Value::Null,
                    (Some(1.0), None),
                    "Most recent pools kept and ranked at the end",
                ),
                FieldManifest::new(
                    "seed",
                    "integer?",
                    serde_json::Value::Null,
                    (None, None),
                    "Seed for reproducible runs",
                ),
                FieldManifest::new(
                    "parallel_evaluation",
                    "bool",
                    serde_json::json!(true),
                    (None, None),
                    "Evaluate pool members across worker threads",
                ),
                FieldManifest::new(
                    "time_limit_secs",
                    "integer?",
                    serde_json::Value::Null,
                    (Some(1.0), None),
                    "Stop at the first generation boundary after this deadline",
                ),
            ],
        }
    }
}
