//! Harness configuration.
//!
//! Defaults match a pilot checked out with its `tasks/` directory next to
//! the working directory. A YAML file may override any field; fields it
//! omits keep their defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::runner::DEFAULT_MAX_ATTEMPTS;
use crate::HarnessError;

/// Default directory holding the task files.
pub const DEFAULT_TASKS_DIR: &str = "tasks";

/// Default results log location.
pub const DEFAULT_RESULTS_PATH: &str = "results/pilot_results.csv";

/// Configuration for a pilot run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Directory containing `baseline_tasks.json` and `constraint_tasks.json`
    pub tasks_dir: PathBuf,

    /// Attempts allowed per task before giving up
    pub max_attempts: u32,

    /// Where the results CSV is written
    pub results_path: PathBuf,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            tasks_dir: PathBuf::from(DEFAULT_TASKS_DIR),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            results_path: PathBuf::from(DEFAULT_RESULTS_PATH),
        }
    }
}

impl HarnessConfig {
    /// Parse a config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, HarnessError> {
        let config: HarnessConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, HarnessError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| HarnessError::file(path, e))?;
        Self::from_yaml(&contents)
    }

    /// Check field values.
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.max_attempts == 0 {
            return Err(HarnessError::InvalidConfig(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
