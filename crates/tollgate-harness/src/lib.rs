//! # tollgate-harness
//!
//! Drives attempts against Tollgate tasks and records the verdicts.
//!
//! The validation itself lives in `tollgate-core` and is pure. This crate
//! holds everything around it:
//!
//! - **Suppliers** produce candidate outputs, interactively or from a
//!   recorded replay file ([`supplier`], [`replay`])
//! - **Runner** applies the bounded retry budget ([`runner`])
//! - **Results log** persists one CSV row per attempt ([`results`])
//! - **Summary** aggregates a results log into pass rates and failure
//!   modes ([`summary`])
//!
//! ## Example
//!
//! ```rust,ignore
//! use tollgate_core::TaskSet;
//! use tollgate_harness::{ReplaySupplier, Runner, results};
//!
//! let tasks = TaskSet::load_dir("tasks")?;
//! let mut supplier = ReplaySupplier::from_path("inputs.jsonl")?;
//! let records = Runner::new(3)?.run(&tasks, &mut supplier)?;
//! results::write_results("results/pilot_results.csv", &records)?;
//! ```

pub mod config;
pub mod replay;
pub mod results;
pub mod runner;
pub mod summary;
pub mod supplier;

pub use config::HarnessConfig;
pub use replay::{ReplayRecord, ReplaySupplier};
pub use results::AttemptRecord;
pub use runner::{Runner, DEFAULT_MAX_ATTEMPTS};
pub use summary::{Summary, TypeTally};
pub use supplier::{AttemptSupplier, InteractiveSupplier, Supplied};

use std::path::PathBuf;
use thiserror::Error;
use tollgate_core::TaskError;

/// Errors from the harness.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Task loading failed: {0}")]
    Tasks(#[from] TaskError),

    #[error("Failed to access {path}: {source}")]
    FileError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Replay line {line}: {source}")]
    ReplayError {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Results log error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Failed to parse YAML config: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl HarnessError {
    pub(crate) fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileError {
            path: path.into(),
            source,
        }
    }
}
