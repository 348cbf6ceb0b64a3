//! Summarizer: aggregates a results log into pass rates and failure modes.
//!
//! Only the final attempt of each task counts: the first passing attempt,
//! or the highest-numbered one if none passed.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tollgate_core::ErrorKind;

use crate::results::{read_results, AttemptRecord};
use crate::HarnessError;

/// Final outcomes for one task type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTally {
    pub task_type: String,

    /// Tasks of this type seen in the log
    pub tasks: usize,

    /// Tasks whose final attempt passed
    pub passed: usize,
}

impl TypeTally {
    /// Pass rate in percent; zero for an empty tally.
    pub fn rate(&self) -> f64 {
        if self.tasks == 0 {
            return 0.0;
        }
        self.passed as f64 / self.tasks as f64 * 100.0
    }
}

/// Aggregated view of a results log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    /// Per task type, in order of first appearance in the log
    pub by_type: Vec<TypeTally>,

    /// Error counts of failing final attempts, most frequent first
    pub failure_modes: Vec<(ErrorKind, usize)>,
}

impl Summary {
    /// Summarize attempt records.
    pub fn from_records(records: &[AttemptRecord]) -> Self {
        let mut order: Vec<&str> = Vec::new();
        let mut attempts: HashMap<&str, Vec<&AttemptRecord>> = HashMap::new();
        for record in records {
            let rows = attempts.entry(record.task_id.as_str()).or_insert_with(|| {
                order.push(record.task_id.as_str());
                Vec::new()
            });
            rows.push(record);
        }

        let mut by_type: Vec<TypeTally> = Vec::new();
        let mut errors: HashMap<ErrorKind, usize> = HashMap::new();

        for task_id in order {
            let Some(last) = attempts.get_mut(task_id).and_then(|rows| final_attempt(rows))
            else {
                continue;
            };

            let tally = match by_type
                .iter_mut()
                .position(|t| t.task_type == last.task_type)
            {
                Some(index) => &mut by_type[index],
                None => {
                    by_type.push(TypeTally {
                        task_type: last.task_type.clone(),
                        tasks: 0,
                        passed: 0,
                    });
                    let last = by_type.len() - 1;
                    &mut by_type[last]
                }
            };

            tally.tasks += 1;
            if last.passed {
                tally.passed += 1;
            } else {
                *errors.entry(last.error).or_insert(0) += 1;
            }
        }

        let mut failure_modes: Vec<(ErrorKind, usize)> = errors.into_iter().collect();
        failure_modes.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));

        Self {
            by_type,
            failure_modes,
        }
    }

    /// Read and summarize a results CSV.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, HarnessError> {
        let records = read_results(path)?;
        Ok(Self::from_records(&records))
    }
}

/// First passing attempt in attempt order, else the last attempt.
fn final_attempt<'a>(rows: &mut [&'a AttemptRecord]) -> Option<&'a AttemptRecord> {
    rows.sort_by_key(|r| r.attempt);
    rows.iter()
        .find(|r| r.passed)
        .or_else(|| rows.last())
        .copied()
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Final pass rates (per task):")?;
        for tally in &self.by_type {
            writeln!(
                f,
                "  {:<10}: {}/{} = {:.1}%",
                tally.task_type,
                tally.passed,
                tally.tasks,
                tally.rate()
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Failure modes (final attempt only):")?;
        for (error, count) in &self.failure_modes {
            writeln!(f, "  {:<20} {}", error.as_str(), count)?;
        }
        Ok(())
    }
}
