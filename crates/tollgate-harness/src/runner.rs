//! The attempt runner.
//!
//! For each task, in id order, the runner asks its supplier for up to
//! `max_attempts` outputs and validates each one, stopping at the first
//! pass. Attempts within a task are sequential; tasks are independent.

use tollgate_core::{validate, TaskSet};

use crate::results::AttemptRecord;
use crate::supplier::{AttemptSupplier, Supplied};
use crate::HarnessError;

/// Attempts per task when nothing else is configured.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Drives a supplier through a task set under a bounded retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Runner {
    max_attempts: u32,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl Runner {
    /// Create a runner allowing `max_attempts` attempts per task.
    pub fn new(max_attempts: u32) -> Result<Self, HarnessError> {
        if max_attempts == 0 {
            return Err(HarnessError::InvalidConfig(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(Self { max_attempts })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run every task and return one record per validated attempt.
    ///
    /// A [`Supplied::Stop`] ends the run early; the records gathered so far
    /// are returned.
    pub fn run(
        &self,
        tasks: &TaskSet,
        supplier: &mut dyn AttemptSupplier,
    ) -> Result<Vec<AttemptRecord>, HarnessError> {
        let mut records = Vec::new();

        'tasks: for task in tasks {
            supplier.begin_task(task)?;

            for attempt in 1..=self.max_attempts {
                let output = match supplier.next_output(task, attempt, self.max_attempts)? {
                    Supplied::Output(output) => output,
                    Supplied::Missing => continue,
                    Supplied::Stop => {
                        tracing::info!(task = %task.id, attempt, "Attempt supply stopped");
                        break 'tasks;
                    }
                };

                let verdict = validate(task, &output);
                tracing::debug!(
                    task = %task.id,
                    attempt,
                    error = %verdict.error,
                    "Validated attempt"
                );

                records.push(AttemptRecord::new(task, attempt, &verdict));
                supplier.report(task, attempt, &verdict)?;

                if verdict.passed {
                    break;
                }
            }
        }

        tracing::info!(
            tasks = tasks.len(),
            attempts = records.len(),
            passed = records.iter().filter(|r| r.passed).count(),
            "Run finished"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::{ReplayRecord, ReplaySupplier};
    use tollgate_core::{ErrorKind, Task, Verdict};

    fn tasks() -> TaskSet {
        let charcount = serde_json::from_value(serde_json::json!({
            "kind": "json_crossfield_charcount", "text_key": "s", "count_key": "n"
        }))
        .unwrap();
        TaskSet::new(vec![
            Task::constraint("C1", "charcount", charcount),
            Task::baseline("B1", "2+2?", "4"),
        ])
        .unwrap()
    }

    fn record(task_id: &str, attempt: u32, output: &str) -> ReplayRecord {
        ReplayRecord {
            task_id: task_id.to_string(),
            attempt,
            output: output.to_string(),
        }
    }

    /// Supplies scripted outputs and remembers every call.
    struct Scripted {
        outputs: Vec<Supplied>,
        begun: Vec<String>,
        reported: Vec<(String, u32, ErrorKind)>,
    }

    impl AttemptSupplier for Scripted {
        fn begin_task(&mut self, task: &Task) -> Result<(), HarnessError> {
            self.begun.push(task.id.clone());
            Ok(())
        }

        fn next_output(&mut self, _: &Task, _: u32, _: u32) -> Result<Supplied, HarnessError> {
            if self.outputs.is_empty() {
                return Ok(Supplied::Stop);
            }
            Ok(self.outputs.remove(0))
        }

        fn report(&mut self, task: &Task, attempt: u32, verdict: &Verdict) -> Result<(), HarnessError> {
            self.reported.push((task.id.clone(), attempt, verdict.error));
            Ok(())
        }
    }

    #[test]
    fn test_zero_budget_rejected() {
        assert!(Runner::new(0).is_err());
        assert_eq!(Runner::default().max_attempts(), 3);
    }

    #[test]
    fn test_stops_at_first_pass() {
        let mut supplier = ReplaySupplier::from_records(vec![
            record("B1", 1, "5"),
            record("B1", 2, "4\n"),
            record("B1", 3, "4"),
            record("C1", 1, r#"{"s": "hello", "n": 5}"#),
        ]);
        let records = Runner::new(3).unwrap().run(&tasks(), &mut supplier).unwrap();

        let summary: Vec<(&str, u32, bool)> = records
            .iter()
            .map(|r| (r.task_id.as_str(), r.attempt, r.passed))
            .collect();
        assert_eq!(
            summary,
            vec![("B1", 1, false), ("B1", 2, true), ("C1", 1, true)]
        );
    }

    #[test]
    fn test_budget_bounds_attempts() {
        let mut supplier = ReplaySupplier::from_records(vec![
            record("B1", 1, "1"),
            record("B1", 2, "2"),
            record("B1", 3, "3"),
        ]);
        let records = Runner::new(2).unwrap().run(&tasks(), &mut supplier).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.error == ErrorKind::WrongAnswer));
    }

    #[test]
    fn test_missing_attempt_skips_to_next_number() {
        let mut supplier = ReplaySupplier::from_records(vec![record("C1", 3, "{")]);
        let records = Runner::new(3).unwrap().run(&tasks(), &mut supplier).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].attempt, 3);
        assert_eq!(records[0].error, ErrorKind::InvalidJson);
        assert_eq!(records[0].task_type, "constraint");
    }

    #[test]
    fn test_stop_ends_run_and_keeps_records() {
        let mut supplier = Scripted {
            outputs: vec![Supplied::Output("5".to_string())],
            begun: Vec::new(),
            reported: Vec::new(),
        };
        let records = Runner::new(3).unwrap().run(&tasks(), &mut supplier).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(supplier.begun, vec!["B1".to_string()]);
        assert_eq!(
            supplier.reported,
            vec![("B1".to_string(), 1, ErrorKind::WrongAnswer)]
        );
    }

    #[test]
    fn test_tasks_run_in_id_order() {
        let mut supplier = Scripted {
            outputs: vec![
                Supplied::Output("4".to_string()),
                Supplied::Output(r#"{"s": "", "n": 0}"#.to_string()),
            ],
            begun: Vec::new(),
            reported: Vec::new(),
        };
        let records = Runner::new(1).unwrap().run(&tasks(), &mut supplier).unwrap();

        assert_eq!(supplier.begun, vec!["B1".to_string(), "C1".to_string()]);
        assert!(records.iter().all(|r| r.passed));
    }
}
