//! Replay of recorded outputs from a JSONL file.
//!
//! Each non-blank line is `{"task_id": "...", "attempt": n, "output": "..."}`.
//! A later line for the same task and attempt replaces an earlier one.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tollgate_core::Task;

use crate::supplier::{AttemptSupplier, Supplied};
use crate::HarnessError;

/// One recorded output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayRecord {
    pub task_id: String,
    pub attempt: u32,
    pub output: String,
}

/// Supplies outputs from recorded [`ReplayRecord`]s, untouched.
#[derive(Debug, Default)]
pub struct ReplaySupplier {
    outputs: HashMap<(String, u32), String>,
}

impl ReplaySupplier {
    /// Index records by task and attempt.
    pub fn from_records(records: impl IntoIterator<Item = ReplayRecord>) -> Self {
        let outputs = records
            .into_iter()
            .map(|r| ((r.task_id, r.attempt), r.output))
            .collect();
        Self { outputs }
    }

    /// Parse JSONL from a reader. Line numbers in errors are 1-based.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, HarnessError> {
        let mut records = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: ReplayRecord =
                serde_json::from_str(&line).map_err(|source| HarnessError::ReplayError {
                    line: index + 1,
                    source,
                })?;
            records.push(record);
        }
        tracing::debug!(records = records.len(), "Parsed replay records");
        Ok(Self::from_records(records))
    }

    /// Load a JSONL replay file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, HarnessError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| HarnessError::file(path, e))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Number of distinct (task, attempt) outputs.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

impl AttemptSupplier for ReplaySupplier {
    fn next_output(
        &mut self,
        task: &Task,
        attempt: u32,
        _max_attempts: u32,
    ) -> Result<Supplied, HarnessError> {
        let supplied = match self.outputs.get(&(task.id.clone(), attempt)) {
            Some(output) => Supplied::Output(output.clone()),
            None => Supplied::Missing,
        };
        Ok(supplied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const JSONL: &str = r#"{"task_id": "B1", "attempt": 1, "output": "41"}

{"task_id": "B1", "attempt": 2, "output": "42\n"}
{"task_id": "C1", "attempt": 2, "output": "{\"s\": \"hi\", \"n\": 2}"}
"#;

    #[test]
    fn test_parse_and_lookup() {
        let mut supplier = ReplaySupplier::from_reader(Cursor::new(JSONL)).unwrap();
        assert_eq!(supplier.len(), 3);

        let b1 = Task::baseline("B1", "p", "42");
        assert_eq!(
            supplier.next_output(&b1, 2, 3).unwrap(),
            Supplied::Output("42\n".to_string())
        );
        assert_eq!(supplier.next_output(&b1, 3, 3).unwrap(), Supplied::Missing);

        let c1 = Task::baseline("C1", "p", "x");
        assert_eq!(supplier.next_output(&c1, 1, 3).unwrap(), Supplied::Missing);
    }

    #[test]
    fn test_later_record_replaces_earlier() {
        let jsonl = concat!(
            r#"{"task_id": "B1", "attempt": 1, "output": "old"}"#,
            "\n",
            r#"{"task_id": "B1", "attempt": 1, "output": "new"}"#,
            "\n"
        );
        let mut supplier = ReplaySupplier::from_reader(Cursor::new(jsonl)).unwrap();
        assert_eq!(supplier.len(), 1);
        assert_eq!(
            supplier
                .next_output(&Task::baseline("B1", "p", "a"), 1, 3)
                .unwrap(),
            Supplied::Output("new".to_string())
        );
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let jsonl = "{\"task_id\": \"B1\", \"attempt\": 1, \"output\": \"x\"}\n\n{broken\n";
        match ReplaySupplier::from_reader(Cursor::new(jsonl)) {
            Err(HarnessError::ReplayError { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected ReplayError, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_field_is_error() {
        let jsonl = "{\"task_id\": \"B1\", \"output\": \"x\"}\n";
        assert!(ReplaySupplier::from_reader(Cursor::new(jsonl)).is_err());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inputs.jsonl");
        std::fs::write(&path, JSONL).unwrap();
        assert_eq!(ReplaySupplier::from_path(&path).unwrap().len(), 3);

        assert!(matches!(
            ReplaySupplier::from_path(dir.path().join("nope.jsonl")),
            Err(HarnessError::FileError { .. })
        ));
    }
}
