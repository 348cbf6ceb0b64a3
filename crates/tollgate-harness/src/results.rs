//! Results log: one CSV row per attempt.
//!
//! Columns are `task_id,task_type,attempt,passed,error,detail`. `passed` is
//! written as `True`/`False`; reading accepts any casing of `true`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tollgate_core::{ErrorKind, Task, Verdict};

use crate::HarnessError;

/// Header row of the results log.
pub const COLUMNS: [&str; 6] = ["task_id", "task_type", "attempt", "passed", "error", "detail"];

/// A validated attempt, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub task_id: String,
    pub task_type: String,
    pub attempt: u32,

    #[serde(with = "title_case_bool")]
    pub passed: bool,

    pub error: ErrorKind,

    /// Empty when the verdict carried no detail
    #[serde(default)]
    pub detail: String,
}

impl AttemptRecord {
    /// Record the verdict of `attempt` on `task`.
    pub fn new(task: &Task, attempt: u32, verdict: &Verdict) -> Self {
        Self {
            task_id: task.id.clone(),
            task_type: task.task_type().to_string(),
            attempt,
            passed: verdict.passed,
            error: verdict.error,
            detail: verdict.detail.clone().unwrap_or_default(),
        }
    }
}

/// Write `records` to `path`, creating parent directories. The header is
/// written even when there are no records.
pub fn write_results(path: impl AsRef<Path>, records: &[AttemptRecord]) -> Result<(), HarnessError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| HarnessError::file(parent, e))?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(|e| HarnessError::file(path, e))?;

    tracing::debug!(path = %path.display(), rows = records.len(), "Wrote results log");
    Ok(())
}

/// Read every row of a results log.
pub fn read_results(path: impl AsRef<Path>) -> Result<Vec<AttemptRecord>, HarnessError> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let records = reader.deserialize().collect::<Result<Vec<AttemptRecord>, _>>()?;
    Ok(records)
}

/// `True`/`False` on write; case-insensitive `true` on read.
mod title_case_bool {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "True" } else { "False" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(text.eq_ignore_ascii_case("true"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<AttemptRecord> {
        let task = Task::baseline("B1", "2+2?", "4");
        vec![
            AttemptRecord::new(
                &task,
                1,
                &Verdict::fail(ErrorKind::WrongAnswer, "Expected \"4\", got \"5, or so\""),
            ),
            AttemptRecord::new(&task, 2, &Verdict::pass()),
        ]
    }

    #[test]
    fn test_record_from_verdict() {
        let records = sample();
        assert_eq!(records[0].task_type, "baseline");
        assert!(!records[0].passed);
        assert_eq!(records[1].error, ErrorKind::Pass);
        assert_eq!(records[1].detail, "");
    }

    #[test]
    fn test_written_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/results.csv");
        write_results(&path, &sample()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "task_id,task_type,attempt,passed,error,detail");
        assert_eq!(
            lines[1],
            r#"B1,baseline,1,False,WRONG_ANSWER,"Expected ""4"", got ""5, or so""""#
        );
        assert_eq!(lines[2], "B1,baseline,2,True,PASS,");
    }

    #[test]
    fn test_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        write_results(&path, &sample()).unwrap();
        assert_eq!(read_results(&path).unwrap(), sample());
    }

    #[test]
    fn test_header_written_for_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_results(&path, &[]).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap().trim_end(),
            "task_id,task_type,attempt,passed,error,detail"
        );
        assert!(read_results(&path).unwrap().is_empty());
    }

    #[test]
    fn test_passed_read_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        fs::write(
            &path,
            "task_id,task_type,attempt,passed,error,detail\nC1,constraint,1,TRUE,PASS,\nC2,constraint,1,no,MISMATCH,x\n",
        )
        .unwrap();

        let records = read_results(&path).unwrap();
        assert!(records[0].passed);
        assert!(!records[1].passed);
        assert_eq!(records[1].error, ErrorKind::Mismatch);
    }
}
