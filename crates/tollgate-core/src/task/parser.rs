//! Task parsing from JSON task files.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::schema::validate_task_file;
use crate::rules::ValidatorSpec;

/// Task files read from a tasks directory, in merge order.
pub const TASK_FILES: [&str; 2] = ["baseline_tasks.json", "constraint_tasks.json"];

/// Errors that can occur when loading tasks.
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Failed to read task file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Task file failed schema validation: {}", .0.join("; "))]
    SchemaViolation(Vec<String>),

    #[error("Task {id}: {message}")]
    InvalidTask { id: String, message: String },

    #[error("Duplicate task ID: {0}")]
    DuplicateId(String),
}

/// What a task expects from an output.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskBody {
    /// `type = "baseline"`: exact expected answer
    Baseline { answer: String },

    /// `type = "constraint"`: rule-based check
    Constraint { validator: ValidatorSpec },

    /// Any other `type` value, or none
    Unknown { task_type: Option<String> },
}

#[derive(Deserialize)]
struct RawTask {
    id: String,

    #[serde(rename = "type", default)]
    task_type: Option<String>,

    prompt: String,

    #[serde(default)]
    answer: Option<String>,

    #[serde(default)]
    validator: Option<Value>,
}

/// An evaluation task: a prompt plus what counts as a correct output.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Unique identifier (e.g., "B1", "C4")
    pub id: String,

    /// Prompt shown to whoever produces the output
    pub prompt: String,

    /// Expected answer or validator
    pub body: TaskBody,
}

impl Task {
    /// Type the body of a raw task record.
    fn from_raw(raw: RawTask) -> Result<Self, TaskError> {
        let invalid = |message: String| TaskError::InvalidTask {
            id: raw.id.clone(),
            message,
        };

        let body = match raw.task_type.as_deref() {
            Some("baseline") => {
                let answer = raw
                    .answer
                    .ok_or_else(|| invalid("missing answer".to_string()))?;
                TaskBody::Baseline { answer }
            }
            Some("constraint") => {
                let value = raw
                    .validator
                    .ok_or_else(|| invalid("missing validator".to_string()))?;
                let validator = serde_json::from_value(value)
                    .map_err(|e| invalid(format!("invalid validator: {}", e)))?;
                TaskBody::Constraint { validator }
            }
            _ => TaskBody::Unknown {
                task_type: raw.task_type,
            },
        };

        Ok(Self {
            id: raw.id,
            prompt: raw.prompt,
            body,
        })
    }

    /// Build a baseline task.
    pub fn baseline(
        id: impl Into<String>,
        prompt: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            body: TaskBody::Baseline {
                answer: answer.into(),
            },
        }
    }

    /// Build a constraint task.
    pub fn constraint(
        id: impl Into<String>,
        prompt: impl Into<String>,
        validator: ValidatorSpec,
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            body: TaskBody::Constraint { validator },
        }
    }

    /// The `type` string as it appears in task files and results logs.
    pub fn task_type(&self) -> &str {
        match &self.body {
            TaskBody::Baseline { .. } => "baseline",
            TaskBody::Constraint { .. } => "constraint",
            TaskBody::Unknown { task_type } => task_type.as_deref().unwrap_or(""),
        }
    }

    /// The validator spec, for constraint tasks.
    pub fn validator(&self) -> Option<&ValidatorSpec> {
        match &self.body {
            TaskBody::Constraint { validator } => Some(validator),
            _ => None,
        }
    }
}

/// All tasks of a pilot, sorted by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskSet {
    tasks: Vec<Task>,
}

impl TaskSet {
    /// Build a set from tasks, sorting by id and rejecting duplicates.
    pub fn new(mut tasks: Vec<Task>) -> Result<Self, TaskError> {
        tasks.sort_by(|a, b| a.id.cmp(&b.id));

        let mut seen = HashSet::new();
        for task in &tasks {
            if !seen.insert(task.id.as_str()) {
                return Err(TaskError::DuplicateId(task.id.clone()));
            }
        }

        Ok(Self { tasks })
    }

    /// Parse one task file's contents (a JSON array).
    pub fn parse_file_contents(json: &str) -> Result<Vec<Task>, TaskError> {
        let value: Value = serde_json::from_str(json)?;
        validate_task_file(&value).map_err(TaskError::SchemaViolation)?;
        let raw: Vec<RawTask> = serde_json::from_value(value)?;
        raw.into_iter().map(Task::from_raw).collect()
    }

    /// Merge several task files' contents into one set.
    pub fn from_json_sources<S: AsRef<str>>(sources: &[S]) -> Result<Self, TaskError> {
        let mut tasks = Vec::new();
        for source in sources {
            tasks.extend(Self::parse_file_contents(source.as_ref())?);
        }
        Self::new(tasks)
    }

    /// Load a single task file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TaskError> {
        let contents = read_file(path.as_ref())?;
        Self::from_json_sources(&[contents])
    }

    /// Load `baseline_tasks.json` and `constraint_tasks.json` from `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, TaskError> {
        let dir = dir.as_ref();
        let mut tasks = Vec::new();

        for name in TASK_FILES {
            let path = dir.join(name);
            let contents = read_file(&path)?;
            let parsed = Self::parse_file_contents(&contents)?;
            tracing::debug!(path = %path.display(), count = parsed.len(), "Parsed task file");
            tasks.extend(parsed);
        }

        let set = Self::new(tasks)?;
        tracing::info!(dir = %dir.display(), tasks = set.len(), "Loaded tasks");
        Ok(set)
    }

    /// Look up a task by id.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<'a> IntoIterator for &'a TaskSet {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

fn read_file(path: &Path) -> Result<String, TaskError> {
    fs::read_to_string(path).map_err(|source| TaskError::IoError {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASELINE: &str = r#"[
        {"id": "B2", "type": "baseline", "prompt": "Capital of France?", "answer": "Paris"},
        {"id": "B1", "type": "baseline", "prompt": "2+2?", "answer": "4"}
    ]"#;

    const CONSTRAINT: &str = r#"[
        {
            "id": "C1",
            "type": "constraint",
            "prompt": "Return a 5-letter word and its vowel count.",
            "validator": {"kind": "json_vowel_count", "x_key": "x", "y_key": "y", "len": 5}
        },
        {
            "id": "A0",
            "type": "constraint",
            "prompt": "Something new.",
            "validator": {"kind": "json_haiku", "lines": 3}
        }
    ]"#;

    #[test]
    fn test_merge_sorts_by_id() {
        let set = TaskSet::from_json_sources(&[BASELINE, CONSTRAINT]).unwrap();
        let ids: Vec<&str> = set.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["A0", "B1", "B2", "C1"]);
    }

    #[test]
    fn test_parse_task_bodies() {
        let set = TaskSet::from_json_sources(&[BASELINE, CONSTRAINT]).unwrap();

        let b1 = set.get("B1").unwrap();
        assert_eq!(b1.task_type(), "baseline");
        assert_eq!(
            b1.body,
            TaskBody::Baseline {
                answer: "4".to_string()
            }
        );

        let c1 = set.get("C1").unwrap();
        assert_eq!(c1.task_type(), "constraint");
        assert_eq!(c1.validator().unwrap().kind(), "json_vowel_count");

        let a0 = set.get("A0").unwrap();
        assert!(matches!(
            a0.validator(),
            Some(ValidatorSpec::Unknown { kind }) if kind == "json_haiku"
        ));
    }

    #[test]
    fn test_unknown_type_loads() {
        let json = r#"[
            {"id": "X1", "type": "essay", "prompt": "Write."},
            {"id": "X2", "prompt": "Untyped."}
        ]"#;
        let set = TaskSet::from_json_sources(&[json]).unwrap();
        assert_eq!(set.get("X1").unwrap().task_type(), "essay");
        assert_eq!(set.get("X2").unwrap().task_type(), "");
        assert!(matches!(
            set.get("X2").unwrap().body,
            TaskBody::Unknown { task_type: None }
        ));
    }

    #[test]
    fn test_duplicate_ids_across_files() {
        let other = r#"[{"id": "B1", "type": "baseline", "prompt": "again", "answer": "x"}]"#;
        let result = TaskSet::from_json_sources(&[BASELINE, other]);
        assert!(matches!(result, Err(TaskError::DuplicateId(id)) if id == "B1"));
    }

    #[test]
    fn test_schema_violation_reported() {
        let json = r#"[{"id": "B1", "type": "baseline", "prompt": "no answer"}]"#;
        let result = TaskSet::from_json_sources(&[json]);
        assert!(matches!(result, Err(TaskError::SchemaViolation(_))));
    }

    #[test]
    fn test_bad_validator_fields_are_load_errors() {
        let json = r#"[{
            "id": "C1", "type": "constraint", "prompt": "p",
            "validator": {"kind": "json_words_list", "key": "words", "list_len": "three", "word_len": 4}
        }]"#;
        let result = TaskSet::from_json_sources(&[json]);
        match result {
            Err(TaskError::InvalidTask { id, message }) => {
                assert_eq!(id, "C1");
                assert!(message.starts_with("invalid validator"));
            }
            other => panic!("expected InvalidTask, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_regex_is_load_error() {
        let json = r#"[{
            "id": "C7", "type": "constraint", "prompt": "p",
            "validator": {"kind": "json_vowel_count", "x_key": "x", "y_key": "y", "len": 5, "regex": "(["}
        }]"#;
        let result = TaskSet::from_json_sources(&[json]);
        assert!(matches!(result, Err(TaskError::InvalidTask { id, .. }) if id == "C7"));
    }

    #[test]
    fn test_raw_task_without_answer_is_invalid() {
        let raw: RawTask = serde_json::from_value(serde_json::json!({
            "id": "B9", "type": "baseline", "prompt": "p"
        }))
        .unwrap();
        match Task::from_raw(raw) {
            Err(TaskError::InvalidTask { id, message }) => {
                assert_eq!(id, "B9");
                assert_eq!(message, "missing answer");
            }
            other => panic!("expected InvalidTask, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json() {
        let result = TaskSet::from_json_sources(&["[{"]);
        assert!(matches!(result, Err(TaskError::JsonError(_))));
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("baseline_tasks.json"), BASELINE).unwrap();
        fs::write(dir.path().join("constraint_tasks.json"), CONSTRAINT).unwrap();

        let set = TaskSet::load_dir(dir.path()).unwrap();
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_load_dir_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("baseline_tasks.json"), BASELINE).unwrap();

        let result = TaskSet::load_dir(dir.path());
        match result {
            Err(TaskError::IoError { path, .. }) => {
                assert!(path.ends_with("constraint_tasks.json"))
            }
            other => panic!("expected IoError, got {:?}", other),
        }
    }
}
