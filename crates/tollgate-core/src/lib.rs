//! # tollgate-core
//!
//! Deterministic answer validation for constraint-audited CAPTCHA tasks.
//!
//! This crate answers one question: does this output satisfy this task?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same task and output always produce the same verdict
//! 2. **Total**: Every string input yields a [`Verdict`]; malformed output is a
//!    failing verdict, never a panic or an `Err`
//! 3. **Pure**: `validate` performs no I/O and no logging
//! 4. **Typed up front**: Validator specs are parsed (and regexes compiled)
//!    when tasks are loaded, not on every call
//!
//! ## Example
//!
//! ```rust,ignore
//! use tollgate_core::{validate, ErrorKind, TaskSet};
//!
//! let tasks = TaskSet::load_dir("tasks")?;
//! let task = tasks.get("C3").unwrap();
//! let verdict = validate(task, r#"{"s": "hello", "n": 4}"#);
//!
//! assert_eq!(verdict.error, ErrorKind::CountMismatch);
//! ```

pub mod rules;
pub mod task;
pub mod types;

// Re-export main types at crate root
pub use rules::ValidatorSpec;
pub use task::{Task, TaskBody, TaskError, TaskSet};
pub use types::{ErrorKind, Verdict};

/// Validate a candidate output against a task.
///
/// This is the main entry point for Tollgate validation.
///
/// # Arguments
///
/// * `task` - The task the output was produced for
/// * `output` - Raw candidate text; may or may not be JSON
///
/// # Returns
///
/// A [`Verdict`] whose `error` is `Pass` or the first failing check.
pub fn validate(task: &Task, output: &str) -> Verdict {
    match &task.body {
        TaskBody::Baseline { answer } => validate_baseline(answer, output),
        TaskBody::Constraint { validator } => validator.check(output),
        TaskBody::Unknown { task_type } => Verdict::fail(
            ErrorKind::UnknownTaskType,
            format!(
                "Unknown task type: {}",
                task_type.as_deref().unwrap_or("<none>")
            ),
        ),
    }
}

/// Exact match after dropping trailing newlines from the output only.
fn validate_baseline(expected: &str, output: &str) -> Verdict {
    let got = output.trim_end_matches('\n');
    if got == expected {
        return Verdict::pass();
    }
    Verdict::fail(
        ErrorKind::WrongAnswer,
        format!("Expected {:?}, got {:?}", expected, got),
    )
}
