//! Verdict types shared by every validation rule.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification attached to every verdict.
///
/// `Pass` is the only kind carried by a passing verdict; every other
/// kind names the first check that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Pass,
    InvalidJson,
    InvalidType,
    MissingKeys,
    ExtraKeys,
    ConstraintViolation,
    CountMismatch,
    Mismatch,
    WrongAnswer,
    HasSpaces,
    ForbiddenToken,
    InconsistentFields,
    UnknownValidator,
    UnknownTaskType,
}

impl ErrorKind {
    /// Every kind, in declaration order.
    pub const ALL: [ErrorKind; 14] = [
        ErrorKind::Pass,
        ErrorKind::InvalidJson,
        ErrorKind::InvalidType,
        ErrorKind::MissingKeys,
        ErrorKind::ExtraKeys,
        ErrorKind::ConstraintViolation,
        ErrorKind::CountMismatch,
        ErrorKind::Mismatch,
        ErrorKind::WrongAnswer,
        ErrorKind::HasSpaces,
        ErrorKind::ForbiddenToken,
        ErrorKind::InconsistentFields,
        ErrorKind::UnknownValidator,
        ErrorKind::UnknownTaskType,
    ];

    /// The log/wire name, e.g. `"MISSING_KEYS"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Pass => "PASS",
            ErrorKind::InvalidJson => "INVALID_JSON",
            ErrorKind::InvalidType => "INVALID_TYPE",
            ErrorKind::MissingKeys => "MISSING_KEYS",
            ErrorKind::ExtraKeys => "EXTRA_KEYS",
            ErrorKind::ConstraintViolation => "CONSTRAINT_VIOLATION",
            ErrorKind::CountMismatch => "COUNT_MISMATCH",
            ErrorKind::Mismatch => "MISMATCH",
            ErrorKind::WrongAnswer => "WRONG_ANSWER",
            ErrorKind::HasSpaces => "HAS_SPACES",
            ErrorKind::ForbiddenToken => "FORBIDDEN_TOKEN",
            ErrorKind::InconsistentFields => "INCONSISTENT_FIELDS",
            ErrorKind::UnknownValidator => "UNKNOWN_VALIDATOR",
            ErrorKind::UnknownTaskType => "UNKNOWN_TASK_TYPE",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of validating one output against one task.
///
/// Build verdicts with [`Verdict::pass`] and [`Verdict::fail`] so that
/// `passed` and `error == Pass` always agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the output satisfied the task
    pub passed: bool,

    /// `Pass`, or the first failing check
    pub error: ErrorKind,

    /// Human-readable elaboration; not meant to be parsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Verdict {
    /// A passing verdict.
    pub fn pass() -> Self {
        Self {
            passed: true,
            error: ErrorKind::Pass,
            detail: None,
        }
    }

    /// A failing verdict with a detail message.
    ///
    /// Passing `ErrorKind::Pass` here is a logic error; it is demoted to
    /// a passing verdict so the invariant still holds.
    pub fn fail(error: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            passed: error == ErrorKind::Pass,
            error,
            detail: Some(detail.into()),
        }
    }

    /// A failing verdict without detail.
    pub fn fail_bare(error: ErrorKind) -> Self {
        Self {
            passed: error == ErrorKind::Pass,
            error,
            detail: None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed {
            return f.write_str("PASS");
        }
        match &self.detail {
            Some(detail) => write!(f, "FAIL ({}) - {}", self.error, detail),
            None => write!(f, "FAIL ({})", self.error),
        }
    }
}
