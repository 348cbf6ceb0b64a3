//! Rules that read the output as plain text.

use serde::Deserialize;

use crate::types::{ErrorKind, Verdict};

/// `raw_exact_no_spaces`: the output must be exactly `exact` and contain
/// no space character. Trailing newlines are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawExactNoSpaces {
    /// Literal the output must equal
    pub exact: String,
}

impl RawExactNoSpaces {
    pub fn check(&self, output: &str) -> Verdict {
        let raw = output.trim_end_matches('\n');

        if raw.contains(' ') {
            return Verdict::fail_bare(ErrorKind::HasSpaces);
        }

        if raw == self.exact {
            return Verdict::pass();
        }

        Verdict::fail(
            ErrorKind::Mismatch,
            format!("Expected exact {:?}, got {:?}", self.exact, raw),
        )
    }
}
