//! Compiled patterns shared by the validation rules.
//!
//! User-supplied regexes are compiled once when a task is loaded, never
//! while validating an output.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    /// ASCII vowels, both cases.
    static ref VOWEL_PATTERN: Regex = Regex::new(r"[aeiouAEIOU]").unwrap();
}

/// Count ASCII vowels (`aeiouAEIOU`) in `text`.
pub fn vowel_count(text: &str) -> usize {
    VOWEL_PATTERN.find_iter(text).count()
}

/// Number of Unicode scalar values in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// True when no character occurs twice in `text`.
pub fn all_unique(text: &str) -> bool {
    let mut seen = std::collections::HashSet::new();
    text.chars().all(|c| seen.insert(c))
}

/// A regex that must match at the start of the candidate string.
///
/// The pattern is not required to consume the whole input: `"[a-z]"`
/// accepts `"abc1"`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StartPattern {
    source: String,
    compiled: Regex,
}

impl StartPattern {
    /// Compile `source`, anchored at the start of input.
    pub fn new(source: impl Into<String>) -> Result<Self, regex::Error> {
        let source = source.into();
        let compiled = Regex::new(&format!("^(?:{})", source))?;
        Ok(Self { source, compiled })
    }

    /// Whether the pattern matches at position zero of `text`.
    pub fn matches_start(&self, text: &str) -> bool {
        self.compiled.is_match(text)
    }

    /// The pattern as written in the task file.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl TryFrom<String> for StartPattern {
    type Error = regex::Error;

    fn try_from(source: String) -> Result<Self, Self::Error> {
        Self::new(source)
    }
}

impl From<StartPattern> for String {
    fn from(pattern: StartPattern) -> Self {
        pattern.source
    }
}

impl PartialEq for StartPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Debug for StartPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StartPattern").field(&self.source).finish()
    }
}

/// Full-match pattern for a run of exactly `digits` ASCII digits.
pub fn digit_run(digits: usize) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^[0-9]{{{}}}$", digits))
}
