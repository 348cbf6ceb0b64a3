//! Rules where one field must agree with a value derived from another.

use regex::Regex;
use serde::Deserialize;

use super::patterns::{all_unique, char_len, digit_run, vowel_count, StartPattern};
use super::{as_integer, missing_pair, JsonObject};
use crate::types::{ErrorKind, Verdict};

/// `json_vowel_count`: `x` is a word of length `len` (optionally matching
/// `regex` at its start) and `y` is its vowel count.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonVowelCount {
    pub x_key: String,
    pub y_key: String,
    pub len: usize,

    #[serde(default)]
    pub regex: Option<StartPattern>,
}

impl JsonVowelCount {
    pub fn check(&self, obj: &JsonObject) -> Verdict {
        if let Some(verdict) = missing_pair(obj, &self.x_key, &self.y_key) {
            return verdict;
        }

        let x = obj.get(&self.x_key).and_then(|v| v.as_str());
        let y = obj.get(&self.y_key).and_then(as_integer);
        let (Some(x), Some(y)) = (x, y) else {
            return Verdict::fail(ErrorKind::InvalidType, "x must be string; y must be int");
        };

        let len = char_len(x);
        if len != self.len {
            return Verdict::fail(
                ErrorKind::ConstraintViolation,
                format!("x length {} != {}", len, self.len),
            );
        }

        if let Some(pattern) = &self.regex {
            if !pattern.matches_start(x) {
                return Verdict::fail(ErrorKind::ConstraintViolation, "x fails regex");
            }
        }

        let true_y = vowel_count(x);
        if y != true_y as i128 {
            return Verdict::fail(
                ErrorKind::CountMismatch,
                format!("y={} but vowel_count(x)={}", y, true_y),
            );
        }

        Verdict::pass()
    }
}

#[derive(Deserialize)]
struct DigitSumFields {
    id_key: String,
    sum_key: String,
    digits: usize,
}

/// `json_digit_sum`: `id` is exactly `digits` ASCII digits and `sum` is
/// the sum of those digits.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "DigitSumFields")]
pub struct JsonDigitSum {
    pub id_key: String,
    pub sum_key: String,
    pub digits: usize,
    pattern: Regex,
}

impl TryFrom<DigitSumFields> for JsonDigitSum {
    type Error = regex::Error;

    fn try_from(fields: DigitSumFields) -> Result<Self, Self::Error> {
        Self::new(fields.id_key, fields.sum_key, fields.digits)
    }
}

impl PartialEq for JsonDigitSum {
    fn eq(&self, other: &Self) -> bool {
        self.id_key == other.id_key && self.sum_key == other.sum_key && self.digits == other.digits
    }
}

impl JsonDigitSum {
    pub fn new(
        id_key: impl Into<String>,
        sum_key: impl Into<String>,
        digits: usize,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            id_key: id_key.into(),
            sum_key: sum_key.into(),
            digits,
            pattern: digit_run(digits)?,
        })
    }

    pub fn check(&self, obj: &JsonObject) -> Verdict {
        if let Some(verdict) = missing_pair(obj, &self.id_key, &self.sum_key) {
            return verdict;
        }

        let id = obj.get(&self.id_key).and_then(|v| v.as_str());
        let total = obj.get(&self.sum_key).and_then(as_integer);
        let (Some(id), Some(total)) = (id, total) else {
            return Verdict::fail(ErrorKind::InvalidType, "id must be string; sum must be int");
        };

        if !self.pattern.is_match(id) {
            return Verdict::fail(
                ErrorKind::ConstraintViolation,
                format!("id must be exactly {} digits", self.digits),
            );
        }

        let true_total: u32 = id.chars().filter_map(|c| c.to_digit(10)).sum();
        if total != i128::from(true_total) {
            return Verdict::fail(
                ErrorKind::CountMismatch,
                format!("sum={} but digit_sum(id)={}", total, true_total),
            );
        }

        Verdict::pass()
    }
}

/// `json_unique_letters`: `letters` has length `len` (optionally matching
/// `regex` at its start) and `unique` says whether it repeats no character.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonUniqueLetters {
    pub letters_key: String,
    pub unique_key: String,
    pub len: usize,

    #[serde(default)]
    pub regex: Option<StartPattern>,
}

impl JsonUniqueLetters {
    pub fn check(&self, obj: &JsonObject) -> Verdict {
        if let Some(verdict) = missing_pair(obj, &self.letters_key, &self.unique_key) {
            return verdict;
        }

        let letters = obj.get(&self.letters_key).and_then(|v| v.as_str());
        let unique = obj.get(&self.unique_key).and_then(|v| v.as_bool());
        let (Some(letters), Some(unique)) = (letters, unique) else {
            return Verdict::fail(
                ErrorKind::InvalidType,
                "letters must be string; unique must be boolean",
            );
        };

        let len = char_len(letters);
        if len != self.len {
            return Verdict::fail(
                ErrorKind::ConstraintViolation,
                format!("letters length {} != {}", len, self.len),
            );
        }

        if let Some(pattern) = &self.regex {
            if !pattern.matches_start(letters) {
                return Verdict::fail(ErrorKind::ConstraintViolation, "letters fails regex");
            }
        }

        let true_unique = all_unique(letters);
        if unique != true_unique {
            return Verdict::fail(
                ErrorKind::InconsistentFields,
                format!("unique={} but all_unique={}", unique, true_unique),
            );
        }

        Verdict::pass()
    }
}
