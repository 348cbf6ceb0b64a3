//! Rules over the lengths and contents of string and list fields.

use serde::Deserialize;

use super::patterns::char_len;
use super::{as_integer, missing_pair, JsonObject};
use crate::types::{ErrorKind, Verdict};

/// `json_words_list`: a list of exactly `list_len` strings, each exactly
/// `word_len` characters long.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonWordsList {
    pub key: String,
    pub list_len: usize,
    pub word_len: usize,
}

impl JsonWordsList {
    pub fn check(&self, obj: &JsonObject) -> Verdict {
        let Some(words) = obj.get(&self.key) else {
            return Verdict::fail(ErrorKind::MissingKeys, format!("Missing key: {}", self.key));
        };

        let Some(words) = words.as_array() else {
            return Verdict::fail(ErrorKind::InvalidType, format!("{} must be a list", self.key));
        };

        if words.len() != self.list_len {
            return Verdict::fail(
                ErrorKind::CountMismatch,
                format!("Expected {} words, got {}", self.list_len, words.len()),
            );
        }

        for word in words {
            let Some(word) = word.as_str() else {
                return Verdict::fail(ErrorKind::InvalidType, "All words must be strings");
            };
            let len = char_len(word);
            if len != self.word_len {
                return Verdict::fail(
                    ErrorKind::ConstraintViolation,
                    format!("Word {:?} length {} != {}", word, len, self.word_len),
                );
            }
        }

        Verdict::pass()
    }
}

/// `json_string_forbidden_chars`: a string field containing none of the
/// listed characters (or substrings).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonStringForbiddenChars {
    pub key: String,

    #[serde(default)]
    pub forbidden_chars: Vec<String>,
}

impl JsonStringForbiddenChars {
    pub fn check(&self, obj: &JsonObject) -> Verdict {
        let Some(text) = obj.get(&self.key) else {
            return Verdict::fail(ErrorKind::MissingKeys, format!("Missing key: {}", self.key));
        };

        let Some(text) = text.as_str() else {
            return Verdict::fail(
                ErrorKind::InvalidType,
                format!("{} must be a string", self.key),
            );
        };

        if let Some(found) = self.forbidden_chars.iter().find(|c| text.contains(c.as_str())) {
            return Verdict::fail(
                ErrorKind::ForbiddenToken,
                format!("Found forbidden char {:?}", found),
            );
        }

        Verdict::pass()
    }
}

/// `json_crossfield_charcount`: an integer field that states the character
/// length of a string field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonCrossfieldCharcount {
    pub text_key: String,
    pub count_key: String,
}

impl JsonCrossfieldCharcount {
    pub fn check(&self, obj: &JsonObject) -> Verdict {
        if let Some(verdict) = missing_pair(obj, &self.text_key, &self.count_key) {
            return verdict;
        }

        let text = obj.get(&self.text_key).and_then(|v| v.as_str());
        let count = obj.get(&self.count_key).and_then(as_integer);
        let (Some(text), Some(count)) = (text, count) else {
            return Verdict::fail(
                ErrorKind::InvalidType,
                "text must be string; count must be int",
            );
        };

        let true_count = char_len(text);
        if count != true_count as i128 {
            return Verdict::fail(
                ErrorKind::CountMismatch,
                format!("count={} but len(text)={}", count, true_count),
            );
        }

        Verdict::pass()
    }
}
