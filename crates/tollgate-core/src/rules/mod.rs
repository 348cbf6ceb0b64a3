//! Constraint rules for `constraint` tasks.
//!
//! Each validator kind is one variant of [`ValidatorSpec`] holding its own
//! typed configuration. Kinds are grouped by what they inspect:
//!
//! - `raw`: the output as plain text
//! - `keys`: key sets and literal values of a JSON object
//! - `strings`: lengths and contents of string/list fields
//! - `derived`: fields that must agree with a value computed from another field
//!
//! Every JSON kind shares one precondition: the output must parse as JSON
//! and the parsed value must be an object. It runs once, before any
//! kind-specific check.

mod derived;
mod keys;
pub mod patterns;
mod raw;
mod strings;

pub use derived::{JsonDigitSum, JsonUniqueLetters, JsonVowelCount};
pub use keys::{JsonEnum, JsonExact, JsonListExact};
pub use raw::RawExactNoSpaces;
pub use strings::{JsonCrossfieldCharcount, JsonStringForbiddenChars, JsonWordsList};

use serde::de::Error as _;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::types::{ErrorKind, Verdict};

/// JSON object as seen by the rules.
pub type JsonObject = Map<String, Value>;

/// Typed configuration for one constraint task.
///
/// Built once when the task is loaded. Kinds outside the fixed set are kept
/// as [`ValidatorSpec::Unknown`] so that loading never fails on them; they
/// fail at validation time with `UNKNOWN_VALIDATOR`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub enum ValidatorSpec {
    RawExactNoSpaces(RawExactNoSpaces),
    JsonExact(JsonExact),
    JsonWordsList(JsonWordsList),
    JsonStringForbiddenChars(JsonStringForbiddenChars),
    JsonCrossfieldCharcount(JsonCrossfieldCharcount),
    JsonListExact(JsonListExact),
    JsonVowelCount(JsonVowelCount),
    JsonEnum(JsonEnum),
    JsonDigitSum(JsonDigitSum),
    JsonUniqueLetters(JsonUniqueLetters),
    Unknown { kind: String },
}

impl TryFrom<Value> for ValidatorSpec {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let kind = match value.get("kind") {
            Some(Value::String(kind)) => kind.clone(),
            Some(_) => return Err(serde_json::Error::custom("validator kind must be a string")),
            None => return Err(serde_json::Error::missing_field("kind")),
        };

        let spec = match kind.as_str() {
            "raw_exact_no_spaces" => Self::RawExactNoSpaces(serde_json::from_value(value)?),
            "json_exact" => Self::JsonExact(serde_json::from_value(value)?),
            "json_words_list" => Self::JsonWordsList(serde_json::from_value(value)?),
            "json_string_forbidden_chars" => {
                Self::JsonStringForbiddenChars(serde_json::from_value(value)?)
            }
            "json_crossfield_charcount" => {
                Self::JsonCrossfieldCharcount(serde_json::from_value(value)?)
            }
            "json_list_exact" => Self::JsonListExact(serde_json::from_value(value)?),
            "json_vowel_count" => Self::JsonVowelCount(serde_json::from_value(value)?),
            "json_enum" => Self::JsonEnum(serde_json::from_value(value)?),
            "json_digit_sum" => Self::JsonDigitSum(serde_json::from_value(value)?),
            "json_unique_letters" => Self::JsonUniqueLetters(serde_json::from_value(value)?),
            _ => Self::Unknown { kind },
        };

        Ok(spec)
    }
}

impl ValidatorSpec {
    /// The kind string this spec was loaded from.
    pub fn kind(&self) -> &str {
        match self {
            Self::RawExactNoSpaces(_) => "raw_exact_no_spaces",
            Self::JsonExact(_) => "json_exact",
            Self::JsonWordsList(_) => "json_words_list",
            Self::JsonStringForbiddenChars(_) => "json_string_forbidden_chars",
            Self::JsonCrossfieldCharcount(_) => "json_crossfield_charcount",
            Self::JsonListExact(_) => "json_list_exact",
            Self::JsonVowelCount(_) => "json_vowel_count",
            Self::JsonEnum(_) => "json_enum",
            Self::JsonDigitSum(_) => "json_digit_sum",
            Self::JsonUniqueLetters(_) => "json_unique_letters",
            Self::Unknown { kind } => kind,
        }
    }

    /// Check `output` against this spec.
    pub fn check(&self, output: &str) -> Verdict {
        // Only the raw kind skips the JSON object precondition
        let obj = match self {
            Self::RawExactNoSpaces(rule) => return rule.check(output),
            _ => match parse_object(output) {
                Ok(obj) => obj,
                Err(verdict) => return verdict,
            },
        };

        match self {
            Self::RawExactNoSpaces(rule) => rule.check(output),
            Self::JsonExact(rule) => rule.check(&obj),
            Self::JsonWordsList(rule) => rule.check(&obj),
            Self::JsonStringForbiddenChars(rule) => rule.check(&obj),
            Self::JsonCrossfieldCharcount(rule) => rule.check(&obj),
            Self::JsonListExact(rule) => rule.check(&obj),
            Self::JsonVowelCount(rule) => rule.check(&obj),
            Self::JsonEnum(rule) => rule.check(&obj),
            Self::JsonDigitSum(rule) => rule.check(&obj),
            Self::JsonUniqueLetters(rule) => rule.check(&obj),
            Self::Unknown { kind } => {
                Verdict::fail(ErrorKind::UnknownValidator, format!("Unknown kind: {}", kind))
            }
        }
    }
}

/// Parse `output` as a JSON object, or produce the failing verdict.
fn parse_object(output: &str) -> Result<JsonObject, Verdict> {
    let value: Value = serde_json::from_str(output)
        .map_err(|e| Verdict::fail(ErrorKind::InvalidJson, e.to_string()))?;

    match value {
        Value::Object(obj) => Ok(obj),
        _ => Err(Verdict::fail(ErrorKind::InvalidType, "Expected JSON object")),
    }
}

/// Integer view of a JSON value. Booleans and floats are not integers.
pub(crate) fn as_integer(value: &Value) -> Option<i128> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from)),
        _ => None,
    }
}

/// Deep equality where numbers compare by value, so `1` equals `1.0`.
pub(crate) fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => match (as_integer(a), as_integer(b)) {
            (Some(x), Some(y)) => x == y,
            _ => a.as_f64() == b.as_f64(),
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| json_eq(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| json_eq(x, y)))
        }
        _ => a == b,
    }
}

/// Verdict for one or two required keys that are absent.
pub(crate) fn missing_pair(obj: &JsonObject, first: &str, second: &str) -> Option<Verdict> {
    if obj.contains_key(first) && obj.contains_key(second) {
        return None;
    }
    Some(Verdict::fail(
        ErrorKind::MissingKeys,
        format!("Need keys: {}, {}", first, second),
    ))
}
