//! Rules over the key set and literal values of a JSON object.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{json_eq, JsonObject};
use crate::types::{ErrorKind, Verdict};

/// `json_exact`: required keys, optionally no others, and literal values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonExact {
    /// Keys that must all be present
    pub required_keys: Vec<String>,

    /// Reject keys outside `required_keys`
    #[serde(default)]
    pub no_extra_keys: bool,

    /// Expected values, checked in file order
    #[serde(default)]
    pub equals: Map<String, Value>,
}

impl JsonExact {
    pub fn check(&self, obj: &JsonObject) -> Verdict {
        let mut missing: Vec<&str> = self
            .required_keys
            .iter()
            .map(String::as_str)
            .filter(|k| !obj.contains_key(*k))
            .collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            missing.dedup();
            return Verdict::fail(ErrorKind::MissingKeys, format!("Missing: {:?}", missing));
        }

        if self.no_extra_keys {
            let mut extra: Vec<&str> = obj
                .keys()
                .map(String::as_str)
                .filter(|k| !self.required_keys.iter().any(|r| r == k))
                .collect();
            if !extra.is_empty() {
                extra.sort_unstable();
                return Verdict::fail(ErrorKind::ExtraKeys, format!("Extra: {:?}", extra));
            }
        }

        for (key, expected) in &self.equals {
            // An absent key reads as null, so `"k": null` is satisfied by omission.
            let got = obj.get(key).unwrap_or(&Value::Null);
            if !json_eq(got, expected) {
                return Verdict::fail(
                    ErrorKind::ConstraintViolation,
                    format!("{} expected {}, got {}", key, expected, got),
                );
            }
        }

        Verdict::pass()
    }
}

/// `json_list_exact`: the value under `key` must deep-equal `exact`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonListExact {
    pub key: String,
    pub exact: Vec<Value>,
}

impl JsonListExact {
    pub fn check(&self, obj: &JsonObject) -> Verdict {
        let Some(items) = obj.get(&self.key) else {
            return Verdict::fail(ErrorKind::MissingKeys, format!("Missing key: {}", self.key));
        };

        let expected = Value::Array(self.exact.clone());
        if !json_eq(items, &expected) {
            return Verdict::fail(
                ErrorKind::Mismatch,
                format!("Expected {}, got {}", expected, items),
            );
        }

        Verdict::pass()
    }
}

/// `json_enum`: a string field drawn from a fixed set, alone in its object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonEnum {
    pub key: String,
    pub allowed: Vec<String>,
}

impl JsonEnum {
    pub fn check(&self, obj: &JsonObject) -> Verdict {
        let Some(value) = obj.get(&self.key) else {
            return Verdict::fail(ErrorKind::MissingKeys, format!("Missing key: {}", self.key));
        };

        let Some(value) = value.as_str() else {
            return Verdict::fail(
                ErrorKind::InvalidType,
                format!("{} must be a string", self.key),
            );
        };

        if !self.allowed.iter().any(|a| a == value) {
            return Verdict::fail(
                ErrorKind::ConstraintViolation,
                format!("{:?} not in allowed {:?}", value, self.allowed),
            );
        }

        // Counts every key in the object, whatever `key` is configured as.
        if obj.len() != 1 {
            return Verdict::fail(
                ErrorKind::ExtraKeys,
                format!("Only '{}' key is allowed", self.key),
            );
        }

        Verdict::pass()
    }
}
