//! JSON Schema validation for task files.
//!
//! Task files are validated against schema/tasks.schema.json before they
//! are parsed into typed tasks, so structural mistakes are reported with
//! their JSON pointer instead of as a bare serde error.

use std::sync::OnceLock;

const TASKS_SCHEMA_JSON: &str = include_str!("../../../../schema/tasks.schema.json");

static TASKS_VALIDATOR: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

/// The tasks schema, compiled on first use.
fn tasks_validator() -> Result<&'static jsonschema::Validator, String> {
    TASKS_VALIDATOR
        .get_or_init(|| {
            let schema: serde_json::Value = serde_json::from_str(TASKS_SCHEMA_JSON)
                .map_err(|e| format!("Tasks schema is not JSON: {}", e))?;
            jsonschema::options()
                .build(&schema)
                .map_err(|e| format!("Tasks schema does not compile: {}", e))
        })
        .as_ref()
        .map_err(Clone::clone)
}

/// Check one task file (a JSON array). Each violation is reported as
/// `<message> at <json pointer>`.
pub fn validate_task_file(tasks_json: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = tasks_validator().map_err(|e| vec![e])?;

    let errors: Vec<String> = validator
        .iter_errors(tasks_json)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        return Ok(());
    }
    Err(errors)
}
