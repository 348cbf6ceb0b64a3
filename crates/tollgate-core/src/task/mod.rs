//! Task loading and validation.
//!
//! Task files are JSON arrays validated against an embedded JSON Schema,
//! then parsed into typed tasks. Validator specs are fully typed (and their
//! regexes compiled) here, once, rather than on every validation call.

mod parser;
mod schema;

pub use parser::{Task, TaskBody, TaskError, TaskSet, TASK_FILES};
pub use schema::validate_task_file;
