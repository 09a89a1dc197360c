//! Environment file loader.
//!
//! Reads a single environment document from disk. Variable values may be
//! written as JSON strings, numbers or booleans; all of them are stored as
//! strings because substitution is purely textual.

use super::models::Environment;
use crate::error::{EngineError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Loads an environment from a JSON file.
///
/// # Arguments
///
/// * `path` - Path to a document of the form `{"id", "name", "variables": {...}}`
///
/// # Returns
///
/// * `Ok(Environment)` - The parsed environment
/// * `Err(EngineError)` - If the file cannot be read or has an invalid shape
pub fn load_environment_file(path: &Path) -> Result<Environment> {
    let content = fs::read_to_string(path).map_err(|source| EngineError::Storage {
        path: path.display().to_string(),
        source,
    })?;

    let raw: Value = serde_json::from_str(&content)?;
    parse_environment(raw)
}

/// Converts a raw JSON document into an [`Environment`].
pub fn parse_environment(raw: Value) -> Result<Environment> {
    let obj = raw
        .as_object()
        .ok_or_else(|| EngineError::validation("environment", "root must be a JSON object"))?;

    let id = optional_string(obj.get("id"), "id")?;
    let name = optional_string(obj.get("name"), "name")?;
    let variables = match obj.get("variables") {
        Some(Value::Null) | None => HashMap::new(),
        Some(value) => parse_variable_map(value)?,
    };

    Ok(Environment {
        id,
        name,
        variables,
    })
}

fn optional_string(value: Option<&Value>, field: &str) -> Result<String> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(EngineError::validation(field, "must be a string")),
    }
}

/// Parses a JSON value into a variable map (HashMap<String, String>)
fn parse_variable_map(value: &Value) -> Result<HashMap<String, String>> {
    let obj = value
        .as_object()
        .ok_or_else(|| EngineError::validation("variables", "must be a JSON object"))?;

    let mut map = HashMap::with_capacity(obj.len());

    for (key, val) in obj.iter() {
        let value_str = match val {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
            _ => {
                return Err(EngineError::validation(
                    format!("variables.{}", key),
                    "must be a string, number, or boolean",
                ));
            }
        };

        map.insert(key.clone(), value_str);
    }

    Ok(map)
}
