//! Environment data model.
//!
//! An environment is a named set of string variables. The engine uses it only
//! as the source for `{{name}}` substitution.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Represents a single environment with its variables
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Environment {
    /// Identifier, assigned by the storage layer when empty
    #[serde(default)]
    pub id: String,

    /// Environment name (e.g., "dev", "staging", "production")
    #[serde(default)]
    pub name: String,

    /// Variable key-value pairs for this environment
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

impl Environment {
    /// Creates a new environment with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Gets a variable value by name
    pub fn get(&self, key: &str) -> Option<&String> {
        self.variables.get(key)
    }

    /// Sets a variable value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Returns the number of variables
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Checks if the environment has no variables
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
