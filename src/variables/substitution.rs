//! Variable substitution engine.
//!
//! Replaces `{{name}}` placeholders with values from an [`Environment`].
//!
//! Substitution is a single left-to-right pass: a value that itself contains
//! `{{...}}` is copied into the output as-is and never re-scanned. A
//! placeholder whose name is not defined stays in the output literally. Names
//! are matched exactly, so `{{ name }}` does not match the variable `name`.

use crate::environment::Environment;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Pattern for anything that looks like a placeholder, used for diagnostics.
static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("Failed to compile placeholder regex"));

/// Substitutes `{{name}}` placeholders using the environment's variables.
///
/// Returns `text` unchanged when `environment` is `None`.
///
/// # Examples
///
/// ```
/// use rest_engine::environment::Environment;
/// use rest_engine::variables::substitute;
///
/// let mut env = Environment::new("dev");
/// env.set("p", "path");
///
/// assert_eq!(substitute("http://x/{{p}}", Some(&env)), "http://x/path");
/// assert_eq!(substitute("http://x/{{p}}", None), "http://x/{{p}}");
/// assert_eq!(substitute("{{missing}}", Some(&env)), "{{missing}}");
/// ```
pub fn substitute(text: &str, environment: Option<&Environment>) -> String {
    match environment {
        Some(env) => substitute_variables(text, &env.variables),
        None => text.to_string(),
    }
}

/// Substitutes placeholders using a plain variable map.
pub fn substitute_variables(text: &str, variables: &HashMap<String, String>) -> String {
    // Fast path: nothing to replace
    if variables.is_empty() || !text.contains("{{") {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len() + (text.len() / 4));
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        let Some(end) = after_open.find("}}") else {
            // No closing braces anywhere further on
            result.push_str(&rest[start..]);
            return result;
        };

        if let Some(value) = variables.get(&after_open[..end]) {
            result.push_str(value);
            rest = &after_open[end + 2..];
        } else {
            // Emit one brace and rescan, so "{{{{a}}" still finds "{{a}}"
            result.push('{');
            rest = &rest[start + 1..];
        }
    }

    result.push_str(rest);
    result
}

/// Lists the names of placeholders remaining in `text`, in order of
/// appearance and without duplicates.
///
/// Used after substitution to report variables the environment did not define.
pub fn unresolved_placeholders(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for cap in PLACEHOLDER_REGEX.captures_iter(text) {
        let name = &cap[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}
