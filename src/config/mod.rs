//! Configuration loading for the request engine.
//!
//! Configuration is read from the `"rest-engine"` key of a settings document
//! and merged with defaults. The resulting [`EngineConfig`] is passed
//! explicitly to the engine, executor and storage; nothing is kept globally.

pub mod schema;

pub use schema::EngineConfig;

use crate::error::{EngineError, Result};
use log::warn;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Settings key holding the engine configuration.
pub const SETTINGS_KEY: &str = "rest-engine";

/// Loads configuration from a settings document.
///
/// A missing `"rest-engine"` section yields the defaults. A section that
/// cannot be decoded is logged and replaced by the defaults.
///
/// # Arguments
///
/// * `settings_json` - Optional JSON value containing settings under the `"rest-engine"` key
///
/// # Returns
///
/// `Ok(EngineConfig)` with the loaded configuration, or a validation error.
///
/// # Example
///
/// ```
/// use rest_engine::config::load_config;
/// use serde_json::json;
///
/// let settings = json!({
///     "rest-engine": {
///         "timeout": 60000,
///         "validateSsl": false
///     }
/// });
///
/// let config = load_config(Some(settings)).unwrap();
/// assert_eq!(config.timeout, 60000);
/// assert!(!config.validate_ssl);
/// ```
pub fn load_config(settings_json: Option<Value>) -> Result<EngineConfig> {
    let config = match settings_section(settings_json) {
        Some(section) => serde_json::from_value::<EngineConfig>(section).unwrap_or_else(|e| {
            warn!("Failed to parse {} settings: {}. Using defaults.", SETTINGS_KEY, e);
            EngineConfig::default()
        }),
        None => EngineConfig::default(),
    };

    config.validate()?;
    Ok(config)
}

/// Loads configuration from a JSON settings file.
///
/// Unlike [`load_config`], a `"rest-engine"` section that cannot be decoded
/// is a validation error on field `rest-engine`.
pub fn load_config_file(path: &Path) -> Result<EngineConfig> {
    let content = fs::read_to_string(path).map_err(|source| EngineError::Storage {
        path: path.display().to_string(),
        source,
    })?;

    let settings: Value = serde_json::from_str(&content)?;

    let config = match settings_section(Some(settings)) {
        Some(section) => serde_json::from_value::<EngineConfig>(section)
            .map_err(|e| EngineError::validation(SETTINGS_KEY, e.to_string()))?,
        None => EngineConfig::default(),
    };

    config.validate()?;
    Ok(config)
}

fn settings_section(settings_json: Option<Value>) -> Option<Value> {
    settings_json.and_then(|mut settings| settings.get_mut(SETTINGS_KEY).map(Value::take))
}
