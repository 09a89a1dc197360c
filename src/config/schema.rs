//! Configuration schema for the request engine.
//!
//! Defines the settings that shape the shared HTTP client and where stored
//! collections and environments live.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Engine configuration.
///
/// Read from the `"rest-engine"` section of a settings document. Missing
/// fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Request timeout in milliseconds.
    ///
    /// Covers the whole exchange from connect to the last body byte.
    /// Defaults to 30000ms (30 seconds). Must be greater than 0.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Whether to automatically follow HTTP redirects. Defaults to true.
    #[serde(default = "default_follow_redirects")]
    pub follow_redirects: bool,

    /// Maximum number of redirects to follow.
    ///
    /// Only used when `follow_redirects` is true. Defaults to 10.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,

    /// Whether to validate SSL/TLS certificates. Defaults to true.
    ///
    /// **Warning:** Disabling SSL validation can expose you to security risks.
    #[serde(default = "default_validate_ssl")]
    pub validate_ssl: bool,

    /// `User-Agent` sent when a request does not set its own.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Base directory for stored collections and environments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            follow_redirects: default_follow_redirects(),
            max_redirects: default_max_redirects(),
            validate_ssl: default_validate_ssl(),
            user_agent: default_user_agent(),
            storage_dir: None,
        }
    }
}

impl EngineConfig {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all settings are valid, or a validation error naming the
    /// offending setting.
    pub fn validate(&self) -> Result<()> {
        if self.timeout == 0 {
            return Err(EngineError::validation("timeout", "must be greater than 0"));
        }

        if self.user_agent.trim().is_empty() {
            return Err(EngineError::validation("userAgent", "must not be empty"));
        }

        // max_redirects can be 0 (no redirects), so no validation needed

        Ok(())
    }

    /// Returns the timeout as a `std::time::Duration`.
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }
}

// Default value functions for serde

fn default_timeout() -> u64 {
    30000 // 30 seconds in milliseconds
}

fn default_follow_redirects() -> bool {
    true
}

fn default_max_redirects() -> u32 {
    10
}

fn default_validate_ssl() -> bool {
    true
}

fn default_user_agent() -> String {
    concat!("rest-engine/", env!("CARGO_PKG_VERSION")).to_string()
}
