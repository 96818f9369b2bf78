//! Configuration management for REST Harness.
//!
//! Settings are read from a JSON document under the `"rest-harness"` key, merged
//! with defaults, optionally overridden from process environment variables, and
//! validated. The resulting [`HarnessConfig`] is owned by whoever builds the test
//! session; there is no global configuration.

pub mod schema;

pub use schema::{ConfigError, HarnessConfig};

use crate::environment::MissingVariablePolicy;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Key under which harness settings live in a settings document.
pub const SETTINGS_KEY: &str = "rest-harness";

/// Overrides the base server URL.
pub const ENV_SERVER: &str = "HARNESS_SERVER";

/// Overrides the request timeout, in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "HARNESS_TIMEOUT_MS";

/// Overrides the missing-variable policy (`leaveAsIs`, `fail`, `empty`).
pub const ENV_MISSING_VARIABLES: &str = "HARNESS_MISSING_VARIABLES";

/// Loads configuration from a settings JSON value.
///
/// Settings that fail to deserialise are reported with a warning and the
/// defaults are used instead. The merged result is validated.
///
/// # Example
///
/// ```
/// use rest_harness::config::load_config;
/// use serde_json::json;
///
/// let settings = json!({
///     "rest-harness": {
///         "server": "http://localhost:9000",
///         "timeout": 5000
///     }
/// });
///
/// let config = load_config(Some(settings)).unwrap();
/// assert_eq!(config.timeout, 5000);
/// ```
pub fn load_config(settings_json: Option<Value>) -> Result<HarnessConfig, ConfigError> {
    let mut config = HarnessConfig::default();

    if let Some(settings) = settings_json {
        if let Some(harness_settings) = settings.get(SETTINGS_KEY) {
            match serde_json::from_value::<HarnessConfig>(harness_settings.clone()) {
                Ok(user_config) => config = user_config,
                Err(e) => {
                    log::warn!(
                        "Failed to parse {} settings: {}. Using defaults.",
                        SETTINGS_KEY,
                        e
                    );
                }
            }
        }
    }

    config.validate()?;
    Ok(config)
}

/// Loads configuration from a JSON settings file.
pub fn load_config_file(path: &Path) -> Result<HarnessConfig, ConfigError> {
    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
    let settings: Value = serde_json::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
    load_config(Some(settings))
}

impl HarnessConfig {
    /// Applies `HARNESS_*` process environment overrides and re-validates.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(server) = lookup(ENV_SERVER) {
            self.server = server;
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT_MS) {
            self.timeout = timeout.trim().parse().map_err(|_| {
                ConfigError::InvalidValue(format!("{} must be a number, got '{}'", ENV_TIMEOUT_MS, timeout))
            })?;
        }

        if let Some(policy) = lookup(ENV_MISSING_VARIABLES) {
            self.missing_variables = serde_json::from_value::<MissingVariablePolicy>(
                Value::String(policy.trim().to_string()),
            )
            .map_err(|_| {
                ConfigError::InvalidValue(format!(
                    "{} must be one of leaveAsIs, fail, empty; got '{}'",
                    ENV_MISSING_VARIABLES, policy
                ))
            })?;
        }

        self.validate()?;
        Ok(self)
    }
}
