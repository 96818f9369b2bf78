//! Configuration schema for REST Harness.
//!
//! This module defines the settings of a test run and their validation.

use crate::environment::MissingVariablePolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Errors reported by [`HarnessConfig::validate`] and configuration loading.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Settings could not be deserialised.
    ParseError(String),

    /// A setting has a value outside its allowed range.
    InvalidValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Failed to parse configuration: {}", msg),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings for one test run.
///
/// Every field has a default, so a partial settings object is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarnessConfig {
    /// Base URL of the API under test.
    ///
    /// Relative request URLs are appended to it unless the environment store
    /// holds a `server` variable, which takes precedence.
    #[serde(default = "default_server")]
    pub server: String,

    /// Request timeout in milliseconds. Must be greater than 0.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Whether the transport follows 3xx redirects.
    #[serde(default = "default_follow_redirects")]
    pub follow_redirects: bool,

    /// Whether to validate TLS certificates.
    #[serde(default = "default_validate_ssl")]
    pub validate_ssl: bool,

    /// What substitution does with placeholders whose variable is unset.
    #[serde(default)]
    pub missing_variables: MissingVariablePolicy,

    /// Environment file used to seed the store. When unset, the working
    /// directory and its parents are searched.
    #[serde(default)]
    pub environment_file: Option<String>,

    /// Headers added to every request that does not set them itself.
    #[serde(default = "default_headers")]
    pub default_headers: BTreeMap<String, String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            timeout: default_timeout(),
            follow_redirects: default_follow_redirects(),
            validate_ssl: default_validate_ssl(),
            missing_variables: MissingVariablePolicy::default(),
            environment_file: None,
            default_headers: default_headers(),
        }
    }
}

impl HarnessConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout == 0 {
            return Err(ConfigError::InvalidValue(
                "timeout must be greater than 0".to_string(),
            ));
        }

        let server = Url::parse(&self.server).map_err(|e| {
            ConfigError::InvalidValue(format!("server '{}' is not a valid URL: {}", self.server, e))
        })?;
        if server.scheme() != "http" && server.scheme() != "https" {
            return Err(ConfigError::InvalidValue(format!(
                "server must use http or https, got '{}'",
                server.scheme()
            )));
        }

        Ok(())
    }
}

// Default value functions for serde

fn default_server() -> String {
    "http://localhost:8088".to_string()
}

fn default_timeout() -> u64 {
    30000
}

fn default_follow_redirects() -> bool {
    true
}

fn default_validate_ssl() -> bool {
    true
}

fn default_headers() -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert("Accept".to_string(), "application/json".to_string());
    headers
}
