//! HTTP request execution configuration.
//!
//! This module defines the options a transport is built with.

use crate::config::HarnessConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for HTTP request execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Request timeout in milliseconds.
    ///
    /// Maximum time to wait for a complete response (including connection,
    /// headers, and body download).
    pub timeout_ms: u64,

    /// Whether to follow 3xx redirects (up to 10 hops).
    pub follow_redirects: bool,

    /// Whether to validate TLS certificates.
    pub validate_ssl: bool,
}

impl ExecutionConfig {
    /// Returns the timeout as a `std::time::Duration`.
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self::from(&HarnessConfig::default())
    }
}

impl From<&HarnessConfig> for ExecutionConfig {
    fn from(config: &HarnessConfig) -> Self {
        Self {
            timeout_ms: config.timeout,
            follow_redirects: config.follow_redirects,
            validate_ssl: config.validate_ssl,
        }
    }
}
