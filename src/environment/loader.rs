//! Environment file loader for REST Harness
//!
//! Seeds an [`EnvironmentStore`] from a JSON file before the first test step runs.
//! Two layouts are accepted:
//!
//! - a Postman-style export: `{"name": "local", "values": [{"key": "server", "value": "http://localhost:8088", "enabled": true}]}`
//! - a flat object: `{"server": "http://localhost:8088", "org_admin_token": ""}`
//!
//! When no explicit path is configured the loader searches the working directory
//! and up to 3 parent directories for one of [`ENV_FILE_NAMES`].

use super::store::EnvironmentStore;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur during environment loading
#[derive(Debug, Clone, PartialEq)]
pub enum EnvError {
    /// Environment file was not found
    FileNotFound(PathBuf),

    /// Failed to parse JSON content
    ParseError(String),

    /// Invalid format or structure in the environment file
    InvalidFormat(String),

    /// IO error occurred while reading file
    IoError(String),
}

impl std::fmt::Display for EnvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvError::FileNotFound(path) => {
                write!(f, "Environment file not found: {}", path.display())
            }
            EnvError::ParseError(msg) => write!(f, "Failed to parse environment file: {}", msg),
            EnvError::InvalidFormat(msg) => write!(f, "Invalid environment format: {}", msg),
            EnvError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for EnvError {}

impl From<io::Error> for EnvError {
    fn from(err: io::Error) -> Self {
        EnvError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for EnvError {
    fn from(err: serde_json::Error) -> Self {
        EnvError::ParseError(err.to_string())
    }
}

/// Supported environment file names in order of preference
pub const ENV_FILE_NAMES: &[&str] = &[".harness-env.json", "harness.env.json"];

/// Maximum number of parent directories to search
const MAX_PARENT_SEARCH_DEPTH: usize = 3;

/// One entry of a Postman-style `values` array
#[derive(Debug, Deserialize)]
struct ExportedVariable {
    key: String,
    #[serde(default)]
    value: JsonValue,
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Loads variables from the file at `path` into `store`
///
/// # Returns
///
/// * `Ok(usize)` - Number of variables written to the store
/// * `Err(EnvError)` - If the file is missing, unreadable, or malformed
pub fn load_environment_file(path: &Path, store: &EnvironmentStore) -> Result<usize, EnvError> {
    if !path.is_file() {
        return Err(EnvError::FileNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let raw: JsonValue = serde_json::from_str(&content)?;
    let count = seed_from_json(store, &raw)?;

    log::info!(
        "environment: seeded {} variable(s) from {}",
        count,
        path.display()
    );
    Ok(count)
}

/// Searches `start_dir` and its parents for an environment file and loads it
///
/// Returns `Ok(0)` when no file exists, so a run without an environment file
/// simply starts with an empty store.
pub fn discover_environment(start_dir: &Path, store: &EnvironmentStore) -> Result<usize, EnvError> {
    match find_environment_file(start_dir) {
        Some(path) => load_environment_file(&path, store),
        None => {
            log::debug!(
                "environment: no environment file found from {}",
                start_dir.display()
            );
            Ok(0)
        }
    }
}

/// Finds the environment file by searching `start_dir` and parent directories
pub fn find_environment_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current_path = start_dir.to_path_buf();

    for _ in 0..=MAX_PARENT_SEARCH_DEPTH {
        for filename in ENV_FILE_NAMES {
            let candidate = current_path.join(filename);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        match current_path.parent() {
            Some(parent) => current_path = parent.to_path_buf(),
            None => break,
        }
    }

    None
}

/// Writes the variables described by `raw` into `store`
///
/// Disabled entries of an exported `values` array are skipped. Every entry is
/// validated before any is written, so on error the store is left unchanged.
pub fn seed_from_json(store: &EnvironmentStore, raw: &JsonValue) -> Result<usize, EnvError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| EnvError::InvalidFormat("Root must be a JSON object".to_string()))?;

    let variables: Vec<(String, JsonValue)> = match obj.get("values") {
        Some(values) => {
            let entries: Vec<ExportedVariable> = serde_json::from_value(values.clone())
                .map_err(|e| EnvError::InvalidFormat(format!("'values' must be a list of key/value entries: {}", e)))?;
            entries
                .into_iter()
                .filter(|e| e.enabled)
                .map(|e| (e.key, e.value))
                .collect()
        }
        None => obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
    };

    for (key, value) in &variables {
        check_scalar(key, value)?;
    }

    for (key, value) in &variables {
        store.set_json(key.clone(), value);
    }
    Ok(variables.len())
}

fn check_scalar(key: &str, value: &JsonValue) -> Result<(), EnvError> {
    match value {
        JsonValue::Array(_) | JsonValue::Object(_) => Err(EnvError::InvalidFormat(format!(
            "Variable '{}' has invalid type (must be string, number, boolean, or null)",
            key
        ))),
        _ => Ok(()),
    }
}
