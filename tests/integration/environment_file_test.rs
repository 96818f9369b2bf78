//! Environment files feeding a session
//!
//! These tests verify discovery, exported-environment loading and the way
//! loaded variables drive request resolution.

use rest_harness::config::{load_config_file, HarnessConfig};
use rest_harness::environment::{
    discover_environment, find_environment_file, load_environment_file, Binding, EnvError,
};
use rest_harness::models::RequestTemplate;
use rest_harness::{EnvironmentStore, MissingVariablePolicy, TestSession};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create an environment file
fn write_file(dir: &TempDir, relative: &str, content: &str) -> PathBuf {
    let path = dir.path().join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create directories");
    }
    fs::write(&path, content).expect("Failed to write test file");
    path
}

const EXPORTED_ENVIRONMENT: &str = r#"{
    "id": "5b4a1f8e",
    "name": "local",
    "values": [
        {"key": "server", "value": "http://127.0.0.1:8088", "enabled": true},
        {"key": "org_member_token", "value": "member-token", "enabled": true},
        {"key": "last_org_id", "value": "", "enabled": true},
        {"key": "stale_token", "value": "old", "enabled": false}
    ]
}"#;

#[test]
fn test_exported_environment_resolves_requests() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(&temp_dir, "local.postman_environment.json", EXPORTED_ENVIRONMENT);

    let config = HarnessConfig {
        environment_file: Some(path.to_string_lossy().into_owned()),
        ..Default::default()
    };
    let session = TestSession::from_config(&config).unwrap();

    assert!(!session.store().contains("stale_token"));
    assert_eq!(session.store().get("last_org_id").as_deref(), Some(""));

    let template = RequestTemplate::get("/organizations/{{last_org_id}}/events")
        .bearer("org_member_token");
    let request = session.resolve(&template).unwrap();
    assert_eq!(request.url(), "http://127.0.0.1:8088/organizations//events");
    assert_eq!(request.header("Authorization"), Some("Bearer member-token"));
}

#[test]
fn test_discovery_walks_up_from_nested_directory() {
    let temp_dir = TempDir::new().unwrap();
    write_file(&temp_dir, ".harness-env.json", r#"{"org_admin_token": "admin"}"#);
    let nested = temp_dir.path().join("suites").join("events");
    fs::create_dir_all(&nested).unwrap();

    assert_eq!(
        find_environment_file(&nested),
        Some(temp_dir.path().join(".harness-env.json"))
    );

    let store = EnvironmentStore::new();
    assert_eq!(discover_environment(&nested, &store).unwrap(), 1);
    assert_eq!(store.get("org_admin_token").as_deref(), Some("admin"));
}

#[test]
fn test_null_and_scalar_values() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(
        &temp_dir,
        "env.json",
        r#"{"last_venue_id": null, "limit": 50, "is_private": false}"#,
    );

    let store = EnvironmentStore::new();
    assert_eq!(load_environment_file(&path, &store).unwrap(), 3);
    assert_eq!(store.binding("last_venue_id"), Some(Binding::Null));
    assert_eq!(store.get("limit").as_deref(), Some("50"));
    assert_eq!(
        rest_harness::substitute_variables("{{last_venue_id}}/{{is_private}}", &store).unwrap(),
        "null/false"
    );
}

#[test]
fn test_nested_values_are_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(&temp_dir, "env.json", r#"{"ids": [1, 2, 3]}"#);

    let result = load_environment_file(&path, &EnvironmentStore::new());
    assert!(matches!(result, Err(EnvError::InvalidFormat(_))));
}

#[test]
fn test_config_file_sets_missing_variable_policy() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(
        &temp_dir,
        "harness.json",
        r#"{"rest-harness": {"server": "http://localhost:9000", "missingVariables": "fail"}}"#,
    );

    let config = load_config_file(&path).unwrap();
    assert_eq!(config.server, "http://localhost:9000");
    assert_eq!(config.missing_variables, MissingVariablePolicy::Fail);

    let store = EnvironmentStore::with_policy(config.missing_variables);
    assert!(rest_harness::substitute_variables("{{absent}}", &store).is_err());
}
