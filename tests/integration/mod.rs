//! Integration tests module for the harness
//!
//! Shared helpers for tests that run a [`TestSession`] against a local
//! wiremock server.

pub mod environment_file_test;
pub mod naughty_strings_test;
pub mod request_flow_test;

use rest_harness::config::HarnessConfig;
use rest_harness::executor::{ExecutionConfig, ReqwestTransport};
use rest_harness::{EnvironmentStore, TestSession};
use serde_json::Value as JsonValue;
use std::sync::Once;
use wiremock::MockServer;

static INIT: Once = Once::new();

/// Initialize test environment (run once)
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Session sending real HTTP requests to `server`.
pub fn session_for(server: &MockServer, store: EnvironmentStore) -> TestSession {
    init_test_env();
    let config = HarnessConfig {
        server: server.uri(),
        ..Default::default()
    };
    let transport = ReqwestTransport::new(&ExecutionConfig::from(&config))
        .expect("Failed to build transport");
    TestSession::with_store(store, &config, transport)
}

/// Bodies of every request `server` received, parsed as JSON.
pub async fn received_json_bodies(server: &MockServer) -> Vec<JsonValue> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| !request.body.is_empty())
        .map(|request| serde_json::from_slice(&request.body).expect("Request body was not JSON"))
        .collect()
}
