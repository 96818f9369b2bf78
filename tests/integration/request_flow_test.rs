//! Multi-step request flows against a mock API
//!
//! These tests verify that values captured by one step reach the URL, headers
//! and body of later steps, and that failures leave the store untouched.

use super::{received_json_bodies, session_for};
use rest_harness::config::HarnessConfig;
use rest_harness::executor::{ExecutionConfig, ReqwestTransport};
use rest_harness::fixtures::{self, NewUser};
use rest_harness::models::RequestTemplate;
use rest_harness::variables::Capture;
use rest_harness::{EnvironmentStore, HarnessError, MissingVariablePolicy, TestSession};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_event_fans_with_admin_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events/e-1/fans"))
        .and(header("Authorization", "Bearer admin-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"user_id": "u-1", "email": "fan1@tari.com"},
                {"user_id": "u-2", "email": "fan2@tari.com"}
            ],
            "paging": {"page": 0, "limit": 100, "total": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = EnvironmentStore::from_variables([
        ("org_admin_token", "admin-token"),
        ("last_event_id", "e-1"),
    ]);
    let session = session_for(&server, store);

    let template = RequestTemplate::get("/events/{{last_event_id}}/fans").bearer("org_admin_token");
    let response = session.send(&template).await.unwrap();

    assert_eq!(response.status_code, 200);
    let json = response.json().unwrap();
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
    assert_eq!(json["paging"]["total"], 2);
}

#[tokio::test]
async fn test_login_then_authenticated_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .and(body_partial_json(json!({"email": "admin@test.com"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "jwt-1", "refresh_token": "r-1"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/organizations"))
        .and(header("Authorization", "Bearer jwt-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server, EnvironmentStore::new());

    fixtures::login(&session, "admin@test.com", "itsasecret", "org_admin_token")
        .await
        .unwrap();

    let response = session
        .send(&RequestTemplate::get("/organizations").bearer("org_admin_token"))
        .await
        .unwrap();
    assert_eq!(response.status_code, 200);
}

#[tokio::test]
async fn test_captures_flow_into_event_creation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "user-9"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/organizations"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "org-3"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/venues"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "venue-4"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/events"))
        .and(header("Authorization", "Bearer member"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "evt-5"})))
        .mount(&server)
        .await;

    let session = session_for(&server, EnvironmentStore::new());
    session.store().set("org_member_token", "member");

    let user_id = fixtures::register(&session, &NewUser::unique("Mike", "Surname"))
        .await
        .unwrap();
    assert_eq!(user_id, "user-9");

    let organization = RequestTemplate::post("/organizations").json_body(json!({
        "owner_user_id": "{{last_user_id}}",
        "name": "Organization"
    }));
    session
        .send_and_capture(&organization, &[Capture::json("last_org_id", "$.id").unwrap()])
        .await
        .unwrap();

    let venue = RequestTemplate::post("/venues").json_body(json!({
        "organization_id": "{{last_org_id}}",
        "name": "Venue"
    }));
    session
        .send_and_capture(&venue, &[Capture::json("last_venue_id", "$.id").unwrap()])
        .await
        .unwrap();

    let event_id = fixtures::create_event(&session, "last_event_id", "Sunday jam")
        .await
        .unwrap();
    assert_eq!(event_id, "evt-5");

    let bodies = received_json_bodies(&server).await;
    assert_eq!(bodies.len(), 4);
    assert_eq!(bodies[1]["owner_user_id"], "user-9");
    assert_eq!(bodies[2]["organization_id"], "org-3");
    assert_eq!(bodies[3]["organization_id"], "org-3");
    assert_eq!(bodies[3]["venue_id"], "venue-4");
    assert_eq!(bodies[3]["name"], "Sunday jam");
}

#[tokio::test]
async fn test_failed_step_leaves_store_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/events"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"error": "Validation failed"})),
        )
        .mount(&server)
        .await;

    let store = EnvironmentStore::from_variables([("last_event_id", "previous")]);
    let session = session_for(&server, store);

    let result = fixtures::create_event(&session, "last_event_id", "Rejected").await;

    match result {
        Err(HarnessError::UnexpectedStatus { status, body }) => {
            assert_eq!(status, 422);
            assert!(body.contains("Validation failed"));
        }
        other => panic!("Expected UnexpectedStatus, got {:?}", other),
    }
    assert_eq!(session.store().get("last_event_id").unwrap(), "previous");
}

#[tokio::test]
async fn test_missing_variable_fails_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = EnvironmentStore::with_policy(MissingVariablePolicy::Fail);
    let session = session_for(&server, store);

    let result = session
        .send(&RequestTemplate::get("/events/{{last_event_id}}"))
        .await;
    assert!(matches!(result, Err(HarnessError::Variable(_))));
}

#[tokio::test]
async fn test_missing_variable_left_as_is_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/comments"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let session = session_for(&server, EnvironmentStore::new());

    let template = RequestTemplate::post("/comments").raw_body(r#"{"text": "{{never_set}}"}"#);
    let response = session.send(&template).await.unwrap();
    assert_eq!(response.status_code, 201);

    let bodies = received_json_bodies(&server).await;
    assert_eq!(bodies[0]["text"], "{{never_set}}");
}

#[tokio::test]
async fn test_server_variable_overrides_configured_base_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = EnvironmentStore::from_variables([("server", server.uri())]);
    let config = HarnessConfig {
        server: "http://127.0.0.1:9".to_string(),
        ..Default::default()
    };
    let transport = ReqwestTransport::new(&ExecutionConfig::from(&config)).unwrap();
    let session = TestSession::with_store(store, &config, transport);

    let response = session.send(&RequestTemplate::get("/status")).await.unwrap();
    assert_eq!(response.status_code, 200);
}

#[tokio::test]
async fn test_unreachable_server_is_a_request_error() {
    let store = EnvironmentStore::from_variables([("server", "http://127.0.0.1:9")]);
    let config = HarnessConfig {
        timeout: 2000,
        ..Default::default()
    };
    let transport = ReqwestTransport::new(&ExecutionConfig::from(&config)).unwrap();
    let session = TestSession::with_store(store, &config, transport);

    let result = session.send(&RequestTemplate::get("/status")).await;
    assert!(matches!(result, Err(HarnessError::Request(_))));
}

#[tokio::test]
async fn test_ticket_holder_count() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events/e-3/ticket_holder_count"))
        .and(header("Authorization", "Bearer admin-token"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(12)))
        .expect(1)
        .mount(&server)
        .await;

    let store = EnvironmentStore::from_variables([
        ("org_admin_token", "admin-token"),
        ("last_event_id", "e-3"),
    ]);
    let session = session_for(&server, store);

    let template = RequestTemplate::get("/events/{{last_event_id}}/ticket_holder_count")
        .bearer("org_admin_token");
    let response = session.send(&template).await.unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.json().unwrap(), json!(12));
}
