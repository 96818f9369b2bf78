//! User fixtures: registration and login.

use crate::error::HarnessError;
use crate::executor::Transport;
use crate::models::request::RequestTemplate;
use crate::session::TestSession;
use crate::variables::{Capture, VarError};
use serde::Serialize;

pub const USERS_ENDPOINT: &str = "/users";
pub const TOKEN_ENDPOINT: &str = "/auth/token";

/// Variable the id of the most recently registered user is stored under.
pub const LAST_USER_ID: &str = "last_user_id";

/// A user to register.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl NewUser {
    /// A user with a unique email address, so suites can run repeatedly
    /// against the same database.
    pub fn unique(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: format!("user-{}@tari.com", uuid::Uuid::new_v4().simple()),
            phone: "555".to_string(),
            password: "itsasecret".to_string(),
        }
    }
}

fn scalar_captures(variable: &str, path: &str) -> Result<[Capture; 1], VarError> {
    Ok([Capture::json(variable, path)?])
}

fn required(session_value: Option<String>, variable: &str) -> Result<String, HarnessError> {
    session_value.ok_or_else(|| VarError::UndefinedVariable(variable.to_string()).into())
}

/// Registers `user` and stores the new id under `last_user_id`.
pub async fn register<T: Transport>(
    session: &TestSession<T>,
    user: &NewUser,
) -> Result<String, HarnessError> {
    let body = serde_json::to_value(user)
        .map_err(|e| VarError::InvalidResponse(format!("Failed to serialize user: {}", e)))?;
    let template = RequestTemplate::post(USERS_ENDPOINT).json_body(body);

    session
        .send_and_capture(&template, &scalar_captures(LAST_USER_ID, "$.id")?)
        .await?;
    required(session.store().get(LAST_USER_ID), LAST_USER_ID)
}

/// Logs in and stores the access token under `token_key`.
///
/// Later requests authenticate with `RequestTemplate::bearer(token_key)`.
pub async fn login<T: Transport>(
    session: &TestSession<T>,
    email: &str,
    password: &str,
    token_key: &str,
) -> Result<String, HarnessError> {
    let template = RequestTemplate::post(TOKEN_ENDPOINT).json_body(serde_json::json!({
        "email": email,
        "password": password,
    }));

    session
        .send_and_capture(&template, &scalar_captures(token_key, "$.access_token")?)
        .await?;
    required(session.store().get(token_key), token_key)
}
