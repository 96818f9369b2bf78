//! Event fixtures.

use crate::error::HarnessError;
use crate::executor::Transport;
use crate::models::request::RequestTemplate;
use crate::session::TestSession;
use crate::variables::{Capture, VarError};
use serde_json::json;

pub const EVENTS_ENDPOINT: &str = "/events";

/// Variable the event name is passed through.
///
/// The name travels as a variable rather than being spliced into the body so
/// that payloads containing `{{...}}` reach the server unexpanded.
pub const EVENT_NAME_VARIABLE: &str = "last_event_name";

/// Fields of an event to create. Organization and venue come from the
/// `last_org_id` and `last_venue_id` variables.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub name: String,
    pub event_start: String,
    pub event_end: String,
    pub event_type: String,
    pub age_limit: String,
}

impl NewEvent {
    /// The canonical event with its name replaced.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Request template posting this event as the organization member.
    pub fn to_template(&self) -> RequestTemplate {
        RequestTemplate::post(EVENTS_ENDPOINT)
            .bearer("org_member_token")
            .json_body(json!({
                "name": format!("{{{{{}}}}}", EVENT_NAME_VARIABLE),
                "organization_id": "{{last_org_id}}",
                "venue_id": "{{last_venue_id}}",
                "event_start": self.event_start,
                "event_end": self.event_end,
                "event_type": self.event_type,
                "age_limit": self.age_limit,
            }))
    }
}

impl Default for NewEvent {
    fn default() -> Self {
        Self {
            name: "It's my party".to_string(),
            event_start: "2020-11-13T12:00:00".to_string(),
            event_end: "2020-11-14T12:00:00".to_string(),
            event_type: "Music".to_string(),
            age_limit: "A custom age limit".to_string(),
        }
    }
}

/// Creates an event called `name` and stores its id under `store_key`.
pub async fn create_event<T: Transport>(
    session: &TestSession<T>,
    store_key: &str,
    name: &str,
) -> Result<String, HarnessError> {
    create_event_with(session, store_key, &NewEvent::named(name)).await
}

/// Creates `event` and stores its id under `store_key`.
///
/// # Arguments
///
/// * `session` - Session whose store holds `org_member_token`, `last_org_id`
///   and `last_venue_id`
/// * `store_key` - Variable the new event id is written to
/// * `event` - Event fields
///
/// # Returns
///
/// The new event id, as captured from `$.id` of the response.
pub async fn create_event_with<T: Transport>(
    session: &TestSession<T>,
    store_key: &str,
    event: &NewEvent,
) -> Result<String, HarnessError> {
    session.store().set(EVENT_NAME_VARIABLE, event.name.clone());

    let captures = [Capture::json(store_key, "$.id")?];
    session
        .send_and_capture(&event.to_template(), &captures)
        .await?;

    session
        .store()
        .get(store_key)
        .ok_or_else(|| VarError::UndefinedVariable(store_key.to_string()).into())
}
