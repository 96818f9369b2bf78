//! Hostile event names must reach the API byte for byte
//!
//! Each name is passed through the event fixture, echoed back by the mock
//! server, captured into the store and compared with the original.

use super::session_for;
use rest_harness::fixtures::create_event;
use rest_harness::models::RequestTemplate;
use rest_harness::variables::Capture;
use rest_harness::EnvironmentStore;
use serde_json::{json, Value as JsonValue};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const NAUGHTY_STRINGS: &[&str] = &[
    "",
    " ",
    "undefined",
    "null",
    "NULL",
    "true",
    "0",
    "-1.00",
    "\\",
    "\\\\",
    "'",
    "\"",
    "\"\"\"",
    "\t\r\n",
    "<script>alert(123)</script>",
    "<>?:\"{}|_+",
    "'; DROP TABLE events; --",
    "%s%s%s%n",
    "${7*7}",
    "$HOME",
    "{{7*7}}",
    "{{last_org_id}}",
    "{{",
    "}}",
    "{{}}",
    "Ω≈ç√∫˜µ≤≥÷",
    "\u{00AD}\u{0600}\u{0601}\u{0602}\u{0603}\u{0604}",
    "Æneid",
    "げんまい茶",
    "ᔕᓇᓇ",
    "찦차를 타고 온 펲시맨과 쑛다리 똠방각하",
    "田中さんにあげて下さい",
    "ЁЂЃЄЅІЇЈЉЊЋЌЍЎЏ",
    "😍 🙈 🙉 🙊",
    "\u{202E}test\u{202C}",
    "\u{0000}",
    "Ṱ̺̺̕o͞ ̷i̲̬͇̪͙n̝̗͕v̟̜̘̦͟o̶̙̰̠kè͚̮̺̪̹̱̤ ̖t̝͕̳̣̻̪͞h̼͓̲̦̳̘̲e͇̣̰̦̬͎ ̢̼̻̱̘h͚͎͙̜̣̲ͅi̦̲̣̰̤v̻͍e̺̭̳̪̰-m̢iͅn̖̺̞̲̯̰d̵̼̟͙̩̼̘̳",
];

/// Replies with a new id and the name the request carried.
struct EchoEvent;

impl Respond for EchoEvent {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        match serde_json::from_slice::<JsonValue>(&request.body) {
            Ok(body) => ResponseTemplate::new(201).set_body_json(json!({
                "id": uuid::Uuid::new_v4().to_string(),
                "name": body["name"],
            })),
            Err(_) => ResponseTemplate::new(400),
        }
    }
}

async fn echo_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/events"))
        .respond_with(EchoEvent)
        .mount(&server)
        .await;
    server
}

fn seeded_store() -> EnvironmentStore {
    EnvironmentStore::from_variables([
        ("org_member_token", "member"),
        ("last_org_id", "org-1"),
        ("last_venue_id", "venue-1"),
    ])
}

#[tokio::test]
async fn test_naughty_event_names_round_trip() {
    let server = echo_server().await;
    let session = session_for(&server, seeded_store());

    for name in NAUGHTY_STRINGS {
        let id = create_event(&session, "naughty_event_id", name).await.unwrap();
        assert!(!id.is_empty());

        let requests = server.received_requests().await.unwrap();
        let sent: JsonValue = serde_json::from_slice(&requests.last().unwrap().body).unwrap();
        assert_eq!(sent["name"].as_str(), Some(*name), "sent name differs for {:?}", name);
        assert_eq!(sent["organization_id"], "org-1");
    }
}

#[tokio::test]
async fn test_echoed_name_captured_exactly() {
    let server = echo_server().await;
    let session = session_for(&server, seeded_store());

    let template = RequestTemplate::post("/events")
        .bearer("org_member_token")
        .json_body(json!({"name": "{{naughty_name}}"}));
    let captures = [Capture::json("echoed_name", "$.name").unwrap()];

    for name in NAUGHTY_STRINGS {
        session.store().set("naughty_name", *name);
        session.send_and_capture(&template, &captures).await.unwrap();

        assert_eq!(
            session.store().get("echoed_name").as_deref(),
            Some(*name),
            "captured name differs for {:?}",
            name
        );
    }
}

#[tokio::test]
async fn test_naughty_raw_body_sent_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;
    let session = session_for(&server, EnvironmentStore::new());

    for name in NAUGHTY_STRINGS {
        session.store().set("note", *name);
        session
            .send(&RequestTemplate::post("/notes").raw_body("{{note}}"))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.last().unwrap().body, name.as_bytes());
    }
}
