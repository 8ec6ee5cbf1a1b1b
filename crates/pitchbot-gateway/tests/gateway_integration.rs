#![allow(clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use pitchbot_core::{jst, PitchbotError, PitchbotResult, Session};
use pitchbot_gateway::{compute_signature, GatewayConfig, GatewayServer};
use pitchbot_line::LineClient;
use pitchbot_reserve::{
    AttendanceReconciler, CalendarSource, MemoryRosterStore, SessionCatalog,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET: &str = "test-channel-secret";

struct FixtureSource;

#[async_trait]
impl CalendarSource for FixtureSource {
    async fn sessions_between(
        &self,
        _time_min: DateTime<Utc>,
        _time_max: DateTime<Utc>,
        _max_results: usize,
    ) -> PitchbotResult<Vec<Session>> {
        let tz = jst();
        Ok(vec![
            Session::new(
                tz.with_ymd_and_hms(2020, 4, 26, 19, 0, 0).unwrap(),
                tz.with_ymd_and_hms(2020, 4, 26, 21, 0, 0).unwrap(),
                "Futsal @ Chidoricho",
            ),
            Session::new(
                tz.with_ymd_and_hms(2020, 5, 3, 10, 0, 0).unwrap(),
                tz.with_ymd_and_hms(2020, 5, 3, 12, 0, 0).unwrap(),
                "Futsal @ Kawasaki",
            ),
        ])
    }
}

struct FailingSource;

#[async_trait]
impl CalendarSource for FailingSource {
    async fn sessions_between(
        &self,
        _time_min: DateTime<Utc>,
        _time_max: DateTime<Utc>,
        _max_results: usize,
    ) -> PitchbotResult<Vec<Session>> {
        Err(PitchbotError::Calendar("calendar down".to_string()))
    }
}

/// Helper: build a test server wired to a wiremock LINE API, returning the
/// gateway address, the LINE mock, the store, and the media temp dir.
async fn start_test_server(
    source: Arc<dyn CalendarSource>,
) -> (String, MockServer, Arc<MemoryRosterStore>, tempfile::TempDir) {
    let line_api = MockServer::start().await;
    let tmp = tempfile::tempdir().unwrap();

    let store = Arc::new(MemoryRosterStore::new());
    let catalog = Arc::new(SessionCatalog::new(source));
    let reconciler = Arc::new(AttendanceReconciler::new(store.clone()));
    let line = Arc::new(LineClient::new("test-token").with_base_url(line_api.uri()));

    let app = GatewayServer::build(
        catalog,
        reconciler,
        line,
        GatewayConfig {
            channel_secret: SECRET.to_string(),
            contact_url: "https://example.com/contact".to_string(),
            public_base_url: "https://bot.example.com".to_string(),
            media_dir: tmp.path().join("static"),
        },
    )
    .unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = format!("127.0.0.1:{}", listener.local_addr().unwrap().port());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    (addr, line_api, store, tmp)
}

fn text_event_body(text: &str, source: serde_json::Value) -> String {
    serde_json::json!({
        "events": [{
            "type": "message",
            "replyToken": "tok-1",
            "source": source,
            "message": {"type": "text", "id": "M1", "text": text}
        }]
    })
    .to_string()
}

fn user_source() -> serde_json::Value {
    serde_json::json!({"type": "user", "userId": "U1"})
}

async fn post_webhook(addr: &str, body: &str, signature: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{addr}/callback"))
        .header("X-Line-Signature", signature)
        .header("Content-Type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .unwrap()
}

fn mock_profile(name: &str) -> Mock {
    Mock::given(method("GET"))
        .and(path("/v2/bot/profile/U1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "displayName": name,
            "userId": "U1"
        })))
}

fn mock_reply() -> Mock {
    Mock::given(method("POST"))
        .and(path("/v2/bot/message/reply"))
        .and(body_partial_json(serde_json::json!({"replyToken": "tok-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
}

#[tokio::test]
async fn test_health_endpoint() {
    let (addr, _line, _store, _tmp) = start_test_server(Arc::new(FixtureSource)).await;
    let resp = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "pitchbot");
}

#[tokio::test]
async fn test_bad_signature_rejected_before_dispatch() {
    let (addr, line_api, store, _tmp) = start_test_server(Arc::new(FixtureSource)).await;
    let body = text_event_body("reserve:whatever", user_source());

    let resp = post_webhook(&addr, &body, "bm90IGEgcmVhbCBzaWduYXR1cmU=").await;
    assert_eq!(resp.status(), 400);
    // Nothing reached the LINE API or the roster.
    assert!(line_api.received_requests().await.unwrap().is_empty());
    assert!(store.rows().await.is_empty());
}

#[tokio::test]
async fn test_missing_signature_rejected() {
    let (addr, _line, _store, _tmp) = start_test_server(Arc::new(FixtureSource)).await;
    let body = text_event_body("profile", user_source());
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/callback"))
        .body(body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_check_schedule_lists_sessions() {
    let (addr, line_api, _store, _tmp) = start_test_server(Arc::new(FixtureSource)).await;
    mock_reply().expect(1).mount(&line_api).await;

    let body = text_event_body("check schedule", user_source());
    let resp = post_webhook(&addr, &body, &compute_signature(SECRET, body.as_bytes())).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");

    let requests = line_api.received_requests().await.unwrap();
    let reply: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let text = reply["messages"][0]["text"].as_str().unwrap();
    assert!(text.contains("4/26(Sun) 19～21 Futsal @ Chidoricho"));
    assert!(text.contains("5/3(Sun) 10～12 Futsal @ Kawasaki"));
}

#[tokio::test]
async fn test_apply_to_join_renders_carousel() {
    let (addr, line_api, _store, _tmp) = start_test_server(Arc::new(FixtureSource)).await;
    mock_reply().expect(1).mount(&line_api).await;

    let body = text_event_body("apply to join", user_source());
    let resp = post_webhook(&addr, &body, &compute_signature(SECRET, body.as_bytes())).await;
    assert_eq!(resp.status(), 200);

    let requests = line_api.received_requests().await.unwrap();
    let reply: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let message = &reply["messages"][0];
    assert_eq!(message["type"], "template");
    let columns = message["template"]["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 2);
    assert_eq!(
        columns[0]["actions"][0]["text"],
        "reserve:4/26(Sun) 19～21 Futsal @ Chidoricho"
    );
}

#[tokio::test]
async fn test_reserve_toggle_creates_roster_row() {
    let (addr, line_api, store, _tmp) = start_test_server(Arc::new(FixtureSource)).await;
    mock_profile("Alice").expect(1).mount(&line_api).await;
    mock_reply().expect(1).mount(&line_api).await;

    let body = text_event_body("reserve:4/26(Sun) 19～21 Futsal @ Chidoricho", user_source());
    let resp = post_webhook(&addr, &body, &compute_signature(SECRET, body.as_bytes())).await;
    assert_eq!(resp.status(), 200);

    let rows = store.rows().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][2], "Alice");
    assert_eq!(rows[0][4], "4/26(Sun) 19～21 Futsal @ Chidoricho");

    // The confirmation mentions the booked label.
    let requests = line_api.received_requests().await.unwrap();
    let reply = requests
        .iter()
        .find(|r| r.url.path() == "/v2/bot/message/reply")
        .unwrap();
    let reply_json: serde_json::Value = serde_json::from_slice(&reply.body).unwrap();
    let text = reply_json["messages"][0]["text"].as_str().unwrap();
    assert!(text.contains("Alice"));
    assert!(text.contains("4/26(Sun) 19～21 Futsal @ Chidoricho"));
    assert!(text.contains("booked"));
}

#[tokio::test]
async fn test_reserve_toggle_pair_withdraws() {
    let (addr, line_api, store, _tmp) = start_test_server(Arc::new(FixtureSource)).await;
    mock_profile("Alice").expect(2).mount(&line_api).await;
    mock_reply().expect(2).mount(&line_api).await;

    let body = text_event_body("reserve:4/26(Sun) 19～21 Futsal @ Chidoricho", user_source());
    let sig = compute_signature(SECRET, body.as_bytes());
    post_webhook(&addr, &body, &sig).await;
    post_webhook(&addr, &body, &sig).await;

    let rows = store.rows().await;
    assert_eq!(rows.len(), 1);
    // Toggled off: label removed by substring replace.
    assert!(!rows[0][4].contains("4/26(Sun) 19～21 Futsal @ Chidoricho"));
}

#[tokio::test]
async fn test_profile_from_group_source_refused() {
    let (addr, line_api, _store, _tmp) = start_test_server(Arc::new(FixtureSource)).await;
    mock_reply().expect(1).mount(&line_api).await;

    let body = text_event_body(
        "profile",
        serde_json::json!({"type": "group", "groupId": "G1", "userId": "U1"}),
    );
    let resp = post_webhook(&addr, &body, &compute_signature(SECRET, body.as_bytes())).await;
    assert_eq!(resp.status(), 200);

    let requests = line_api.received_requests().await.unwrap();
    // No profile lookup happened; the only call is the refusal reply.
    assert_eq!(requests.len(), 1);
    let reply: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        reply["messages"][0]["text"],
        "Bot can't use profile API without user ID"
    );
}

#[tokio::test]
async fn test_fallback_reply_for_unknown_text() {
    let (addr, line_api, _store, _tmp) = start_test_server(Arc::new(FixtureSource)).await;
    mock_reply().expect(1).mount(&line_api).await;

    let body = text_event_body("what's up?", user_source());
    let resp = post_webhook(&addr, &body, &compute_signature(SECRET, body.as_bytes())).await;
    assert_eq!(resp.status(), 200);

    let requests = line_api.received_requests().await.unwrap();
    let reply: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let text = reply["messages"][0]["text"].as_str().unwrap();
    assert!(text.contains("https://example.com/contact"));
}

#[tokio::test]
async fn test_calendar_failure_surfaces_as_500() {
    let (addr, _line, _store, _tmp) = start_test_server(Arc::new(FailingSource)).await;

    let body = text_event_body("check schedule", user_source());
    let resp = post_webhook(&addr, &body, &compute_signature(SECRET, body.as_bytes())).await;
    assert_eq!(resp.status(), 500);
}

#[tokio::test]
async fn test_messaging_error_is_swallowed() {
    let (addr, line_api, _store, _tmp) = start_test_server(Arc::new(FixtureSource)).await;
    // Reply token already used: the LINE API rejects, the webhook still OKs.
    Mock::given(method("POST"))
        .and(path("/v2/bot/message/reply"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "message": "Invalid reply token"
        })))
        .mount(&line_api)
        .await;

    let body = text_event_body("check schedule", user_source());
    let resp = post_webhook(&addr, &body, &compute_signature(SECRET, body.as_bytes())).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_sticker_echoed_back() {
    let (addr, line_api, _store, _tmp) = start_test_server(Arc::new(FixtureSource)).await;
    mock_reply().expect(1).mount(&line_api).await;

    let body = serde_json::json!({
        "events": [{
            "type": "message",
            "replyToken": "tok-1",
            "source": user_source(),
            "message": {"type": "sticker", "packageId": "1", "stickerId": "2"}
        }]
    })
    .to_string();
    let resp = post_webhook(&addr, &body, &compute_signature(SECRET, body.as_bytes())).await;
    assert_eq!(resp.status(), 200);

    let requests = line_api.received_requests().await.unwrap();
    let reply: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(reply["messages"][0]["type"], "sticker");
    assert_eq!(reply["messages"][0]["packageId"], "1");
}
