#![allow(clippy::unwrap_used, clippy::expect_used)]

use pitchbot_core::PitchbotError;
use pitchbot_line::{LineClient, OutgoingMessage};
use wiremock::matchers::{bearer_token, body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> LineClient {
    LineClient::new("channel-token").with_base_url(server.uri())
}

#[tokio::test]
async fn test_reply_posts_token_and_messages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/bot/message/reply"))
        .and(bearer_token("channel-token"))
        .and(body_json(serde_json::json!({
            "replyToken": "tok-1",
            "messages": [{"type": "text", "text": "pong"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .reply("tok-1", &[OutgoingMessage::text("pong")])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reply_error_body_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/bot/message/reply"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "message": "Invalid reply token",
            "details": [{"property": "replyToken", "message": "expired"}]
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .reply("tok-stale", &[OutgoingMessage::text("hi")])
        .await
        .unwrap_err();
    match err {
        PitchbotError::Messaging(msg) => {
            assert!(msg.contains("400"));
            assert!(msg.contains("Invalid reply token"));
        }
        other => panic!("expected Messaging error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_profile_parses_display_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/bot/profile/U1234"))
        .and(bearer_token("channel-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "displayName": "Alice",
            "userId": "U1234",
            "statusMessage": "enjoying futsal"
        })))
        .mount(&server)
        .await;

    let profile = client(&server).profile("U1234").await.unwrap();
    assert_eq!(profile.display_name, "Alice");
    assert_eq!(profile.status_message.as_deref(), Some("enjoying futsal"));
}

#[tokio::test]
async fn test_profile_without_status_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/bot/profile/U5678"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "displayName": "Bob",
            "userId": "U5678"
        })))
        .mount(&server)
        .await;

    let profile = client(&server).profile("U5678").await.unwrap();
    assert_eq!(profile.display_name, "Bob");
    assert!(profile.status_message.is_none());
}

#[tokio::test]
async fn test_message_content_returns_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/bot/message/M99/content"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF]))
        .mount(&server)
        .await;

    let bytes = client(&server).message_content("M99").await.unwrap();
    assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF]);
}
