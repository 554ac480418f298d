//! Datahose client against a mocked endpoint.

use datahose_client::{DatahoseClient, DatahoseError};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> DatahoseClient {
    DatahoseClient::new(format!("{}/push", server.uri()), "some_password").unwrap()
}

#[tokio::test]
async fn push_sends_key_body_and_auth_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/push"))
        .and(header("Authorization", "some_password"))
        .and(body_json(json!({"key": "some.key", "body": {"some": "data"}})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .push("some.key", json!({"some": "data"}), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn push_adds_time_when_given() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/push"))
        .and(body_json(json!({"key": "some.key", "body": {"some": "data"}, "time": 42})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .push("some.key", json!({"some": "data"}), Some(42))
        .await
        .unwrap();
}

#[tokio::test]
async fn push_fails_once_without_retry_on_non_200() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Something terrible happened"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .push("some.key", json!({"some": "data"}), None)
        .await
        .unwrap_err();

    match err {
        DatahoseError::Rejected { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "Something terrible happened");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn notify_pushes_one_notification() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/push"))
        .and(header("Authorization", "some_password"))
        .and(body_json(json!({
            "key": "notification",
            "body": {"sender": "some_sender", "message": "some_message"}
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .notify("some_sender", "some_message")
        .await
        .unwrap();

    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
