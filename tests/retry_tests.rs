//! Integration tests for retry behavior against a mock Injection API.

use integrations_socketlabs::{BasicMessage, BasicMessageBuilder, SendResult, SocketLabsClient};
use serde_json::json;
use std::time::{Duration, Instant};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn message() -> BasicMessage {
    BasicMessageBuilder::new()
        .subject("Retry")
        .from("sender@example.com")
        .to("recipient@example.com")
        .text_body("body")
        .build()
        .unwrap()
}

fn client(server: &MockServer, max_retries: u32) -> SocketLabsClient {
    SocketLabsClient::builder()
        .server_id(12345)
        .api_key("legacy-api-key")
        .endpoint(format!("{}/api/v1/email", server.uri()))
        .max_retries(max_retries)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_retry_then_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ErrorCode": "Success",
            "TransactionReceipt": "after-retry"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let started = Instant::now();
    let response = client(&server, 1).send(message()).await.unwrap();

    assert_eq!(response.transaction_receipt.as_deref(), Some("after-retry"));
    // 1s plus one backoff unit of at least 800ms
    assert!(started.elapsed() >= Duration::from_millis(1800));
}

#[tokio::test]
async fn test_retries_exhausted_reports_last_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .expect(2)
        .mount(&server)
        .await;

    let error = client(&server, 1).send(message()).await.unwrap_err();
    let response = error.send_response().unwrap();

    assert_eq!(response.result, SendResult::BadGateway);
    assert_eq!(response.status, Some(502));
}

#[tokio::test]
async fn test_no_retry_by_default() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let error = client(&server, 0).send(message()).await.unwrap_err();
    assert_eq!(error.send_response().map(|r| r.result), Some(SendResult::InternalError));
}

#[tokio::test]
async fn test_unauthorized_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let error = client(&server, 2).send(message()).await.unwrap_err();
    assert_eq!(
        error.send_response().map(|r| r.result),
        Some(SendResult::InvalidAuthentication)
    );
}
