//! Tests for retry classification and attempt accounting.

use orchestrall_client::OrchestrallClient;
use orchestrall_core::SessionConfig;
use orchestrall_error::{OrchestrallError, OrchestrallErrorKind, TransportErrorKind};
use serde_json::json;
use std::time::Duration;
use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

fn client_with_retries(server_url: &str, retries: usize) -> OrchestrallClient {
    let config = SessionConfig::builder()
        .base_url(server_url)
        .api_key("test-key")
        .retries(retries)
        .build()
        .unwrap();
    OrchestrallClient::new(config).unwrap()
}

fn transport_kind(err: &OrchestrallError) -> &TransportErrorKind {
    match err.kind() {
        OrchestrallErrorKind::Transport(transport) => &transport.kind,
        other => panic!("expected transport error, got {other}"),
    }
}

#[tokio::test]
async fn test_transient_status_is_retried_until_success() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;

    // First answer is a 503; once it expires the healthy mock takes over
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/v2/health"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/v2/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "healthy"})))
        .mount(&mock_server)
        .await;

    let client = client_with_retries(&mock_server.uri(), 3);
    let health = client.health().await?;

    assert_eq!(health, json!({"status": "healthy"}));
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_rate_limit_is_retried() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("GET"))
        .and(matchers::path("/v2/health"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/v2/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "healthy"})))
        .mount(&mock_server)
        .await;

    let client = client_with_retries(&mock_server.uri(), 2);
    client.health().await?;

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_retry_budget_counts_total_attempts() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("GET"))
        .and(matchers::path("/v2/health"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = client_with_retries(&mock_server.uri(), 3);
    let err = client.health().await.unwrap_err();

    assert_eq!(*transport_kind(&err), TransportErrorKind::HttpStatus(503));
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn test_single_attempt_budget_never_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("GET"))
        .and(matchers::path("/v2/health"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_with_retries(&mock_server.uri(), 1);
    let err = client.health().await.unwrap_err();

    assert_eq!(*transport_kind(&err), TransportErrorKind::HttpStatus(503));
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("GET"))
        .and(matchers::path("/v2/health"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_with_retries(&mock_server.uri(), 3);
    let err = client.health().await.unwrap_err();

    assert_eq!(*transport_kind(&err), TransportErrorKind::HttpStatus(404));
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_timeout_is_terminal() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("GET"))
        .and(matchers::path("/v2/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "healthy"}))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&mock_server)
        .await;

    let config = SessionConfig::builder()
        .base_url(mock_server.uri())
        .api_key("test-key")
        .timeout(Duration::from_millis(50))
        .retries(3usize)
        .build()
        .unwrap();
    let client = OrchestrallClient::new(config).unwrap();
    let err = client.health().await.unwrap_err();

    assert_eq!(*transport_kind(&err), TransportErrorKind::Timeout);
    // A spent time budget is not retried
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_unreachable_host_is_a_connection_error() {
    // Nothing listens on the discard port
    let client = client_with_retries("http://127.0.0.1:9", 1);
    let err = client.health().await.unwrap_err();

    assert!(matches!(
        transport_kind(&err),
        TransportErrorKind::ConnectionRefused(_)
    ));
}

#[tokio::test]
async fn test_malformed_body_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("GET"))
        .and(matchers::path("/v2/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_with_retries(&mock_server.uri(), 3);
    let err = client.health().await.unwrap_err();

    assert!(matches!(
        transport_kind(&err),
        TransportErrorKind::Malformed(_)
    ));
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}
