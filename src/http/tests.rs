//! Tests for the HTTP client module

use super::*;
use crate::error::Error;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> ArmClient {
    let config = ArmClientConfig::builder()
        .endpoint(server.uri())
        .token("test-token")
        .max_retries(2)
        .backoff(Duration::from_millis(1), Duration::from_millis(5))
        .build();
    ArmClient::new(config).unwrap()
}

#[test]
fn test_arm_client_config_default() {
    let config = ArmClientConfig::default();
    assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(config.max_retries, 3);
    assert!(config.token.is_none());
    assert!(config.user_agent.starts_with("azbill/"));
}

#[test]
fn test_arm_client_config_builder() {
    let config = ArmClientConfig::builder()
        .endpoint("https://example.test")
        .token("abc")
        .timeout(Duration::from_secs(5))
        .max_retries(7)
        .backoff(Duration::from_millis(10), Duration::from_secs(1))
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.endpoint, "https://example.test");
    assert_eq!(config.token.as_deref(), Some("abc"));
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.max_retries, 7);
    assert_eq!(config.initial_backoff, Duration::from_millis(10));
    assert_eq!(config.max_backoff, Duration::from_secs(1));
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_calculate_backoff_is_capped() {
    let config = ArmClientConfig::builder()
        .backoff(Duration::from_millis(100), Duration::from_millis(350))
        .build();
    let client = ArmClient::new(config).unwrap();
    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(200));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(350));
    assert_eq!(client.calculate_backoff(40), Duration::from_millis(350));
}

#[test]
fn test_url_for_first_page_and_link() {
    let config = ArmClientConfig::builder()
        .endpoint("https://example.test/base")
        .build();
    let client = ArmClient::new(config).unwrap();

    let first = PageRequest::first("/subscriptions", "2019-06-01").query("$top", "10");
    assert_eq!(
        client.url_for(&first).unwrap().as_str(),
        "https://example.test/base/subscriptions?api-version=2019-06-01&%24top=10"
    );

    let link = PageRequest::Link("https://other.test/next?page=2".to_string());
    assert_eq!(
        client.url_for(&link).unwrap().as_str(),
        "https://other.test/next?page=2"
    );
}

#[test]
fn test_page_next_ignores_empty_link() {
    let page: Page = serde_json::from_str(r#"{"value": [], "nextLink": ""}"#).unwrap();
    assert!(page.next().is_none());
    let page: Page = serde_json::from_str(r#"{"value": [1], "nextLink": "https://x/y"}"#).unwrap();
    assert_eq!(page.next(), Some("https://x/y"));
    let page: Page = serde_json::from_str("{}").unwrap();
    assert!(page.value.is_empty());
}

#[tokio::test]
async fn test_get_page_sends_token_and_api_version() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tenants"))
        .and(query_param("api-version", "2019-06-01"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [{"tenantId": "t1"}]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let page = client
        .get_page(&PageRequest::first("/tenants", "2019-06-01"))
        .await
        .unwrap();
    assert_eq!(page.value.len(), 1);
    assert!(page.next().is_none());
}

#[tokio::test]
async fn test_retries_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": []})))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let page = client
        .get_page(&PageRequest::first("/flaky", "1"))
        .await
        .unwrap();
    assert!(page.value.is_empty());
}

#[tokio::test]
async fn test_retries_rate_limit_then_gives_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/throttled"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .get_page(&PageRequest::first("/throttled", "1"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RateLimited { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forbidden"))
        .respond_with(ResponseTemplate::new(403).set_body_string("no access"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .get_page(&PageRequest::first("/forbidden", "1"))
        .await
        .unwrap_err();
    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 403);
            assert_eq!(body, "no access");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .get_page(&PageRequest::first("/broken", "1"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}
