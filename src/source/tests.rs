//! Tests for source module

use super::*;
use crate::convert::{convert, Mode};
use crate::error::Error;
use crate::fixtures::Sub;
use crate::http::{ArmClient, ArmClientConfig, PageRequest};
use crate::record::RecordType;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn drain<S: RecordSource>(source: &mut S) -> Result<Vec<S::Record>> {
    let mut records = Vec::new();
    while let Some(record) = source.next_record().await? {
        records.push(record);
    }
    Ok(records)
}

// ============================================================================
// Adapter Tests
// ============================================================================

#[tokio::test]
async fn test_iter_source_yields_in_order() {
    let mut source = IterSource::new(
        vec![Sub { b: true, i: 1 }, Sub { b: false, i: 2 }]
            .into_iter()
            .map(Ok::<Sub, Error>),
    );
    let records = drain(&mut source).await.unwrap();
    assert_eq!(records.iter().map(|s| s.i).collect::<Vec<_>>(), vec![1, 2]);
    assert!(source.next_record().await.unwrap().is_none());
}

#[tokio::test]
async fn test_iter_source_stops_at_first_failure() {
    let items: Vec<Result<Sub>> = vec![
        Ok(Sub::default()),
        Err(Error::source_error("page failed")),
        Ok(Sub::default()),
    ];
    let mut source = IterSource::new(items.into_iter());
    assert!(source.next_record().await.unwrap().is_some());
    assert!(matches!(
        source.next_record().await.unwrap_err(),
        Error::Source { .. }
    ));
}

#[tokio::test]
async fn test_stream_source() {
    let stream = futures::stream::iter(vec![Ok(Sub { b: true, i: 5 })]);
    let mut source = StreamSource::new(stream);
    let records = drain(&mut source).await.unwrap();
    assert_eq!(records, vec![Sub { b: true, i: 5 }]);
}

// ============================================================================
// JSON Lines Tests
// ============================================================================

#[tokio::test]
async fn test_json_lines_skips_blank_lines() {
    let input = b"{\"bool\": true, \"int\": 3}\n\n   \n{\"int\": 4}\n" as &[u8];
    let mut source = JsonLinesSource::new(input, Sub::record_descriptor());
    let records = drain(&mut source).await.unwrap();
    assert_eq!(records.len(), 2);

    let first = convert(&records[0], false, Mode::Nested).unwrap();
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        json!({"bool": true, "int": 3})
    );
    let second = convert(&records[1], false, Mode::Nested).unwrap();
    assert_eq!(
        serde_json::to_value(&second).unwrap(),
        json!({"bool": false, "int": 4})
    );
}

#[tokio::test]
async fn test_json_lines_malformed_line() {
    let input = b"{\"int\": 1}\n{oops\n" as &[u8];
    let mut source = JsonLinesSource::new(input, Sub::record_descriptor());
    assert!(source.next_record().await.unwrap().is_some());
    let err = source.next_record().await.unwrap_err();
    assert!(matches!(err, Error::Decode { ref message } if message.starts_with("line 2")));
}

#[tokio::test]
async fn test_json_lines_open_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("subs.jsonl");
    std::fs::write(&file, "{\"bool\": true}\n").unwrap();

    let mut source = JsonLinesSource::open(&file, Sub::record_descriptor())
        .await
        .unwrap();
    assert_eq!(drain(&mut source).await.unwrap().len(), 1);

    assert!(JsonLinesSource::open(dir.path().join("missing"), Sub::record_descriptor())
        .await
        .is_err());
}

// ============================================================================
// ARM Pager Tests
// ============================================================================

fn client(server: &MockServer) -> ArmClient {
    ArmClient::new(
        ArmClientConfig::builder()
            .endpoint(server.uri())
            .max_retries(0)
            .backoff(Duration::from_millis(1), Duration::from_millis(1))
            .build(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_arm_pager_follows_next_link() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("api-version", "2020-01-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"bool": true, "int": 1}, {"int": 2}],
            "nextLink": format!("{}/items/page2?api-version=2020-01-01", server.uri())
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/items/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"int": 3}],
            "nextLink": ""
        })))
        .mount(&server)
        .await;

    let mut pager: ArmPager<Sub> =
        ArmPager::new(client(&server), PageRequest::first("/items", "2020-01-01"));
    let records = drain(&mut pager).await.unwrap();
    assert_eq!(records.iter().map(|s| s.i).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert!(records[0].b);
    assert_eq!(pager.pages(), 2);
}

#[tokio::test]
async fn test_arm_pager_empty_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": []})))
        .mount(&server)
        .await;

    let mut pager: ArmPager<Sub> = ArmPager::new(client(&server), PageRequest::first("/empty", "1"));
    assert!(pager.next_record().await.unwrap().is_none());
}

#[tokio::test]
async fn test_arm_pager_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bad"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"value": [{"int": "three"}]})),
        )
        .mount(&server)
        .await;

    let mut pager: ArmPager<Sub> = ArmPager::new(client(&server), PageRequest::first("/bad", "1"));
    assert!(matches!(
        pager.next_record().await.unwrap_err(),
        Error::Decode { .. }
    ));
}

#[tokio::test]
async fn test_arm_pager_http_failure_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut pager: ArmPager<Sub> = ArmPager::new(client(&server), PageRequest::first("/gone", "1"));
    assert!(matches!(
        pager.next_record().await.unwrap_err(),
        Error::HttpStatus { status: 404, .. }
    ));
}
