//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: ARM list pages → records → CSV/JSON output

use azbill::billing::{
    subscriptions_request, usage_details_request, Resource, Subscription, UsageDetailSource,
    UsageQuery,
};
use azbill::engine::Exporter;
use azbill::http::{ArmClient, ArmClientConfig};
use azbill::output::{serializer_for, Modifiers, OutputFormat, ProgressTracker, Sink, UTF8_BOM};
use azbill::source::{ArmPager, IterSource};
use azbill::{Error, Mode, Optional};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ArmClient {
    ArmClient::new(
        ArmClientConfig::builder()
            .endpoint(server.uri())
            .token("test-token")
            .max_retries(2)
            .backoff(Duration::from_millis(1), Duration::from_millis(5))
            .build(),
    )
    .unwrap()
}

fn read_csv(path: &std::path::Path) -> Vec<String> {
    let bytes = std::fs::read(path).unwrap();
    assert!(bytes.starts_with(UTF8_BOM));
    String::from_utf8(bytes[UTF8_BOM.len()..].to_vec())
        .unwrap()
        .split_terminator("\r\n")
        .map(String::from)
        .collect()
}

// ============================================================================
// ARM → CSV
// ============================================================================

#[tokio::test]
async fn test_usage_details_to_csv_across_pages() {
    let server = MockServer::start().await;
    let detail = |id: &str, env: &str| {
        json!({
            "kind": "legacy",
            "id": id,
            "name": id,
            "tags": {"env": env},
            "properties": {"quantity": 2, "cost": 0.5}
        })
    };

    Mock::given(method("GET"))
        .and(path("/subscriptions/sub-1/providers/Microsoft.Consumption/usageDetails"))
        .and(query_param("$expand", "properties/additionalInfo,properties/meterDetails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [detail("u-1", "prod")],
            "nextLink": format!("{}/usage/page2", server.uri())
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/usage/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [detail("u-2", "dev")]
        })))
        .mount(&server)
        .await;

    let query = UsageQuery {
        subscription: Some("sub-1".to_string()),
        ..UsageQuery::default()
    };
    let request = usage_details_request(&query).unwrap();
    let mut source = UsageDetailSource::new(ArmPager::new(client(&server), request));

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("usage.csv");
    let serializer = serializer_for(
        OutputFormat::csv(),
        Sink::create_file(&out).unwrap(),
        &|mode: Mode| Resource::UsageDetails.modifiers(mode),
    )
    .unwrap();
    let mut exporter = Exporter::new(serializer, ProgressTracker::new().quiet(true));
    let summary = exporter.export(&mut source).await.unwrap();
    assert_eq!(summary.records, 2);

    let rows = read_csv(&out);
    assert_eq!(rows.len(), 3);
    let header: Vec<&str> = rows[0].split(',').collect();
    let tags = header.iter().position(|h| *h == "tags").unwrap();
    assert!(header.contains(&"properties.cost"));
    assert!(rows[1].starts_with("u-1,"));
    assert!(rows[1].contains(r#""{""env"":""prod""}""#));
    assert!(rows[2].contains(r#""{""env"":""dev""}""#));
    assert!(tags > 0);
}

#[tokio::test]
async fn test_retry_then_json_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .and(query_param("api-version", "2019-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                {"subscriptionId": "s1", "displayName": "Prod", "state": "Enabled"},
                {"subscriptionId": "s2", "state": "Disabled"}
            ]
        })))
        .mount(&server)
        .await;

    let mut source: ArmPager<Subscription> = ArmPager::new(client(&server), subscriptions_request());
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("subs.json");
    let serializer = serializer_for(
        "json,flatten".parse().unwrap(),
        Sink::create_file(&out).unwrap(),
        &|mode: Mode| Resource::Subscriptions.modifiers(mode),
    )
    .unwrap();
    let mut exporter = Exporter::new(serializer, ProgressTracker::new().quiet(true));
    exporter.export(&mut source).await.unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    let docs: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0]["displayName"], "Prod");
    assert_eq!(docs[0]["subscriptionPolicies.spendingLimit"], "");
    assert_eq!(docs[1]["displayName"], "");
    assert_eq!(docs[1]["state"], "Disabled");
}

#[tokio::test]
async fn test_http_failure_still_closes_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let mut source: ArmPager<Subscription> = ArmPager::new(client(&server), subscriptions_request());
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("subs.csv");
    let serializer = serializer_for(
        OutputFormat::csv(),
        Sink::create_file(&out).unwrap(),
        &|_: Mode| Modifiers::new(),
    )
    .unwrap();
    let mut exporter = Exporter::new(serializer, ProgressTracker::new().quiet(true));
    let err = exporter.export(&mut source).await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 403, .. }));
    assert!(exporter.is_closed());

    // Only the byte order mark was written
    assert_eq!(std::fs::read(&out).unwrap(), UTF8_BOM);
}

// ============================================================================
// Records declared outside the crate
// ============================================================================

azbill::record! {
    /// A line item declared by a downstream crate
    pub struct LineItem {
        sku: String => "sku",
        price: Optional<f64> => "price",
        [skip] note: String,
    }
}

#[tokio::test]
async fn test_downstream_record_to_pretty_json() {
    let items = vec![
        LineItem {
            sku: "a".to_string(),
            price: Optional::Present(1.5),
            note: "ignored".to_string(),
        },
        LineItem {
            sku: "b".to_string(),
            ..LineItem::default()
        },
    ];
    let mut source = IterSource::new(items.into_iter().map(Ok::<LineItem, Error>));

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("items.json");
    let serializer = serializer_for(
        OutputFormat::json().pretty(),
        Sink::create_file(&out).unwrap(),
        &|_: Mode| Modifiers::new(),
    )
    .unwrap();
    let mut exporter = Exporter::new(serializer, ProgressTracker::new().quiet(true));
    exporter.export(&mut source).await.unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    assert_eq!(
        text,
        "{\n  \"price\": 1.5,\n  \"sku\": \"a\"\n}\n{\n  \"price\": 0.0,\n  \"sku\": \"b\"\n}\n"
    );
}
