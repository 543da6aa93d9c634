//! Integration tests for `FindARatClient` and `Ingestor`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made.

use std::path::PathBuf;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rathunter_ingest::{FetchError, FindARatClient, Ingestor};

fn test_client(base_url: &str) -> FindARatClient {
    FindARatClient::new(base_url, 5, "rathunter-test/0.1", true)
        .expect("failed to build test FindARatClient")
}

fn scratch_snapshot(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "rathunter-ingest-{name}-{}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join("rat_data.json")
}

fn listings_json() -> serde_json::Value {
    json!([
        {
            "id": 1,
            "name": "CBD Pharmacy",
            "address": "3000 VIC",
            "status": "IN_STOCK",
            "priceInCents": 1999,
            "lat": -37.8,
            "lng": 144.9,
            "date": "2022-01-13T02:09:35.458Z",
            "updatedAt": "2022-01-13T02:09:35.458Z",
            "createdAt": "2022-01-13T02:00:00.000Z",
            "verified": true
        },
        {
            "id": 2,
            "name": "Sydney Chemist",
            "address": "2000 NSW",
            "status": "NO_STOCK",
            "priceInCents": 2500,
            "lat": -33.9,
            "lng": 151.2,
            "date": "2022-01-13T01:00:00.000Z",
            "updatedAt": "2022-01-13T01:00:00.000Z",
            "createdAt": "2022-01-12T23:00:00.000Z"
        }
    ])
}

async fn mount_listings(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(template)
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// FindARatClient
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_raw_returns_every_record() {
    let server = MockServer::start().await;
    mount_listings(&server, ResponseTemplate::new(200).set_body_json(listings_json())).await;

    let raw = test_client(&server.uri()).fetch_raw().await.unwrap();
    assert_eq!(raw.len(), 2);
    assert_eq!(raw[1]["status"], "NO_STOCK");
}

#[tokio::test]
async fn fetch_raw_empty_array_is_ok() {
    let server = MockServer::start().await;
    mount_listings(&server, ResponseTemplate::new(200).set_body_json(json!([]))).await;

    let raw = test_client(&server.uri()).fetch_raw().await.unwrap();
    assert!(raw.is_empty());
}

#[tokio::test]
async fn fetch_raw_non_2xx_is_unexpected_status() {
    let server = MockServer::start().await;
    mount_listings(&server, ResponseTemplate::new(503)).await;

    let err = test_client(&server.uri()).fetch_raw().await.unwrap_err();
    assert!(
        matches!(err, FetchError::UnexpectedStatus { status: 503, .. }),
        "expected UnexpectedStatus(503), got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_raw_malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;
    mount_listings(
        &server,
        ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"),
    )
    .await;

    let err = test_client(&server.uri()).fetch_raw().await.unwrap_err();
    assert!(matches!(err, FetchError::Deserialize { .. }), "got: {err:?}");
}

#[tokio::test]
async fn fetch_raw_object_body_is_deserialize_error() {
    let server = MockServer::start().await;
    mount_listings(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"error": "nope"})),
    )
    .await;

    let err = test_client(&server.uri()).fetch_raw().await.unwrap_err();
    assert!(matches!(err, FetchError::Deserialize { .. }));
}

#[tokio::test]
async fn fetch_raw_unreachable_host_is_http_error() {
    // Nothing listens on port 9 (discard) in the test environment.
    let client = test_client("http://127.0.0.1:9/");
    let err = client.fetch_raw().await.unwrap_err();
    assert!(matches!(err, FetchError::Http(_)), "got: {err:?}");
}

// ---------------------------------------------------------------------------
// Ingestor
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ingest_parses_records_and_writes_snapshot() {
    let server = MockServer::start().await;
    mount_listings(&server, ResponseTemplate::new(200).set_body_json(listings_json())).await;
    let snapshot = scratch_snapshot("parses");

    let ingestor = Ingestor::new(test_client(&server.uri()), &snapshot);
    let records = ingestor.ingest().await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].address.as_deref(), Some("3000 VIC"));
    assert_eq!(records[0].verified(), Some(&json!(true)));

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&snapshot).unwrap()).unwrap();
    assert_eq!(written, listings_json());
}

#[tokio::test]
async fn ingest_twice_gives_identical_snapshot_bytes() {
    let server = MockServer::start().await;
    mount_listings(&server, ResponseTemplate::new(200).set_body_json(listings_json())).await;
    let snapshot = scratch_snapshot("idempotent");
    let ingestor = Ingestor::new(test_client(&server.uri()), &snapshot);

    ingestor.ingest().await.unwrap();
    let first = std::fs::read(&snapshot).unwrap();
    ingestor.ingest().await.unwrap();
    let second = std::fs::read(&snapshot).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn ingest_failure_resets_snapshot_and_returns_error() {
    let server = MockServer::start().await;
    mount_listings(&server, ResponseTemplate::new(500)).await;
    let snapshot = scratch_snapshot("failure");
    std::fs::write(&snapshot, "[{\"stale\": true}]").unwrap();

    let ingestor = Ingestor::new(test_client(&server.uri()), &snapshot);
    let err = ingestor.ingest().await.unwrap_err();

    assert!(matches!(err, FetchError::UnexpectedStatus { status: 500, .. }));
    assert_eq!(std::fs::read_to_string(&snapshot).unwrap(), "[]\n");
}

#[tokio::test]
async fn ingest_empty_feed_is_ok_and_distinct_from_failure() {
    let server = MockServer::start().await;
    mount_listings(&server, ResponseTemplate::new(200).set_body_json(json!([]))).await;
    let snapshot = scratch_snapshot("empty");

    let ingestor = Ingestor::new(test_client(&server.uri()), &snapshot);
    let records = ingestor.ingest().await.expect("empty feed is not an error");
    assert!(records.is_empty());
}

#[test]
fn offline_records_skip_the_snapshot() {
    let records = Ingestor::offline(vec![json!({"name": "Offline", "status": "LOW_STOCK"})])
        .expect("offline parse should succeed");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name.as_deref(), Some("Offline"));
}
