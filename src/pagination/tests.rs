//! Tests for pagination module

use super::*;
use crate::config::ServiceConfig;
use crate::error::FetchError;
use crate::http::{ConnectivityFlag, HttpClient};
use crate::request::RequestDescriptor;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Row {
    id: u32,
}

fn rows(range: std::ops::Range<u32>) -> serde_json::Value {
    json!({ "items": range.map(|id| json!({"id": id})).collect::<Vec<_>>() })
}

fn loader_for(server: &MockServer) -> PageLoader<Page<Row>> {
    let config = ServiceConfig::builder().base_url(server.uri()).build();
    let client = Arc::new(HttpClient::new(config).unwrap());
    PageLoader::new(client, |page| {
        RequestDescriptor::new("/rows").query("page", page)
    })
}

async fn mount_page(server: &MockServer, page: u32, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/rows"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ============================================================================
// PaginationState / LoadOutcome Tests
// ============================================================================

#[test]
fn test_pagination_state_default() {
    let state = PaginationState::<Row>::new();
    assert!(state.items.is_empty());
    assert_eq!(state.next_page, 1);
    assert!(!state.in_flight);

    assert_eq!(PaginationState::<Row>::with_page(0).next_page, 1);
    assert_eq!(PaginationState::<Row>::with_page(4).next_page, 4);
}

#[test]
fn test_load_outcome_messages() {
    let loaded = LoadOutcome::Loaded { page: 1, count: 3 };
    assert!(loaded.succeeded());
    assert_eq!(loaded.message(), "Data found");
    assert_eq!(loaded.page(), 1);

    let empty = LoadOutcome::NoData { page: 2 };
    assert!(!empty.succeeded());
    assert_eq!(empty.message(), "Data not found");

    let failed = LoadOutcome::Failed {
        page: 3,
        error: FetchError::Forbidden.into(),
    };
    assert!(!failed.succeeded());
    assert_eq!(failed.message(), "Forbidden (403)");
    assert_eq!(failed.fetch_error(), Some(&FetchError::Forbidden));
    assert_eq!(empty.fetch_error(), None);
}

#[test]
fn test_vec_is_paged() {
    let items = vec![Row { id: 1 }].into_items();
    assert_eq!(items, Some(vec![Row { id: 1 }]));
    assert_eq!(Page::<Row>::missing().into_items(), None);
    assert_eq!(Page::new(vec![Row { id: 2 }]).into_items().unwrap().len(), 1);
}

#[test]
fn test_page_decodes_items_without_default() {
    let page: Page<Row> = serde_json::from_value(json!({
        "items": [{"id": 7}],
        "quota_remaining": 12
    }))
    .unwrap();
    assert_eq!(page.items, Some(vec![Row { id: 7 }]));
    assert_eq!(page.has_more, None);
    assert_eq!(page.quota_remaining, Some(12));

    let bare: Page<Row> = serde_json::from_value(json!({})).unwrap();
    assert_eq!(bare, Page::missing());
}

// ============================================================================
// PageLoader Tests
// ============================================================================

#[tokio::test]
async fn test_first_page_advances_cursor() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 1, rows(0..20)).await;

    let loader = loader_for(&mock_server);
    let outcome = loader.trigger(1).await.unwrap();

    assert!(outcome.succeeded());
    assert!(matches!(outcome, LoadOutcome::Loaded { page: 1, count: 20 }));
    assert_eq!(loader.next_page().await, 2);
    assert_eq!(loader.len().await, 20);
    assert!(!loader.is_loading());
}

#[tokio::test]
async fn test_pages_merge_in_order() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 1, rows(0..3)).await;
    mount_page(&mock_server, 2, rows(3..5)).await;
    mount_page(&mock_server, 3, rows(5..9)).await;

    let loader = loader_for(&mock_server);
    for _ in 0..3 {
        assert!(loader.load_next().await.unwrap().succeeded());
    }

    let snapshot = loader.snapshot().await;
    let ids: Vec<u32> = snapshot.items.iter().map(|row| row.id).collect();
    assert_eq!(ids, (0..9).collect::<Vec<_>>());
    assert_eq!(snapshot.next_page, 4);
    assert!(!snapshot.in_flight);
}

#[tokio::test]
async fn test_empty_and_missing_items_report_no_data() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 1, json!({"items": []})).await;
    mount_page(&mock_server, 2, json!({"has_more": false})).await;

    let loader = loader_for(&mock_server);

    let outcome = loader.trigger(1).await.unwrap();
    assert!(matches!(outcome, LoadOutcome::NoData { page: 1 }));
    assert_eq!(outcome.message(), "Data not found");

    let outcome = loader.trigger(2).await.unwrap();
    assert!(matches!(outcome, LoadOutcome::NoData { page: 2 }));

    assert_eq!(loader.next_page().await, 1);
    assert!(loader.is_empty().await);
    assert!(!loader.is_loading());
}

#[tokio::test]
async fn test_trigger_while_in_flight_is_dropped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rows"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(rows(0..5))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let loader = loader_for(&mock_server);
    let first = tokio::spawn({
        let loader = loader.clone();
        async move { loader.trigger(1).await }
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(loader.is_loading());
    for _ in 0..5 {
        assert!(loader.trigger(1).await.is_none());
    }
    assert!(loader.load_next().await.is_none());
    assert!(loader.is_empty().await);

    let outcome = first.await.unwrap().unwrap();
    assert!(outcome.succeeded());
    assert_eq!(loader.len().await, 5);
    assert_eq!(loader.next_page().await, 2);
    assert!(!loader.is_loading());
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_triggers_issue_one_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rows"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(rows(0..2))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let loader = loader_for(&mock_server);
    let (a, b, c) = tokio::join!(loader.trigger(1), loader.trigger(1), loader.trigger(1));

    let accepted = [a, b, c].into_iter().flatten().count();
    assert_eq!(accepted, 1);
    assert_eq!(loader.len().await, 2);
}

#[tokio::test]
async fn test_failure_leaves_items_untouched() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 1, rows(0..4)).await;

    Mock::given(method("GET"))
        .and(path("/rows"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, 2, rows(4..6)).await;

    let loader = loader_for(&mock_server);
    assert!(loader.load_next().await.unwrap().succeeded());

    let outcome = loader.load_next().await.unwrap();
    assert!(!outcome.succeeded());
    assert_eq!(outcome.fetch_error(), Some(&FetchError::ServerErrorCode(503)));
    assert_eq!(loader.len().await, 4);
    assert_eq!(loader.next_page().await, 2);
    assert!(!loader.is_loading());

    // the same page can be retried by the caller
    let outcome = loader.load_next().await.unwrap();
    assert!(outcome.succeeded());
    assert_eq!(loader.len().await, 6);
    assert_eq!(loader.next_page().await, 3);
}

#[tokio::test]
async fn test_offline_failure_reports_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows(0..1)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = ServiceConfig::builder().base_url(mock_server.uri()).build();
    let client = HttpClient::new(config)
        .unwrap()
        .with_connectivity(ConnectivityFlag::new(false));
    let loader: PageLoader<Page<Row>> =
        PageLoader::new(Arc::new(client), |page| RequestDescriptor::new("/rows").query("page", page));

    let outcome = loader.trigger(1).await.unwrap();
    assert_eq!(outcome.fetch_error(), Some(&FetchError::NoConnectivity));
    assert_eq!(outcome.message(), "No internet connection available");
    assert!(!loader.is_loading());
}

#[tokio::test]
async fn test_decoding_failure_is_reported() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 1, json!({"items": [{"name": "no id"}]})).await;

    let loader = loader_for(&mock_server);
    let outcome = loader.trigger(1).await.unwrap();

    assert!(matches!(outcome.fetch_error(), Some(FetchError::Decoding(_))));
    assert!(loader.is_empty().await);
}

#[tokio::test]
async fn test_starting_at_and_reset() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 5, rows(0..2)).await;

    let loader = loader_for(&mock_server).starting_at(5);
    assert_eq!(loader.next_page().await, 5);
    assert!(loader.load_next().await.unwrap().succeeded());
    assert_eq!(loader.next_page().await, 6);

    assert!(loader.reset().await);
    assert!(loader.is_empty().await);
    assert_eq!(loader.next_page().await, 1);
}
