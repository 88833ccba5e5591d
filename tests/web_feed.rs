//! HTTP surface integration tests.

mod common;

use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum_test::TestServer;
use common::*;
use hotfeed::web::{create_health_router, create_router};
use hotfeed::{AppState, EntryStore, RefreshScheduler};
use wiremock::MockServer;

/// Create a test server backed by the mock upstream.
fn create_test_server(upstream: &MockServer) -> (TestServer, Arc<EntryStore>) {
    let mut config = test_config(upstream);
    config.server.public_url = Some("http://feeds.example.com".to_string());
    config.server.timezone = "Asia/Tokyo".to_string();

    let store = Arc::new(EntryStore::new());
    let state = AppState::new(test_client(upstream), store.clone(), &config);
    let app = create_router(Arc::new(state)).merge(create_health_router());

    (TestServer::new(app).unwrap(), store)
}

/// Item titles of a feed document.
fn item_titles(xml: &str) -> Vec<String> {
    let doc = roxmltree::Document::parse(xml).unwrap();
    doc.descendants()
        .filter(|n| n.has_tag_name("item"))
        .filter_map(|item| {
            item.children()
                .find(|c| c.has_tag_name("title"))
                .and_then(|c| c.text())
                .map(str::to_string)
        })
        .collect()
}

fn channel_title(xml: &str) -> String {
    let doc = roxmltree::Document::parse(xml).unwrap();
    let channel = doc.descendants().find(|n| n.has_tag_name("channel")).unwrap();
    channel
        .children()
        .find(|c| c.has_tag_name("title"))
        .and_then(|c| c.text())
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_feed_filters_by_threshold() {
    let upstream = MockServer::start().await;
    mount_api(&upstream, sample_json()).await;
    let (server, _) = create_test_server(&upstream);

    let response = server
        .get("/hotentry/all/feed")
        .add_query_param("threshold", "200")
        .await;

    response.assert_status_ok();
    assert_eq!(response.header(header::CONTENT_TYPE), "application/xml");

    let xml = response.text();
    assert!(xml.starts_with("<?xml"));
    assert_eq!(channel_title(&xml), "Hatena Hotentry (Threshold: 200)");
    assert_eq!(item_titles(&xml), vec!["テスト記事2", "テスト記事3"]);
    assert!(xml.contains("http://feeds.example.com/hotentry/all/feed?threshold=200"));
    assert!(xml.contains("ブックマーク数: 200"));
    assert!(xml.contains("https://example.com/2-200"));
}

#[tokio::test]
async fn test_feed_channel_links() {
    let upstream = MockServer::start().await;
    mount_api(&upstream, sample_json()).await;
    let (server, _) = create_test_server(&upstream);

    let response = server
        .get("/hotentry/all/feed")
        .add_query_param("threshold", "200")
        .await;

    response.assert_status_ok();
    let xml = response.text();
    let doc = roxmltree::Document::parse(&xml).unwrap();
    let channel = doc.descendants().find(|n| n.has_tag_name("channel")).unwrap();

    let site = channel
        .children()
        .find(|c| c.tag_name().namespace().is_none() && c.has_tag_name("link"))
        .and_then(|c| c.text());
    assert_eq!(site, Some("http://feeds.example.com"));

    let atom_link = channel
        .children()
        .find(|c| c.has_tag_name(("http://www.w3.org/2005/Atom", "link")))
        .unwrap();
    assert_eq!(
        atom_link.attribute("href"),
        Some("http://feeds.example.com/hotentry/all/feed?threshold=200")
    );
    assert_eq!(atom_link.attribute("rel"), Some("self"));
}

#[tokio::test]
async fn test_feed_default_threshold() {
    let upstream = MockServer::start().await;
    mount_api(&upstream, sample_json()).await;
    let (server, _) = create_test_server(&upstream);

    let response = server.get("/hotentry/all/feed").await;

    response.assert_status_ok();
    let xml = response.text();
    assert_eq!(channel_title(&xml), "Hatena Hotentry (Threshold: 100)");
    assert_eq!(item_titles(&xml).len(), 3);
}

#[tokio::test]
async fn test_feed_invalid_threshold_uses_default() {
    let upstream = MockServer::start().await;
    mount_api(&upstream, sample_json()).await;
    let (server, _) = create_test_server(&upstream);

    let response = server
        .get("/hotentry/all/feed")
        .add_query_param("threshold", "lots")
        .await;

    response.assert_status_ok();
    assert_eq!(
        channel_title(&response.text()),
        "Hatena Hotentry (Threshold: 100)"
    );
}

#[tokio::test]
async fn test_feed_threshold_above_all_counts() {
    let upstream = MockServer::start().await;
    mount_api(&upstream, sample_json()).await;
    let (server, _) = create_test_server(&upstream);

    let response = server
        .get("/hotentry/all/feed")
        .add_query_param("threshold", "1000")
        .await;

    response.assert_status_ok();
    assert!(item_titles(&response.text()).is_empty());
}

#[tokio::test]
async fn test_nocache_alias() {
    let upstream = MockServer::start().await;
    mount_api(&upstream, sample_json()).await;
    let (server, _) = create_test_server(&upstream);

    let response = server
        .get("/hotentry/all/feed/nocache")
        .add_query_param("threshold", "300")
        .await;

    response.assert_status_ok();
    assert_eq!(response.header(header::CONTENT_TYPE), "application/xml");
    assert_eq!(item_titles(&response.text()), vec!["テスト記事3"]);
}

#[tokio::test]
async fn test_feed_uses_fallback_source() {
    let upstream = MockServer::start().await;
    mount_api_status(&upstream, 500).await;
    mount_rss(&upstream, sample_rss()).await;
    let (server, _) = create_test_server(&upstream);

    let response = server.get("/hotentry/all/feed").await;

    response.assert_status_ok();
    let xml = response.text();
    assert_eq!(item_titles(&xml), vec!["RSSテスト記事"]);
    assert!(xml.contains("ブックマーク数: 150"));
    assert!(xml.contains("Sun, 01 Jan 2023 00:00:00 +0900"));
}

#[tokio::test]
async fn test_feed_error_document() {
    let upstream = MockServer::start().await;
    mount_api_status(&upstream, 500).await;
    mount_rss_status(&upstream, 500).await;
    let (server, _) = create_test_server(&upstream);

    let response = server.get("/hotentry/all/feed").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.header(header::CONTENT_TYPE), "application/xml");

    let xml = response.text();
    assert_eq!(channel_title(&xml), "エラー");
    assert_eq!(item_titles(&xml), vec!["エラーが発生しました"]);
}

#[tokio::test]
async fn test_health_check() {
    let upstream = MockServer::start().await;
    let (server, _) = create_test_server(&upstream);

    let response = server.get("/health").await;

    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn test_index_before_first_refresh() {
    let upstream = MockServer::start().await;
    let (server, _) = create_test_server(&upstream);

    let response = server.get("/").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("最終更新: 未取得"));
    assert!(html.contains("キャッシュ済みエントリー数: 0"));
}

#[tokio::test]
async fn test_index_after_refresh() {
    let upstream = MockServer::start().await;
    mount_api(&upstream, sample_json()).await;
    let (server, store) = create_test_server(&upstream);

    RefreshScheduler::new(test_client(&upstream), store)
        .refresh_now()
        .await
        .unwrap();

    let response = server.get("/").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(!html.contains("未取得"));
    assert!(html.contains("キャッシュ済みエントリー数: 3"));
}
