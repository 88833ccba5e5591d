//! Test helpers for integration tests.
//!
//! Provides mock upstream sources, fixtures and a configuration pointing at
//! them.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hotfeed::config::{Config, UpstreamConfig};
use hotfeed::UpstreamClient;

/// Path of the mocked JSON API.
pub const API_PATH: &str = "/api/ipad.hotentry";

/// Path of the mocked RSS 1.0 feed.
pub const RSS_PATH: &str = "/hotentry.rss";

/// Upstream configuration pointing at the mock server.
pub fn upstream_config(server: &MockServer) -> UpstreamConfig {
    UpstreamConfig {
        api_url: format!("{}{}", server.uri(), API_PATH),
        rss_url: format!("{}{}", server.uri(), RSS_PATH),
        timeout_secs: 2,
        ..UpstreamConfig::default()
    }
}

/// Full configuration pointing at the mock server.
pub fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.upstream = upstream_config(server);
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config
}

/// Client pointing at the mock server.
pub fn test_client(server: &MockServer) -> UpstreamClient {
    UpstreamClient::new(&upstream_config(server)).expect("Failed to create client")
}

/// Three entries with 100, 200 and 300 bookmarks.
pub fn sample_json() -> Value {
    json!([
        {
            "title": "テスト記事1",
            "url": "https://example.com/1",
            "description": "テスト説明1",
            "count": 100,
            "date": "2023-01-01T00:00:00Z"
        },
        {
            "title": "テスト記事2",
            "url": "https://example.com/2",
            "description": "テスト説明2",
            "count": 200,
            "date": "2023-01-02T00:00:00Z"
        },
        {
            "title": "テスト記事3",
            "url": "https://example.com/3",
            "description": "テスト説明3",
            "count": 300,
            "date": "2023-01-03T00:00:00Z"
        }
    ])
}

/// RSS 1.0 document with a single entry of 150 bookmarks.
pub fn sample_rss() -> String {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF
    xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
    xmlns="http://purl.org/rss/1.0/"
    xmlns:dc="http://purl.org/dc/elements/1.1/"
    xmlns:hatena="http://www.hatena.ne.jp/info/xmlns#">
  <channel rdf:about="https://b.hatena.ne.jp/hotentry">
    <title>はてなブックマーク - 人気エントリー</title>
    <link>https://b.hatena.ne.jp/hotentry</link>
    <description>人気エントリー</description>
  </channel>
  <item rdf:about="https://example.com/rss">
    <title>RSSテスト記事</title>
    <link>https://example.com/rss</link>
    <description>RSSテスト説明</description>
    <dc:date>2023-01-01T00:00:00+09:00</dc:date>
    <hatena:bookmarkcount>150</hatena:bookmarkcount>
  </item>
</rdf:RDF>"#
        .to_string()
}

/// Serve `body` as the JSON API.
pub async fn mount_api(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Make the JSON API answer with `status`.
pub async fn mount_api_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Serve `body` as the RSS feed.
pub async fn mount_rss(server: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path(RSS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/rss+xml")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

/// Make the RSS feed answer with `status`.
pub async fn mount_rss_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path(RSS_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
