//! Upstream client for Hatena Bookmark hot entries.
//!
//! The primary source is the JSON hot entry API. When it fails for any
//! reason the RSS 1.0 hot entry feed is parsed instead. A failure of the
//! fallback is returned to the caller.

use std::time::Duration;

use rand::seq::IndexedRandom;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use tracing::{debug, error, warn};

use crate::config::UpstreamConfig;
use crate::error::SourceError;
use crate::hotentry::types::{Entry, DEFAULT_DESCRIPTION};
use crate::{HotfeedError, Result};

/// RSS 1.0 item namespace.
pub const RSS_NS: &str = "http://purl.org/rss/1.0/";

/// Dublin Core namespace (`dc:date`).
pub const DC_NS: &str = "http://purl.org/dc/elements/1.1/";

/// Content module namespace.
pub const CONTENT_NS: &str = "http://purl.org/rss/1.0/modules/content/";

/// Hatena namespace (`hatena:bookmarkcount`).
pub const HATENA_NS: &str = "http://www.hatena.ne.jp/info/xmlns#";

/// Used only if the configured pool is empty.
const FALLBACK_USER_AGENT: &str = "Mozilla/5.0 (compatible; hotfeed/0.1)";

const ACCEPT_VALUE: &str = "application/json, text/xml";
const ACCEPT_LANGUAGE_VALUE: &str = "ja,en-US;q=0.7,en;q=0.3";

/// HTTP client for the hot entry sources.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    api_url: String,
    rss_url: String,
    user_agents: Vec<String>,
}

impl UpstreamClient {
    /// Create a new client from the upstream configuration.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| HotfeedError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            rss_url: config.rss_url.clone(),
            user_agents: config.user_agents.clone(),
        })
    }

    /// Fetch the current hot entries.
    ///
    /// Tries the JSON API first and the RSS feed second. Entries from the two
    /// sources are never merged.
    ///
    /// # Errors
    ///
    /// - [`HotfeedError::MalformedUpstreamData`] if the fallback feed has an
    ///   item without title or link
    /// - [`HotfeedError::UpstreamUnavailable`] if both sources failed otherwise
    pub async fn fetch_entries(&self) -> Result<Vec<Entry>> {
        let primary = match self.fetch_primary().await {
            Ok(entries) => {
                debug!(count = entries.len(), "Fetched hot entries from API");
                return Ok(entries);
            }
            Err(e) => e,
        };
        warn!(error = %primary, "Hot entry API failed, falling back to RSS feed");

        match self.fetch_fallback().await {
            Ok(entries) => {
                debug!(count = entries.len(), "Fetched hot entries from RSS feed");
                Ok(entries)
            }
            Err(SourceError::Malformed(msg)) => {
                error!(error = %msg, "Hot entry RSS feed is malformed");
                Err(HotfeedError::MalformedUpstreamData(msg))
            }
            Err(fallback) => {
                error!(error = %fallback, "Hot entry RSS feed failed");
                Err(HotfeedError::UpstreamUnavailable {
                    primary: primary.to_string(),
                    fallback: fallback.to_string(),
                })
            }
        }
    }

    /// Fetch entries from the JSON API.
    pub async fn fetch_primary(&self) -> std::result::Result<Vec<Entry>, SourceError> {
        let body = self.get(&self.api_url).await?;
        parse_api_entries(&body)
    }

    /// Fetch entries from the RSS 1.0 feed.
    pub async fn fetch_fallback(&self) -> std::result::Result<Vec<Entry>, SourceError> {
        let body = self.get(&self.rss_url).await?;
        let xml = std::str::from_utf8(&body).map_err(|e| SourceError::Body(e.to_string()))?;
        parse_rss_entries(xml)
    }

    /// Pick a User-Agent uniformly at random from the pool.
    fn random_user_agent(&self) -> String {
        self.user_agents
            .choose(&mut rand::rng())
            .map(String::as_str)
            .unwrap_or(FALLBACK_USER_AGENT)
            .to_string()
    }

    async fn get(&self, url: &str) -> std::result::Result<Vec<u8>, SourceError> {
        let user_agent = self.random_user_agent();

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Parse the JSON API body into entries.
pub fn parse_api_entries(body: &[u8]) -> std::result::Result<Vec<Entry>, SourceError> {
    serde_json::from_slice(body).map_err(|e| SourceError::Body(e.to_string()))
}

/// Parse an RSS 1.0 document into entries.
///
/// Each `item` needs a `title` and a `link`. `dc:date` is optional and
/// `hatena:bookmarkcount` defaults to 0.
pub fn parse_rss_entries(xml: &str) -> std::result::Result<Vec<Entry>, SourceError> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| SourceError::Body(e.to_string()))?;

    doc.descendants()
        .filter(|n| n.has_tag_name((RSS_NS, "item")))
        .map(parse_rss_item)
        .collect()
}

fn parse_rss_item(item: roxmltree::Node) -> std::result::Result<Entry, SourceError> {
    let title = child_text(item, RSS_NS, "title")
        .ok_or_else(|| SourceError::Malformed("item without title".to_string()))?;
    let link = child_text(item, RSS_NS, "link")
        .ok_or_else(|| SourceError::Malformed("item without link".to_string()))?;
    let description = child_text(item, RSS_NS, "description")
        .filter(|d| !d.is_empty())
        .unwrap_or(DEFAULT_DESCRIPTION);
    let date = child_text(item, DC_NS, "date").filter(|d| !d.is_empty());

    let count = match item
        .descendants()
        .find(|n| n.has_tag_name((HATENA_NS, "bookmarkcount")))
    {
        Some(node) => {
            let text = node.text().unwrap_or("").trim();
            text.parse::<u64>().map_err(|_| {
                SourceError::Malformed(format!("invalid bookmark count: {text:?}"))
            })?
        }
        None => 0,
    };

    Ok(Entry {
        title: title.to_string(),
        url: link.to_string(),
        description: description.to_string(),
        count,
        date: date.map(str::to_string),
    })
}

/// Trimmed text of the first direct child with the given name.
///
/// `Some("")` when the child exists but is empty.
fn child_text<'a>(node: roxmltree::Node<'a, '_>, ns: &str, name: &str) -> Option<&'a str> {
    node.children()
        .find(|c| c.has_tag_name((ns, name)))
        .map(|c| c.text().unwrap_or("").trim())
}
