//! RSS 2.0 feed generation for hot entries.
//!
//! [`build_feed`] fetches live entries, keeps those at or above the bookmark
//! threshold and renders them as RSS 2.0. Any failure is turned into a small
//! error feed so callers always get well-formed XML back.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rss::extension::atom::{AtomExtension, Link};
use rss::{Channel, Guid, Item};
use tracing::{debug, error};

use crate::datetime::{format_rfc822, to_rfc822};
use crate::hotentry::client::{UpstreamClient, CONTENT_NS};
use crate::hotentry::types::{Entry, DEFAULT_TITLE};
use crate::{HotfeedError, Result};

/// Content type of every feed response.
pub const FEED_CONTENT_TYPE: &str = "application/xml";

/// Value of the channel `generator` element.
pub const GENERATOR: &str = "Hatena Bookmark RSS Generator";

/// Channel TTL hint in minutes.
pub const FEED_TTL_MINUTES: u32 = 5;

/// Channel title of the error feed.
pub const ERROR_CHANNEL_TITLE: &str = "エラー";

/// Returned if even the error feed cannot be serialized.
const STATIC_ERROR_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>エラー</title><link></link><description>フィードの生成中にエラーが発生しました</description></channel></rss>"#;

/// Links advertised by a rendered channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedLinks {
    /// Site root, used as the channel `link`.
    pub site: String,
    /// Full URL of the feed itself, used as `atom:link rel="self"`.
    pub feed: String,
}

impl FeedLinks {
    /// Create a new pair of links.
    pub fn new(site: impl Into<String>, feed: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            feed: feed.into(),
        }
    }
}

/// Result of a feed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOutcome {
    /// Rendered feed.
    Feed(String),
    /// Error feed describing what went wrong.
    Error(String),
}

impl FeedOutcome {
    /// XML body.
    pub fn body(&self) -> &str {
        match self {
            FeedOutcome::Feed(xml) | FeedOutcome::Error(xml) => xml,
        }
    }

    /// Consume the outcome and return the XML body.
    pub fn into_body(self) -> String {
        match self {
            FeedOutcome::Feed(xml) | FeedOutcome::Error(xml) => xml,
        }
    }

    /// Check whether this is the error feed.
    pub fn is_error(&self) -> bool {
        matches!(self, FeedOutcome::Error(_))
    }
}

/// Fetch live entries and render the feed for `threshold`.
///
/// Never fails: fetch and serialization errors produce [`FeedOutcome::Error`].
pub async fn build_feed(client: &UpstreamClient, threshold: i64, links: &FeedLinks) -> FeedOutcome {
    let now = Utc::now();

    let result = client.fetch_entries().await.and_then(|entries| {
        let filtered = filter_entries(&entries, threshold);
        debug!(
            total = entries.len(),
            kept = filtered.len(),
            threshold,
            "Filtered hot entries"
        );
        render_feed(&filtered, threshold, links, now)
    });

    match result {
        Ok(xml) => FeedOutcome::Feed(xml),
        Err(e) => {
            error!(error = %e, threshold, "Failed to generate feed");
            FeedOutcome::Error(error_feed(&e.to_string(), now))
        }
    }
}

/// Entries whose count is at least `threshold`, in their original order.
pub fn filter_entries(entries: &[Entry], threshold: i64) -> Vec<&Entry> {
    entries
        .iter()
        .filter(|entry| entry.meets_threshold(threshold))
        .collect()
}

/// Render entries as an RSS 2.0 document.
pub fn render_feed(
    entries: &[&Entry],
    threshold: i64,
    links: &FeedLinks,
    now: DateTime<Utc>,
) -> Result<String> {
    let mut self_link = Link::default();
    self_link.set_href(links.feed.as_str());
    self_link.set_rel("self");
    self_link.set_mime_type(Some("application/rss+xml".to_string()));

    let mut atom = AtomExtension::default();
    atom.set_links(vec![self_link]);

    let mut channel = Channel::default();
    channel.set_title(format!("Hatena Hotentry (Threshold: {threshold})"));
    channel.set_link(links.site.as_str());
    channel.set_description(format!(
        "はてなブックマークの人気エントリー（{threshold}ブックマーク以上）"
    ));
    channel.set_language(Some("ja".to_string()));
    channel.set_last_build_date(Some(to_rfc822(&now)));
    channel.set_generator(Some(GENERATOR.to_string()));
    channel.set_ttl(Some(FEED_TTL_MINUTES.to_string()));
    // xmlns:atom is declared by the writer along with the extension
    channel.set_atom_ext(Some(atom));
    channel.set_namespaces(BTreeMap::from([(
        "content".to_string(),
        CONTENT_NS.to_string(),
    )]));
    channel.set_items(
        entries
            .iter()
            .map(|entry| render_item(entry, now))
            .collect::<Vec<_>>(),
    );

    write_channel(&channel)
}

fn render_item(entry: &Entry, now: DateTime<Utc>) -> Item {
    let title = if entry.title.is_empty() {
        DEFAULT_TITLE
    } else {
        entry.title.as_str()
    };

    let mut guid = Guid::default();
    guid.set_value(entry.guid());
    guid.set_permalink(false);

    let mut item = Item::default();
    item.set_title(Some(title.to_string()));
    item.set_link(Some(entry.url.clone()));
    item.set_guid(Some(guid));
    item.set_description(Some(item_description(entry)));
    item.set_content(Some(item_description(entry)));
    item.set_pub_date(Some(format_rfc822(entry.date.as_deref(), now)));
    item
}

/// HTML-escaped description with the bookmark count appended.
fn item_description(entry: &Entry) -> String {
    format!(
        "{}<br/><br/>ブックマーク数: {}",
        html_escape::encode_quoted_attribute(&entry.description),
        entry.count
    )
}

/// Minimal feed whose single item carries `message`.
pub fn error_feed(message: &str, now: DateTime<Utc>) -> String {
    let mut item = Item::default();
    item.set_title(Some("エラーが発生しました".to_string()));
    item.set_description(Some(
        html_escape::encode_quoted_attribute(message).into_owned(),
    ));
    item.set_pub_date(Some(to_rfc822(&now)));

    let mut channel = Channel::default();
    channel.set_title(ERROR_CHANNEL_TITLE);
    channel.set_description("フィードの生成中にエラーが発生しました");
    channel.set_items(vec![item]);

    write_channel(&channel).unwrap_or_else(|e| {
        error!(error = %e, "Failed to serialize error feed");
        STATIC_ERROR_FEED.to_string()
    })
}

fn write_channel(channel: &Channel) -> Result<String> {
    let buf = channel.write_to(Vec::new())?;
    String::from_utf8(buf).map_err(|e| HotfeedError::Serialization(e.to_string()))
}
