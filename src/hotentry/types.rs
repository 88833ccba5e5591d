//! Hot entry types for hotfeed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Threshold used when a request does not carry a usable one.
pub const DEFAULT_THRESHOLD: i64 = 100;

/// Placeholder for entries without a description.
pub const DEFAULT_DESCRIPTION: &str = "説明なし";

/// Placeholder for entries with an empty title.
pub const DEFAULT_TITLE: &str = "無題";

/// A single hot entry.
///
/// Created per fetch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawEntry")]
pub struct Entry {
    /// Display title.
    pub title: String,
    /// Canonical link.
    pub url: String,
    /// Free text, [`DEFAULT_DESCRIPTION`] when the source has none.
    pub description: String,
    /// Bookmark count.
    pub count: u64,
    /// Source-provided timestamp, kept verbatim.
    pub date: Option<String>,
}

impl Entry {
    /// Create a new entry with the default description and no date.
    pub fn new(title: impl Into<String>, url: impl Into<String>, count: u64) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            description: DEFAULT_DESCRIPTION.to_string(),
            count,
            date: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Check whether the entry reaches the given bookmark threshold (inclusive).
    pub fn meets_threshold(&self, threshold: i64) -> bool {
        i128::from(self.count) >= i128::from(threshold)
    }

    /// Synthetic item id: URL and count joined by `-`.
    pub fn guid(&self) -> String {
        format!("{}-{}", self.url, self.count)
    }
}

/// Primary API entry as it arrives on the wire.
#[derive(Deserialize)]
struct RawEntry {
    title: String,
    url: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    count: Option<RawCount>,
    #[serde(default)]
    date: Option<String>,
}

/// Bookmark counts show up both as numbers and as numeric strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Number(u64),
    Text(String),
}

impl RawCount {
    fn value(&self) -> u64 {
        match self {
            RawCount::Number(n) => *n,
            RawCount::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }
}

impl From<RawEntry> for Entry {
    fn from(raw: RawEntry) -> Self {
        Self {
            title: raw.title,
            url: raw.url,
            description: raw
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            count: raw.count.map(|c| c.value()).unwrap_or(0),
            date: raw.date,
        }
    }
}

/// The most recently fetched entries plus their fetch time.
///
/// `entries` and `fetched_at` are both `None` until the first successful refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Entries in upstream order.
    pub entries: Option<Arc<Vec<Entry>>>,
    /// When the entries were fetched.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Create a snapshot from freshly fetched entries.
    pub fn new(entries: Vec<Entry>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            entries: Some(Arc::new(entries)),
            fetched_at: Some(fetched_at),
        }
    }

    /// Number of entries held, 0 before the first refresh.
    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |e| e.len())
    }

    /// Check whether no entries are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
