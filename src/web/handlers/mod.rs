//! HTTP handlers for hotfeed.

pub mod feed;
pub mod index;

pub use feed::*;
pub use index::*;

use std::sync::Arc;

use crate::config::Config;
use crate::hotentry::{EntryStore, UpstreamClient};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Upstream client used for live feed requests.
    pub client: UpstreamClient,
    /// Snapshot kept fresh by the refresh scheduler.
    pub store: Arc<EntryStore>,
    /// Threshold used when a request does not carry a usable one.
    pub default_threshold: i64,
    /// Base URL for channel links; the Host header is used when unset.
    pub public_url: Option<String>,
    /// Timezone for displaying the last update time.
    pub timezone: String,
}

impl AppState {
    /// Create a new application state.
    pub fn new(client: UpstreamClient, store: Arc<EntryStore>, config: &Config) -> Self {
        Self {
            client,
            store,
            default_threshold: config.feed.default_threshold,
            public_url: config.server.public_url.clone(),
            timezone: config.server.timezone.clone(),
        }
    }
}
