//! hotfeed - Hatena Bookmark hot entries as an RSS feed
//!
//! Fetches the hot entry list, keeps a periodically refreshed snapshot in
//! memory and serves a threshold-filtered RSS 2.0 feed over HTTP.

pub mod config;
pub mod datetime;
pub mod error;
pub mod hotentry;
pub mod logging;
pub mod web;

pub use config::Config;
pub use error::{HotfeedError, Result, SourceError};
pub use hotentry::{
    build_feed, error_feed, filter_entries, render_feed, Entry, EntryStore, FeedLinks, FeedOutcome,
    RefreshScheduler, Snapshot, UpstreamClient,
};
pub use web::{AppState, WebServer};
