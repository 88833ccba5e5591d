//! Hot entry pipeline for hotfeed.
//!
//! Fetches hot entries from Hatena Bookmark, keeps the latest snapshot in
//! memory, refreshes it in the background and renders filtered RSS feeds.

pub mod client;
pub mod feed;
pub mod scheduler;
pub mod store;
pub mod types;

pub use client::UpstreamClient;
pub use feed::{build_feed, error_feed, filter_entries, render_feed, FeedLinks, FeedOutcome};
pub use scheduler::{RefreshScheduler, DEFAULT_REFRESH_INTERVAL_SECS, MIN_REFRESH_INTERVAL_SECS};
pub use store::EntryStore;
pub use types::{Entry, Snapshot, DEFAULT_DESCRIPTION, DEFAULT_THRESHOLD, DEFAULT_TITLE};
