//! Feed handlers for the HTTP surface.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::hotentry::feed::FEED_CONTENT_TYPE;
use crate::hotentry::{build_feed, FeedLinks, FeedOutcome};
use crate::web::handlers::AppState;

/// Query parameters of the feed endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    /// Minimum bookmark count, kept raw so bad input can fall back.
    pub threshold: Option<String>,
}

/// GET /hotentry/all/feed - Threshold-filtered RSS 2.0 feed.
///
/// Also served as /hotentry/all/feed/nocache.
pub async fn hotentry_feed(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
    query: Option<Query<FeedQuery>>,
) -> FeedOutcome {
    let raw = query.as_ref().and_then(|Query(q)| q.threshold.as_deref());
    let threshold = parse_threshold(raw, state.default_threshold);
    let links = feed_links(state.public_url.as_deref(), &headers, &uri);

    tracing::debug!(threshold, feed = %links.feed, "Feed requested");
    build_feed(&state.client, threshold, &links).await
}

/// Parse the `threshold` query value, falling back to `default`.
pub fn parse_threshold(raw: Option<&str>, default: i64) -> i64 {
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::debug!(value, default, "Invalid threshold, using default");
            default
        }),
        None => default,
    }
}

/// Site root and full request URL for the channel.
///
/// The root comes from the configured public URL, otherwise from the Host
/// header. It never ends with `/`.
pub fn feed_links(public_url: Option<&str>, headers: &HeaderMap, uri: &Uri) -> FeedLinks {
    let site = match public_url {
        Some(base) => base.trim_end_matches('/').to_string(),
        None => {
            let host = headers
                .get(header::HOST)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("localhost");
            format!("http://{host}")
        }
    };

    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    let feed = format!("{site}{path}");

    FeedLinks::new(site, feed)
}

impl IntoResponse for FeedOutcome {
    fn into_response(self) -> Response {
        let status = if self.is_error() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::OK
        };
        (
            status,
            [(header::CONTENT_TYPE, FEED_CONTENT_TYPE)],
            self.into_body(),
        )
            .into_response()
    }
}
