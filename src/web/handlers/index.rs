//! Index page handler.

use axum::{extract::State, response::Html};
use std::sync::Arc;

use crate::datetime::format_local;
use crate::web::handlers::AppState;

/// Shown when no refresh has succeeded yet.
pub const NOT_FETCHED: &str = "未取得";

/// GET / - Service status page.
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let snapshot = state.store.read();
    let last_update = snapshot
        .fetched_at
        .map(|dt| format_local(&dt, &state.timezone))
        .unwrap_or_else(|| NOT_FETCHED.to_string());

    Html(render_index(&last_update, snapshot.len(), state.default_threshold))
}

fn render_index(last_update: &str, entry_count: usize, default_threshold: i64) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
<meta charset="utf-8">
<title>Hatena Hotentry RSS</title>
</head>
<body>
<h1>Hatena Hotentry RSS</h1>
<p>最終更新: {last_update}</p>
<p>キャッシュ済みエントリー数: {entry_count}</p>
<ul>
<li><a href="/hotentry/all/feed">/hotentry/all/feed</a> (threshold: {default_threshold})</li>
<li><a href="/hotentry/all/feed?threshold=500">/hotentry/all/feed?threshold=500</a></li>
</ul>
</body>
</html>
"#
    )
}
