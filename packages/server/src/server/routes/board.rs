//! GET /content - server-rendered review board

use axum::extract::Extension;
use axum::response::Html;
use serde::Deserialize;

use crate::domains::content::actions::{get_content_items, get_content_stats};
use crate::domains::content::ContentFilter;
use crate::server::app::AppState;
use crate::server::error::ApiQuery;
use crate::server::views::content_board;

/// Raw board parameters. Kept as strings so a hand-edited URL never fails
/// the page.
#[derive(Debug, Default, Deserialize)]
pub struct BoardQuery {
    pub filter: Option<String>,
    pub limit: Option<String>,
}

impl BoardQuery {
    pub fn filter(&self) -> ContentFilter {
        self.filter
            .as_deref()
            .and_then(|f| f.parse::<ContentFilter>().ok())
            .unwrap_or_default()
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit.as_deref().and_then(|l| l.trim().parse().ok())
    }
}

/// Unknown filters fall back to the pending tab, an unreadable limit to the
/// default page size; load failures render an empty board.
pub async fn content_board_handler(
    Extension(state): Extension<AppState>,
    ApiQuery(query): ApiQuery<BoardQuery>,
) -> Html<String> {
    let filter = query.filter();

    let stats = get_content_stats(&state.deps).await;
    let items = get_content_items(filter, query.limit(), &state.deps)
        .await
        .into_data()
        .unwrap_or_default();

    Html(content_board::render(filter, &stats, &items))
}
