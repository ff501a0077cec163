//! Read-side content actions backing the board tabs and counters.

use tracing::error;

use crate::common::{ActionError, ActionResult};
use crate::domains::content::models::{ContentFilter, ContentItem, ContentStats, SourceCount};
use crate::kernel::ServerDeps;

pub const DEFAULT_PAGE_SIZE: i64 = 100;
pub const MAX_PAGE_SIZE: i64 = 500;

/// Items of one board tab, newest first.
pub async fn get_content_items(
    filter: ContentFilter,
    limit: Option<i64>,
    deps: &ServerDeps,
) -> ActionResult<Vec<ContentItem>> {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    match ContentItem::find_filtered(filter, limit, &deps.db_pool).await {
        Ok(items) => ActionResult::ok(items),
        Err(e) => {
            error!(filter = %filter, error = %e, "Failed to load content items");
            ActionResult::fail(ActionError::from(e))
        }
    }
}

/// Tab counters. Falls back to zeros so the board still renders.
pub async fn get_content_stats(deps: &ServerDeps) -> ContentStats {
    match ContentStats::load(&deps.db_pool).await {
        Ok(stats) => stats,
        Err(e) => {
            error!(error = %e, "Failed to load content stats");
            ContentStats::default()
        }
    }
}

/// Per-source counts for one tab. Empty on failure.
pub async fn get_content_stats_by_source(
    filter: ContentFilter,
    deps: &ServerDeps,
) -> Vec<SourceCount> {
    match SourceCount::by_source(filter, &deps.db_pool).await {
        Ok(counts) => counts,
        Err(e) => {
            error!(filter = %filter, error = %e, "Failed to load source stats");
            Vec::new()
        }
    }
}
