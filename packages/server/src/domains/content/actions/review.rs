//! Approve 1 review actions.
//!
//! Decisions are conditional on `status = 'found'`, so two moderators acting
//! on the same item cannot both win: the loser gets `STALE_DATA`.

use tracing::{error, info, warn};

use crate::common::{ActionError, ActionResult, NewsItemId};
use crate::domains::content::models::{Approve1Decision, ContentItem};
use crate::kernel::{log_system_event, ServerDeps, SystemEventKind};

/// Recorded as the decider when the request carries no user.
pub const DEFAULT_DECIDER: &str = "dashboard";

pub const APPROVED_MESSAGE: &str = "News approved, drafts generated";
pub const APPROVED_WITHOUT_GENERATION_MESSAGE: &str =
    "News approved, draft generation not configured";

/// Approve an item and wait for its drafts to be generated.
pub async fn approve_content_item(
    news_id: NewsItemId,
    user_id: Option<&str>,
    deps: &ServerDeps,
) -> ActionResult<()> {
    let decided_by = user_id.unwrap_or(DEFAULT_DECIDER);
    info!(news_id = %news_id, decided_by = %decided_by, "Approving content item");

    match ContentItem::decide(news_id, Approve1Decision::Approved, decided_by, &deps.db_pool).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            warn!(news_id = %news_id, "Approve skipped, item already processed");
            return ActionResult::fail(ActionError::stale());
        }
        Err(e) => {
            error!(news_id = %news_id, error = %e, "Failed to approve content item");
            return ActionResult::fail(ActionError::from(e));
        }
    }

    if !deps.draft_generator.is_configured() {
        warn!(news_id = %news_id, "Approved without draft generation");
        log_system_event(
            &deps.stream_hub,
            "Draft generation is not configured",
            SystemEventKind::Error,
        )
        .await;
        return ActionResult::done().with_message(APPROVED_WITHOUT_GENERATION_MESSAGE);
    }

    log_system_event(
        &deps.stream_hub,
        "Generating drafts for approved news...",
        SystemEventKind::Thinking,
    )
    .await;

    if let Err(e) = deps.draft_generator.generate_drafts(news_id).await {
        error!(news_id = %news_id, error = %e, "Draft generation failed");
        log_system_event(&deps.stream_hub, "Draft generation failed", SystemEventKind::Error).await;
        return ActionResult::fail(ActionError::generation(format!(
            "Generation failed: {:#}",
            e
        )));
    }

    info!(news_id = %news_id, "Drafts generated");
    log_system_event(&deps.stream_hub, "Drafts ready", SystemEventKind::Success).await;
    ActionResult::done().with_message(APPROVED_MESSAGE)
}

/// Reject an item. The updated row is returned as `data`.
pub async fn reject_content_item(
    news_id: NewsItemId,
    user_id: Option<&str>,
    deps: &ServerDeps,
) -> ActionResult<ContentItem> {
    let decided_by = user_id.unwrap_or(DEFAULT_DECIDER);
    info!(news_id = %news_id, decided_by = %decided_by, "Rejecting content item");

    match ContentItem::decide(news_id, Approve1Decision::Rejected, decided_by, &deps.db_pool).await {
        Ok(Some(item)) => ActionResult::ok(item),
        Ok(None) => {
            warn!(news_id = %news_id, "Reject skipped, item already processed");
            ActionResult::fail(ActionError::stale())
        }
        Err(e) => {
            error!(news_id = %news_id, error = %e, "Failed to reject content item");
            ActionResult::fail(ActionError::from(e))
        }
    }
}

/// Clear the "new" marker. Unknown ids are not an error.
pub async fn mark_content_viewed(news_id: NewsItemId, deps: &ServerDeps) -> ActionResult<()> {
    match ContentItem::mark_viewed(news_id, &deps.db_pool).await {
        Ok(()) => ActionResult::done(),
        Err(e) => {
            error!(news_id = %news_id, error = %e, "Failed to mark content viewed");
            ActionResult::fail(ActionError::from(e))
        }
    }
}
