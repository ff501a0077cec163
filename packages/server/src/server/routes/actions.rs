//! JSON endpoints over the action layer.
//!
//! Every handler answers with the action envelope; body, path and query
//! parsing failures become `INVALID_REQUEST`.

use axum::extract::Extension;
use serde::Deserialize;

use crate::common::{ActionError, ActionResult, IngestionSourceId, NewsItemId, SystemPromptId};
use crate::domains::content::actions::{
    approve_content_item, get_content_items, get_content_stats, get_content_stats_by_source,
    mark_content_viewed, reject_content_item,
};
use crate::domains::content::{ContentFilter, ContentItem, ContentStats, SourceCount};
use crate::domains::ingestion::actions::trigger_ingestion;
use crate::domains::ingestion::IngestionReport;
use crate::domains::prompts::actions::{
    get_system_prompt_by_key, get_system_prompts, update_system_prompt,
};
use crate::domains::prompts::{SystemPrompt, SystemPromptUpdate};
use crate::server::app::AppState;
use crate::server::error::{ApiJson, ApiPath, ApiQuery, OptionalJson};

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct IngestionRequest {
    #[serde(default)]
    pub source_ids: Option<Vec<IngestionSourceId>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContentQuery {
    pub filter: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DecisionRequest {
    #[serde(default)]
    pub user_id: Option<String>,
}

fn parse_filter(raw: Option<&str>) -> Result<ContentFilter, ActionError> {
    match raw.filter(|f| !f.is_empty()) {
        Some(raw) => raw
            .parse()
            .map_err(|e: anyhow::Error| ActionError::invalid(e.to_string())),
        None => Ok(ContentFilter::default()),
    }
}

fn parse_news_id(raw: &str) -> Result<NewsItemId, ActionError> {
    NewsItemId::parse(raw).map_err(|_| ActionError::invalid(format!("Invalid news id '{}'", raw)))
}

// =============================================================================
// Ingestion
// =============================================================================

pub async fn ingestion_handler(
    Extension(state): Extension<AppState>,
    OptionalJson(body): OptionalJson<IngestionRequest>,
) -> ActionResult<IngestionReport> {
    let source_ids = body.and_then(|request| request.source_ids);
    trigger_ingestion(source_ids, &state.deps).await
}

// =============================================================================
// Prompts
// =============================================================================

pub async fn prompts_handler(Extension(state): Extension<AppState>) -> ActionResult<Vec<SystemPrompt>> {
    get_system_prompts(&state.deps).await
}

pub async fn prompt_by_key_handler(
    Extension(state): Extension<AppState>,
    ApiPath(key): ApiPath<String>,
) -> ActionResult<SystemPrompt> {
    get_system_prompt_by_key(&key, &state.deps).await
}

pub async fn update_prompt_handler(
    Extension(state): Extension<AppState>,
    ApiPath(raw_id): ApiPath<String>,
    ApiJson(changes): ApiJson<SystemPromptUpdate>,
) -> ActionResult<()> {
    let Ok(id) = raw_id.parse::<SystemPromptId>() else {
        return ActionResult::fail(ActionError::invalid(format!("Invalid prompt id '{}'", raw_id)));
    };
    update_system_prompt(id, changes, &state.deps).await
}

// =============================================================================
// Content
// =============================================================================

pub async fn content_items_handler(
    Extension(state): Extension<AppState>,
    ApiQuery(query): ApiQuery<ContentQuery>,
) -> ActionResult<Vec<ContentItem>> {
    match parse_filter(query.filter.as_deref()) {
        Ok(filter) => get_content_items(filter, query.limit, &state.deps).await,
        Err(e) => ActionResult::fail(e),
    }
}

pub async fn content_stats_handler(Extension(state): Extension<AppState>) -> ActionResult<ContentStats> {
    ActionResult::ok(get_content_stats(&state.deps).await)
}

pub async fn source_stats_handler(
    Extension(state): Extension<AppState>,
    ApiQuery(query): ApiQuery<ContentQuery>,
) -> ActionResult<Vec<SourceCount>> {
    match parse_filter(query.filter.as_deref()) {
        Ok(filter) => ActionResult::ok(get_content_stats_by_source(filter, &state.deps).await),
        Err(e) => ActionResult::fail(e),
    }
}

pub async fn approve_content_handler(
    Extension(state): Extension<AppState>,
    ApiPath(raw_id): ApiPath<String>,
    OptionalJson(body): OptionalJson<DecisionRequest>,
) -> ActionResult<()> {
    let news_id = match parse_news_id(&raw_id) {
        Ok(id) => id,
        Err(e) => return ActionResult::fail(e),
    };
    let user_id = body.and_then(|request| request.user_id);
    approve_content_item(news_id, user_id.as_deref(), &state.deps).await
}

pub async fn reject_content_handler(
    Extension(state): Extension<AppState>,
    ApiPath(raw_id): ApiPath<String>,
    OptionalJson(body): OptionalJson<DecisionRequest>,
) -> ActionResult<ContentItem> {
    let news_id = match parse_news_id(&raw_id) {
        Ok(id) => id,
        Err(e) => return ActionResult::fail(e),
    };
    let user_id = body.and_then(|request| request.user_id);
    reject_content_item(news_id, user_id.as_deref(), &state.deps).await
}

pub async fn mark_viewed_handler(
    Extension(state): Extension<AppState>,
    ApiPath(raw_id): ApiPath<String>,
) -> ActionResult<()> {
    match parse_news_id(&raw_id) {
        Ok(news_id) => mark_content_viewed(news_id, &state.deps).await,
        Err(e) => ActionResult::fail(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ActionErrorCode;

    #[test]
    fn test_parse_filter() {
        assert_eq!(parse_filter(None).unwrap(), ContentFilter::Pending);
        assert_eq!(parse_filter(Some("")).unwrap(), ContentFilter::Pending);
        assert_eq!(parse_filter(Some("approved")).unwrap(), ContentFilter::Approved);
        assert_eq!(
            parse_filter(Some("archived")).unwrap_err().code,
            ActionErrorCode::InvalidRequest
        );
    }

    #[test]
    fn test_parse_news_id() {
        assert!(parse_news_id("not-a-uuid").is_err());
        let id = NewsItemId::new();
        assert_eq!(parse_news_id(&id.to_string()).unwrap(), id);
    }
}
