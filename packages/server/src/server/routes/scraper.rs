//! POST /api/scraper
//!
//! Scrapes article text for a URL given directly or looked up from a news or
//! review item.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::common::{ActionError, NewsItemId, ReviewItemId};
use crate::domains::content::models::ContentItem;
use crate::domains::review::models::ReviewItem;
use crate::kernel::ServerDeps;
use crate::server::app::AppState;
use crate::server::error::ApiJson;

#[derive(Debug, Default, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub news_id: Option<String>,
    #[serde(default)]
    pub review_id: Option<String>,
    /// Optional CSS selector for the article body
    #[serde(default)]
    pub selector: Option<String>,
}

/// Canonical URL of the referenced item. Lookup problems are logged and
/// treated as "no URL".
async fn lookup_url(request: &ScrapeRequest, deps: &ServerDeps) -> Option<String> {
    let result = if let Some(news_id) = request.news_id.as_deref().filter(|s| !s.is_empty()) {
        match NewsItemId::parse(news_id) {
            Ok(id) => ContentItem::find_canonical_url(id, &deps.db_pool).await,
            Err(e) => Err(anyhow::anyhow!("Invalid news_id '{}': {}", news_id, e)),
        }
    } else if let Some(review_id) = request.review_id.as_deref().filter(|s| !s.is_empty()) {
        match ReviewItemId::parse(review_id) {
            Ok(id) => ReviewItem::find_canonical_url(id, &deps.db_pool).await,
            Err(e) => Err(anyhow::anyhow!("Invalid review_id '{}': {}", review_id, e)),
        }
    } else {
        return None;
    };

    match result {
        Ok(url) => {
            info!(url = ?url, "Resolved scrape URL from database");
            url
        }
        Err(e) => {
            error!(error = %e, "Scrape URL lookup failed");
            None
        }
    }
}

pub async fn scraper_handler(
    Extension(state): Extension<AppState>,
    ApiJson(request): ApiJson<ScrapeRequest>,
) -> Response {
    let deps = &state.deps;

    let provided = request.url.clone().filter(|u| !u.trim().is_empty());
    let has_url_in_request = provided.is_some();
    let target = match provided {
        Some(url) => Some(url),
        None => lookup_url(&request, deps).await,
    };

    let Some(target) = target else {
        warn!(news_id = ?request.news_id, review_id = ?request.review_id, "No URL to scrape");
        let error = ActionError::invalid("URL is required but was not found in request or database");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": error,
                "debug": {
                    "news_id": request.news_id,
                    "review_id": request.review_id,
                    "hasUrlInRequest": has_url_in_request,
                },
            })),
        )
            .into_response();
    };

    info!(url = %target, "Scraping article");
    match deps
        .scraper
        .scrape_article(&target, request.selector.as_deref())
        .await
    {
        Ok(text) => Json(json!({
            "success": true,
            "length": text.chars().count(),
            "text": text,
        }))
        .into_response(),
        Err(e) => {
            error!(url = %target, error = %e, "Scrape failed");
            ActionError::upstream(format!("{:#}", e)).into_response()
        }
    }
}
