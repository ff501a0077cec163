//! GET /api/debug/draft-image?id=

use axum::{
    extract::Extension,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::common::utils::take_chars;
use crate::common::{ActionError, ReviewItemId};
use crate::domains::review::models::DraftImage;
use crate::domains::settings::models::ProjectSetting;
use crate::server::app::AppState;
use crate::server::error::ApiQuery;

const TOKEN_PREVIEW_CHARS: usize = 8;

#[derive(Debug, Deserialize)]
pub struct DraftImageQuery {
    id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftImageDebug {
    pub draft: DraftImage,
    pub token_configured: bool,
    pub token_preview: Option<String>,
}

pub fn token_preview(token: &str) -> String {
    format!("{}…", take_chars(token, TOKEN_PREVIEW_CHARS))
}

pub async fn debug_draft_image_handler(
    Extension(state): Extension<AppState>,
    ApiQuery(query): ApiQuery<DraftImageQuery>,
) -> Response {
    let Some(raw_id) = query.id.filter(|id| !id.is_empty()) else {
        return ActionError::invalid("id parameter required").into_response();
    };
    let Ok(id) = ReviewItemId::parse(&raw_id) else {
        return ActionError::invalid(format!("Invalid id '{}'", raw_id)).into_response();
    };

    let pool = state.db_pool();
    let draft = match DraftImage::find_by_id(id, pool).await {
        Ok(Some(draft)) => draft,
        Ok(None) => return ActionError::not_found(format!("Draft {} not found", id)).into_response(),
        Err(e) => {
            error!(review_id = %id, error = %e, "Failed to load draft");
            return ActionError::database(format!("{:#}", e)).into_response();
        }
    };

    let token = match ProjectSetting::telegram_bot_token(&state.deps.project_key, pool).await {
        Ok(token) => token,
        Err(e) => {
            warn!(error = %e, "Failed to read Telegram bot token");
            None
        }
    };

    Json(DraftImageDebug {
        draft,
        token_configured: token.is_some(),
        token_preview: token.as_deref().map(token_preview),
    })
    .into_response()
}
