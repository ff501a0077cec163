//! POST /api/integrations/threads-metadata
//!
//! Resolves the Threads profile behind an access token on the server side.

use axum::{extract::Extension, response::IntoResponse, response::Response, Json};
use serde::Deserialize;
use tracing::{error, warn};

use crate::common::ActionError;
use crate::server::app::AppState;
use crate::server::error::ApiJson;

#[derive(Debug, Default, Deserialize)]
pub struct ThreadsMetadataRequest {
    #[serde(rename = "accessToken", default)]
    pub access_token: Option<String>,
}

pub async fn threads_metadata_handler(
    Extension(state): Extension<AppState>,
    ApiJson(request): ApiJson<ThreadsMetadataRequest>,
) -> Response {
    let Some(token) = request.access_token.filter(|t| !t.is_empty()) else {
        return ActionError::invalid("Access token is required").into_response();
    };

    let profile = match state.deps.threads.fetch_profile(&token).await {
        Ok(profile) => profile,
        Err(e) => {
            error!(error = %e, "Threads profile request failed");
            return ActionError::upstream(format!("{:#}", e)).into_response();
        }
    };

    if let Some(api_error) = profile.get("error") {
        let message = api_error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Threads API error");
        warn!(error = %api_error, "Threads API rejected the token");
        return ActionError::invalid(message).into_response();
    }

    Json(profile).into_response()
}
