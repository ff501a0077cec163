//! POST /api/log-client-error
//!
//! The origin is checked before the body is read, so foreign callers get 403
//! whatever they send.

use axum::{
    body::Bytes,
    extract::Extension,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::common::ActionError;
use crate::domains::client_errors::{is_allowed_origin, report_client_error, ClientErrorReport};
use crate::server::app::AppState;
use crate::server::error::parse_optional_json;

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<&str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

pub async fn client_error_handler(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let origin = header_str(&headers, header::ORIGIN);
    let host = header_str(&headers, header::HOST);

    if !is_allowed_origin(origin, host, state.config.app_url.as_deref()) {
        warn!(origin = ?origin, "Client error report from foreign origin");
        return ActionError::forbidden("forbidden").into_response();
    }

    let report: ClientErrorReport = match parse_optional_json(&body) {
        Ok(report) => report.unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "Unreadable client error report");
            return e.into_response();
        }
    };

    report_client_error(&report, &state.deps).await;
    Json(json!({ "ok": true })).into_response()
}
