//! HTTP rendering of the action envelope.
//!
//! The extractors below replace axum's `Json`, `Query` and `Path` in route
//! signatures so that malformed requests are answered with the failure
//! envelope instead of a plain-text rejection.

use axum::{
    async_trait,
    body::Bytes,
    extract::{
        rejection::{BytesRejection, JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Request,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::common::{ActionError, ActionErrorCode, ActionResult};

impl From<JsonRejection> for ActionError {
    fn from(rejection: JsonRejection) -> Self {
        ActionError::invalid(rejection.body_text())
    }
}

impl From<QueryRejection> for ActionError {
    fn from(rejection: QueryRejection) -> Self {
        ActionError::invalid(rejection.body_text())
    }
}

impl From<PathRejection> for ActionError {
    fn from(rejection: PathRejection) -> Self {
        ActionError::invalid(rejection.body_text())
    }
}

impl From<BytesRejection> for ActionError {
    fn from(rejection: BytesRejection) -> Self {
        ActionError::invalid(rejection.body_text())
    }
}

/// JSON body. Requires `Content-Type: application/json`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ActionError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ActionError))]
pub struct ApiQuery<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ActionError))]
pub struct ApiPath<T>(pub T);

/// Parse a JSON body that may be absent. Empty or whitespace-only bodies are
/// `None`; anything else must be valid JSON for `T`.
pub fn parse_optional_json<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, ActionError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| ActionError::invalid(format!("Invalid JSON body: {}", e)))
}

/// Optional JSON body, for endpoints the dashboard calls without one.
/// The content type is not checked.
#[derive(Debug)]
pub struct OptionalJson<T>(pub Option<T>);

#[async_trait]
impl<T, S> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ActionError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await?;
        parse_optional_json(&body).map(Self)
    }
}

pub fn status_for(code: ActionErrorCode) -> StatusCode {
    match code {
        ActionErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ActionErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ActionErrorCode::NotFound => StatusCode::NOT_FOUND,
        ActionErrorCode::StaleData => StatusCode::CONFLICT,
        ActionErrorCode::Upstream => StatusCode::BAD_GATEWAY,
        ActionErrorCode::Database | ActionErrorCode::Generation | ActionErrorCode::Unknown => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl<T: Serialize> IntoResponse for ActionResult<T> {
    fn into_response(self) -> Response {
        let status = match &self {
            ActionResult::Success { .. } => StatusCode::OK,
            ActionResult::Failure(error) => status_for(error.code),
        };
        (status, Json(self)).into_response()
    }
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        ActionResult::<()>::fail(self).into_response()
    }
}
