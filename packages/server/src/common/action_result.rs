//! Uniform result envelope returned by every action and API boundary.
//!
//! On the wire the envelope is a discriminated union keyed by `success`:
//!
//! ```json
//! { "success": true, "message": "...", "data": { ... } }
//! { "success": false, "error": { "code": "STALE_DATA", "message": "Already processed" } }
//! ```
//!
//! Actions never return `Err` past their boundary. Internal helpers use
//! `anyhow::Result` or [`ActionError`] and are converted with
//! [`ActionResult::from_result`].

use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Closed set of failure kinds shared by actions and HTTP routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionErrorCode {
    /// The row was already processed by someone else.
    #[serde(rename = "STALE_DATA")]
    StaleData,
    /// The database rejected or failed the operation.
    #[serde(rename = "SUPABASE_ERROR")]
    Database,
    /// Draft generation after approval failed.
    #[serde(rename = "GENERATION_ERROR")]
    Generation,
    #[serde(rename = "UNKNOWN_ERROR")]
    Unknown,
    #[serde(rename = "INVALID_REQUEST")]
    InvalidRequest,
    #[serde(rename = "NOT_FOUND")]
    NotFound,
    #[serde(rename = "FORBIDDEN")]
    Forbidden,
    /// An external HTTP service (scrape target, Threads, Telegram) failed.
    #[serde(rename = "UPSTREAM_ERROR")]
    Upstream,
}

impl ActionErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StaleData => "STALE_DATA",
            Self::Database => "SUPABASE_ERROR",
            Self::Generation => "GENERATION_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::Upstream => "UPSTREAM_ERROR",
        }
    }
}

/// Structured failure carried by [`ActionResult::Failure`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{}: {message}", .code.as_str())]
pub struct ActionError {
    pub code: ActionErrorCode,
    pub message: String,
}

impl ActionError {
    pub fn new(code: ActionErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn stale() -> Self {
        Self::new(ActionErrorCode::StaleData, "Already processed")
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ActionErrorCode::Database, message)
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::new(ActionErrorCode::Generation, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ActionErrorCode::Unknown, message)
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ActionErrorCode::InvalidRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ActionErrorCode::NotFound, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ActionErrorCode::Forbidden, message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ActionErrorCode::Upstream, message)
    }
}

impl From<sqlx::Error> for ActionError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::not_found("Row not found"),
            other => Self::database(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for ActionError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<sqlx::Error>() {
            Ok(sqlx_err) => sqlx_err.into(),
            Err(err) => match err.downcast::<ActionError>() {
                Ok(action_err) => action_err,
                Err(err) => Self::unknown(format!("{:#}", err)),
            },
        }
    }
}

/// Discriminated success/failure envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult<T> {
    Success {
        message: Option<String>,
        data: Option<T>,
    },
    Failure(ActionError),
}

impl<T> ActionResult<T> {
    pub fn ok(data: T) -> Self {
        Self::Success {
            message: None,
            data: Some(data),
        }
    }

    /// Success without payload.
    pub fn done() -> Self {
        Self::Success {
            message: None,
            data: None,
        }
    }

    pub fn fail(error: ActionError) -> Self {
        Self::Failure(error)
    }

    /// Attach a human-readable message to a success. No-op on failure.
    pub fn with_message(self, text: impl Into<String>) -> Self {
        match self {
            Self::Success { data, .. } => Self::Success {
                message: Some(text.into()),
                data,
            },
            failure => failure,
        }
    }

    /// Convert an internal result, mapping the error into the taxonomy.
    pub fn from_result<E: Into<ActionError>>(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::Failure(err.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data, .. } => data.as_ref(),
            Self::Failure(_) => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success { data, .. } => data,
            Self::Failure(_) => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { message, .. } => message.as_deref(),
            Self::Failure(err) => Some(err.message.as_str()),
        }
    }

    pub fn error(&self) -> Option<&ActionError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(err) => Some(err),
        }
    }
}

impl<T, E: Into<ActionError>> From<Result<T, E>> for ActionResult<T> {
    fn from(result: Result<T, E>) -> Self {
        Self::from_result(result)
    }
}

impl<T: Serialize> Serialize for ActionResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success { message, data } => {
                let len = 1 + message.is_some() as usize + data.is_some() as usize;
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("success", &true)?;
                if let Some(message) = message {
                    map.serialize_entry("message", message)?;
                }
                if let Some(data) = data {
                    map.serialize_entry("data", data)?;
                }
                map.end()
            }
            Self::Failure(error) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", error)?;
                map.end()
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
struct WireEnvelope<T> {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    error: Option<ActionError>,
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ActionResult<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireEnvelope::<T>::deserialize(deserializer)?;
        if wire.success {
            Ok(Self::Success {
                message: wire.message,
                data: wire.data,
            })
        } else {
            let error = wire
                .error
                .ok_or_else(|| serde::de::Error::missing_field("error"))?;
            Ok(Self::Failure(error))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_serializes_without_absent_fields() {
        let result: ActionResult<()> = ActionResult::done();
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({"success": true}));

        let result = ActionResult::ok(json!({"inserted": 3})).with_message("Ingestion finished");
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"success": true, "message": "Ingestion finished", "data": {"inserted": 3}})
        );
    }

    #[test]
    fn failure_uses_wire_codes() {
        let result: ActionResult<()> = ActionResult::fail(ActionError::stale());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"success": false, "error": {"code": "STALE_DATA", "message": "Already processed"}})
        );

        let result: ActionResult<()> = ActionResult::fail(ActionError::database("boom"));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["error"]["code"], "SUPABASE_ERROR");
    }

    #[test]
    fn failure_requires_error_object() {
        let parsed: Result<ActionResult<()>, _> =
            serde_json::from_value(json!({"success": false}));
        assert!(parsed.is_err());

        let parsed: ActionResult<()> = serde_json::from_value(
            json!({"success": false, "error": {"code": "GENERATION_ERROR", "message": "x"}}),
        )
        .unwrap();
        assert_eq!(parsed.error().unwrap().code, ActionErrorCode::Generation);
    }

    #[test]
    fn anyhow_errors_keep_their_kind() {
        let err: ActionError = anyhow::Error::new(sqlx::Error::RowNotFound).into();
        assert_eq!(err.code, ActionErrorCode::NotFound);

        let err: ActionError = anyhow::Error::new(ActionError::stale()).into();
        assert_eq!(err.code, ActionErrorCode::StaleData);

        let err: ActionError = anyhow::anyhow!("feed exploded").into();
        assert_eq!(err.code, ActionErrorCode::Unknown);
        assert_eq!(err.message, "feed exploded");
    }

    #[test]
    fn with_message_leaves_failures_alone() {
        let result: ActionResult<()> =
            ActionResult::fail(ActionError::unknown("nope")).with_message("ignored");
        assert_eq!(result.message(), Some("nope"));
        assert!(!result.is_success());
    }
}
