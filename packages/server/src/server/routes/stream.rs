//! SSE streaming endpoint.
//!
//! GET /api/streams/:topic
//!
//! Subscribes to StreamHub by topic string and forwards JSON values as SSE
//! events. Only the dashboard activity log is exposed.

use std::convert::Infallible;

use axum::{
    extract::Extension,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, StreamExt};
use tokio_stream::wrappers::BroadcastStream;

use crate::common::ActionError;
use crate::kernel::stream_hub::topics;
use crate::server::app::AppState;
use crate::server::error::ApiPath;

/// SSE stream handler.
///
/// The `type` field of each payload becomes the SSE event name.
pub async fn stream_handler(
    Extension(state): Extension<AppState>,
    ApiPath(topic): ApiPath<String>,
) -> Result<Sse<impl futures::Stream<Item = Result<Event, Infallible>>>, ActionError> {
    if topic != topics::SYSTEM_LOG {
        return Err(ActionError::not_found(format!("Unknown stream topic '{}'", topic)));
    }

    let rx = state.deps.stream_hub.subscribe(&topic).await;

    // Stream with connected event and lag handling
    let connected =
        stream::once(async { Ok::<_, Infallible>(Event::default().event("connected").data("ok")) });

    let events = BroadcastStream::new(rx).filter_map(|result| async {
        match result {
            Ok(value) => {
                let event_name = value
                    .get("type")
                    .and_then(|t| t.as_str())
                    .unwrap_or("message");
                Event::default()
                    .event(event_name)
                    .json_data(&value)
                    .ok()
                    .map(Ok)
            }
            Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(n)) => {
                Event::default()
                    .event("lagged")
                    .json_data(&serde_json::json!({"missed": n}))
                    .ok()
                    .map(Ok)
            }
        }
    });

    Ok(Sse::new(connected.chain(events)).keep_alive(KeepAlive::default()))
}
