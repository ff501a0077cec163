//! Realtime change stream.
//!
//! GET /api/realtime/:table?filter=column=eq.value
//!
//! Emits `connected` once, then one `changed` event per debounced burst of
//! changes on the table. The subscription is released when the client
//! disconnects and the stream is dropped.

use std::convert::Infallible;

use axum::{
    extract::Extension,
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Response},
};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::common::ActionError;
use crate::kernel::realtime::{ChangeFilter, WatchedTable};
use crate::server::app::AppState;
use crate::server::error::{ApiPath, ApiQuery};

#[derive(Debug, Default, Deserialize)]
pub struct RealtimeQuery {
    filter: Option<String>,
}

pub async fn realtime_handler(
    Extension(state): Extension<AppState>,
    ApiPath(table): ApiPath<String>,
    ApiQuery(query): ApiQuery<RealtimeQuery>,
) -> Response {
    let table: WatchedTable = match table.parse() {
        Ok(table) => table,
        Err(e) => return ActionError::invalid(format!("{}", e)).into_response(),
    };
    let filter: Option<ChangeFilter> = match query.filter.as_deref().filter(|f| !f.is_empty()) {
        Some(raw) => match raw.parse() {
            Ok(filter) => Some(filter),
            Err(e) => return ActionError::invalid(format!("{}", e)).into_response(),
        },
        None => None,
    };

    let (tx, rx) = mpsc::unbounded_channel::<()>();
    let subscription = state.deps.realtime.subscribe(table, filter, move || {
        let _ = tx.send(());
    });

    let payload = json!({
        "table": table.as_str(),
        "channel": subscription.channel_name(),
    })
    .to_string();

    let connected = stream::once({
        let payload = payload.clone();
        async move { Ok::<_, Infallible>(Event::default().event("connected").data(payload)) }
    });

    let changes = UnboundedReceiverStream::new(rx).map(move |()| {
        // Owned by the stream: dropping the stream tears the subscription down
        let _ = &subscription;
        Ok::<_, Infallible>(Event::default().event("changed").data(payload.clone()))
    });

    Sse::new(connected.chain(changes))
        .keep_alive(KeepAlive::default())
        .into_response()
}
