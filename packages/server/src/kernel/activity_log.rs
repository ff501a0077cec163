//! Dashboard activity log.
//!
//! Short human-readable status lines ("Scanning sources...", "3 new items")
//! pushed to the `system-log` stream for the dashboard ticker.

use serde::{Deserialize, Serialize};

use super::stream_hub::{topics, StreamHub};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemEventKind {
    Info,
    Success,
    Wait,
    Error,
    Thinking,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemEvent {
    /// SSE event name, always `system-log`
    #[serde(rename = "type")]
    pub event_type: String,
    pub text: String,
    pub kind: SystemEventKind,
}

impl SystemEvent {
    pub fn new(text: impl Into<String>, kind: SystemEventKind) -> Self {
        Self {
            event_type: topics::SYSTEM_LOG.to_string(),
            text: text.into(),
            kind,
        }
    }
}

pub async fn log_system_event(hub: &StreamHub, text: impl Into<String>, kind: SystemEventKind) {
    let event = SystemEvent::new(text, kind);
    tracing::debug!(kind = ?event.kind, text = %event.text, "System event");
    hub.publish_event(topics::SYSTEM_LOG, &event).await;
}
