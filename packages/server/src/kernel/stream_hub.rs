//! In-process pub/sub hub feeding the SSE stream endpoints.
//!
//! Topics are plain strings (see [`topics`]); payloads are JSON objects whose
//! `type` field becomes the SSE event name.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Well-known topic names.
pub mod topics {
    /// Dashboard activity log (ingestion progress, approvals, ...).
    pub const SYSTEM_LOG: &str = "system-log";
}

/// Topic-keyed broadcast channels. Cheap to clone.
#[derive(Clone)]
pub struct StreamHub {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<serde_json::Value>>>>,
    capacity: usize,
}

impl StreamHub {
    /// 256 buffered messages per topic.
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    /// Publish to a topic. Dropped silently when nobody listens.
    pub async fn publish(&self, topic: &str, value: serde_json::Value) {
        let channels = self.channels.read().await;
        if let Some(tx) = channels.get(topic) {
            let _ = tx.send(value);
        }
    }

    /// Serialize and publish. Serialization failures are logged and dropped.
    pub async fn publish_event<T: Serialize>(&self, topic: &str, event: &T) {
        match serde_json::to_value(event) {
            Ok(value) => self.publish(topic, value).await,
            Err(e) => tracing::warn!(topic = %topic, error = %e, "Failed to serialize stream event"),
        }
    }

    /// Subscribe to a topic, creating its channel on first use.
    pub async fn subscribe(&self, topic: &str) -> broadcast::Receiver<serde_json::Value> {
        let mut channels = self.channels.write().await;
        channels
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Drop channels nobody is subscribed to.
    pub async fn cleanup(&self) {
        self.channels
            .write()
            .await
            .retain(|_, tx| tx.receiver_count() > 0);
    }

    pub async fn topic_count(&self) -> usize {
        self.channels.read().await.len()
    }
}

impl Default for StreamHub {
    fn default() -> Self {
        Self::new()
    }
}
