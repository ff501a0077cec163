//! Draft generation hand-off after Approve 1.
//!
//! Generation itself runs in a separate service; this side only triggers it
//! and waits for the answer.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::info;

use super::BaseDraftGenerator;
use crate::common::NewsItemId;

/// Calls the generation service webhook and waits for completion.
pub struct WebhookDraftGenerator {
    client: reqwest::Client,
    url: String,
}

impl WebhookDraftGenerator {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        // Generation runs several LLM calls before answering
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl BaseDraftGenerator for WebhookDraftGenerator {
    async fn generate_drafts(&self, news_id: NewsItemId) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(&json!({ "news_id": news_id }))
            .send()
            .await
            .context("Generation webhook request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Generation webhook returned {}: {}", status, body);
        }

        Ok(())
    }
}

/// Used when no generation webhook is configured.
pub struct NoopDraftGenerator;

#[async_trait]
impl BaseDraftGenerator for NoopDraftGenerator {
    async fn generate_drafts(&self, news_id: NewsItemId) -> Result<()> {
        info!(news_id = %news_id, "Draft generation not configured, skipping");
        Ok(())
    }

    fn is_configured(&self) -> bool {
        false
    }
}
