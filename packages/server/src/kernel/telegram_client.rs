//! Minimal Telegram Bot API client used for operator notifications.

use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Duration;

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// `sendMessage` to a chat. Non-2xx answers are returned as errors with
    /// the response body attached.
    pub async fn send_message(&self, bot_token: &str, chat_id: &str, text: &str) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/bot{}/sendMessage", self.base_url, bot_token))
            .json(&SendMessage { chat_id, text })
            .send()
            .await
            .context("Telegram request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Telegram sendMessage failed: {} {}", status, body);
        }

        Ok(())
    }
}
