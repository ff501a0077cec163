//! Threads Graph API client (profile lookup only).

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use std::time::Duration;

use super::BaseThreadsClient;

const PROFILE_FIELDS: &str = "id,username,threads_profile_picture_url";

pub struct ThreadsClient {
    client: reqwest::Client,
    base_url: String,
}

impl ThreadsClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl BaseThreadsClient for ThreadsClient {
    async fn fetch_profile(&self, access_token: &str) -> Result<serde_json::Value> {
        // The Graph API reports token problems as a JSON `error` object with a
        // 4xx status, so the body is parsed regardless of status.
        self.client
            .get(format!("{}/v1.0/me", self.base_url))
            .query(&[("fields", PROFILE_FIELDS), ("access_token", access_token)])
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .context("Threads request failed")?
            .json::<serde_json::Value>()
            .await
            .context("Threads returned a non-JSON body")
    }
}
