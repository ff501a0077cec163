// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::realtime::RealtimeHub;
use super::{
    BaseArticleScraper, BaseDraftGenerator, BaseErrorNotifier, BasePageFetcher,
    BaseThreadsClient, ServerDeps, StreamHub,
};
use crate::common::NewsItemId;

// =============================================================================
// Mock Page Fetcher
// =============================================================================

/// Serves canned bodies by URL. Unknown URLs fail like a 404.
pub struct MockPageFetcher {
    pages: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self {
            pages: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_page(self, url: &str, body: &str) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), body.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BasePageFetcher for MockPageFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.pages.lock().unwrap().get(url) {
            Some(body) => Ok(body.clone()),
            None => anyhow::bail!("HTTP 404 Not Found for {}", url),
        }
    }
}

// =============================================================================
// Mock Article Scraper
// =============================================================================

/// Arguments captured from a scrape call
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeCallArgs {
    pub url: String,
    pub selector: Option<String>,
}

pub struct MockArticleScraper {
    responses: Arc<Mutex<Vec<Result<String, String>>>>,
    calls: Arc<Mutex<Vec<ScrapeCallArgs>>>,
}

impl MockArticleScraper {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_text(self, text: &str) -> Self {
        self.responses.lock().unwrap().push(Ok(text.to_string()));
        self
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<ScrapeCallArgs> {
        self.calls.lock().unwrap().clone()
    }

    pub fn was_scraped(&self, url: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|c| c.url == url)
    }
}

#[async_trait]
impl BaseArticleScraper for MockArticleScraper {
    async fn scrape_article(&self, url: &str, selector: Option<&str>) -> Result<String> {
        self.calls.lock().unwrap().push(ScrapeCallArgs {
            url: url.to_string(),
            selector: selector.map(str::to_string),
        });

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok("Mock article text.".to_string());
        }
        responses.remove(0).map_err(|message| anyhow::anyhow!(message))
    }
}

// =============================================================================
// Mock Threads Client
// =============================================================================

pub struct MockThreadsClient {
    response: Mutex<serde_json::Value>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockThreadsClient {
    pub fn new() -> Self {
        Self {
            response: Mutex::new(serde_json::json!({
                "id": "1234567890",
                "username": "mock_user",
                "threads_profile_picture_url": "https://example.org/avatar.jpg"
            })),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(self, response: serde_json::Value) -> Self {
        *self.response.lock().unwrap() = response;
        self
    }

    /// Access tokens the client was called with
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseThreadsClient for MockThreadsClient {
    async fn fetch_profile(&self, access_token: &str) -> Result<serde_json::Value> {
        self.calls.lock().unwrap().push(access_token.to_string());
        Ok(self.response.lock().unwrap().clone())
    }
}

// =============================================================================
// Mock Draft Generator
// =============================================================================

pub struct MockDraftGenerator {
    failure: Option<String>,
    configured: bool,
    calls: Arc<Mutex<Vec<NewsItemId>>>,
}

impl MockDraftGenerator {
    pub fn new() -> Self {
        Self {
            failure: None,
            configured: true,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Behaves like a deployment without a generation webhook.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<NewsItemId> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseDraftGenerator for MockDraftGenerator {
    async fn generate_drafts(&self, news_id: NewsItemId) -> Result<()> {
        self.calls.lock().unwrap().push(news_id);
        match &self.failure {
            Some(message) => anyhow::bail!("{}", message),
            None => Ok(()),
        }
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

// =============================================================================
// Recording Error Notifier
// =============================================================================

/// Keeps every forwarded error instead of sending it anywhere.
pub struct RecordingErrorNotifier {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingErrorNotifier {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// `(context, message)` pairs in send order
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseErrorNotifier for RecordingErrorNotifier {
    async fn notify_error(&self, context: &str, message: &str) {
        self.sent
            .lock()
            .unwrap()
            .push((context.to_string(), message.to_string()));
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub fetcher: Arc<MockPageFetcher>,
    pub scraper: Arc<MockArticleScraper>,
    pub threads: Arc<MockThreadsClient>,
    pub draft_generator: Arc<MockDraftGenerator>,
    pub error_notifier: Arc<RecordingErrorNotifier>,
    pub stream_hub: StreamHub,
    pub realtime: RealtimeHub,
    pub project_key: String,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            fetcher: Arc::new(MockPageFetcher::new()),
            scraper: Arc::new(MockArticleScraper::new()),
            threads: Arc::new(MockThreadsClient::new()),
            draft_generator: Arc::new(MockDraftGenerator::new()),
            error_notifier: Arc::new(RecordingErrorNotifier::new()),
            stream_hub: StreamHub::new(),
            realtime: RealtimeHub::new(Duration::from_millis(500)),
            project_key: "ainews".to_string(),
        }
    }

    pub fn mock_fetcher(mut self, fetcher: MockPageFetcher) -> Self {
        self.fetcher = Arc::new(fetcher);
        self
    }

    pub fn mock_scraper(mut self, scraper: MockArticleScraper) -> Self {
        self.scraper = Arc::new(scraper);
        self
    }

    pub fn mock_threads(mut self, threads: MockThreadsClient) -> Self {
        self.threads = Arc::new(threads);
        self
    }

    pub fn mock_draft_generator(mut self, generator: MockDraftGenerator) -> Self {
        self.draft_generator = Arc::new(generator);
        self
    }

    pub fn project_key(mut self, project_key: &str) -> Self {
        self.project_key = project_key.to_string();
        self
    }

    /// Convert into ServerDeps for testing
    pub fn into_deps(self, db_pool: PgPool) -> ServerDeps {
        ServerDeps::new(
            db_pool,
            self.fetcher,
            self.scraper,
            self.threads,
            self.draft_generator,
            self.error_notifier,
            self.stream_hub,
            self.realtime,
            self.project_key,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
