// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Naming convention: Base* for trait names (e.g., BaseArticleScraper)

use anyhow::Result;
use async_trait::async_trait;

use crate::common::NewsItemId;

// =============================================================================
// Fetching & Scraping
// =============================================================================

#[async_trait]
pub trait BasePageFetcher: Send + Sync {
    /// GET a URL and return the body as text. Non-2xx statuses are errors.
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

#[async_trait]
pub trait BaseArticleScraper: Send + Sync {
    /// Extract readable article text from a page.
    ///
    /// When `selector` matches, only that element's text is used.
    async fn scrape_article(&self, url: &str, selector: Option<&str>) -> Result<String>;
}

// =============================================================================
// External integrations
// =============================================================================

#[async_trait]
pub trait BaseThreadsClient: Send + Sync {
    /// Fetch the profile behind an access token.
    ///
    /// Returns the raw Graph API body; an `error` object in it is left for
    /// the caller to interpret.
    async fn fetch_profile(&self, access_token: &str) -> Result<serde_json::Value>;
}

#[async_trait]
pub trait BaseDraftGenerator: Send + Sync {
    /// Produce social drafts for an item that was just approved.
    async fn generate_drafts(&self, news_id: NewsItemId) -> Result<()>;

    /// False when drafts are never actually produced.
    fn is_configured(&self) -> bool {
        true
    }
}

#[async_trait]
pub trait BaseErrorNotifier: Send + Sync {
    /// Forward an error to the operators. Must never fail or panic.
    async fn notify_error(&self, context: &str, message: &str);
}
