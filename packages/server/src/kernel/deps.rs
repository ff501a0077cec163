//! Server dependencies for actions and routes (using traits for testability)
//!
//! All external services are held behind trait objects so tests can swap in
//! the mocks from `test_dependencies`.

use sqlx::PgPool;
use std::sync::Arc;

use crate::kernel::realtime::RealtimeHub;
use crate::kernel::{
    BaseArticleScraper, BaseDraftGenerator, BaseErrorNotifier, BasePageFetcher,
    BaseThreadsClient, StreamHub,
};

/// Server dependencies shared by every request.
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// Raw page fetcher used by ingestion parsers
    pub fetcher: Arc<dyn BasePageFetcher>,
    pub scraper: Arc<dyn BaseArticleScraper>,
    pub threads: Arc<dyn BaseThreadsClient>,
    pub draft_generator: Arc<dyn BaseDraftGenerator>,
    pub error_notifier: Arc<dyn BaseErrorNotifier>,
    /// In-process pub/sub hub for activity events streamed over SSE
    pub stream_hub: StreamHub,
    /// Debounced table change subscriptions
    pub realtime: RealtimeHub,
    /// Scope for `project_settings` and `telegram_chats` lookups
    pub project_key: String,
}

impl ServerDeps {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        db_pool: PgPool,
        fetcher: Arc<dyn BasePageFetcher>,
        scraper: Arc<dyn BaseArticleScraper>,
        threads: Arc<dyn BaseThreadsClient>,
        draft_generator: Arc<dyn BaseDraftGenerator>,
        error_notifier: Arc<dyn BaseErrorNotifier>,
        stream_hub: StreamHub,
        realtime: RealtimeHub,
        project_key: String,
    ) -> Self {
        Self {
            db_pool,
            fetcher,
            scraper,
            threads,
            draft_generator,
            error_notifier,
            stream_hub,
            realtime,
            project_key,
        }
    }
}
