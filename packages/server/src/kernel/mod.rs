//! Kernel module - server infrastructure and dependencies.

pub mod activity_log;
pub mod article_scraper;
pub mod deps;
pub mod generation;
pub mod logging;
pub mod realtime;
pub mod stream_hub;
pub mod telegram_client;
pub mod test_dependencies;
pub mod threads_client;
pub mod traits;

pub use activity_log::{log_system_event, SystemEvent, SystemEventKind};
pub use article_scraper::ArticleScraper;
pub use deps::ServerDeps;
pub use generation::{NoopDraftGenerator, WebhookDraftGenerator};
pub use realtime::{RealtimeHub, RealtimeSubscription};
pub use stream_hub::StreamHub;
pub use telegram_client::TelegramClient;
pub use test_dependencies::TestDependencies;
pub use threads_client::ThreadsClient;
pub use traits::*;
