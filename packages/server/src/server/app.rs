//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::domains::client_errors::TelegramErrorNotifier;
use crate::kernel::{
    ArticleScraper, BaseDraftGenerator, NoopDraftGenerator, RealtimeHub, ServerDeps, StreamHub,
    TelegramClient, ThreadsClient, WebhookDraftGenerator,
};
use crate::server::routes::{
    approve_content_handler, client_error_handler, content_board_handler, content_items_handler,
    content_stats_handler, debug_draft_image_handler, health_handler, ingestion_handler,
    mark_viewed_handler, prompt_by_key_handler, prompts_handler, realtime_handler,
    reject_content_handler, scraper_handler, source_stats_handler, stream_handler,
    threads_metadata_handler, update_prompt_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: ServerDeps,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(deps: ServerDeps, config: Config) -> Self {
        Self {
            deps,
            config: Arc::new(config),
        }
    }

    pub fn db_pool(&self) -> &PgPool {
        &self.deps.db_pool
    }
}

/// Wire the production implementations of every external service.
pub fn build_deps(pool: PgPool, config: &Config) -> Result<ServerDeps> {
    let scraper = Arc::new(ArticleScraper::new()?);

    let draft_generator: Arc<dyn BaseDraftGenerator> = match &config.generation_webhook_url {
        Some(url) => Arc::new(WebhookDraftGenerator::new(url.clone())?),
        None => {
            tracing::warn!("GENERATION_WEBHOOK_URL not set, approvals will not generate drafts");
            Arc::new(NoopDraftGenerator)
        }
    };

    let error_notifier = Arc::new(TelegramErrorNotifier::new(
        pool.clone(),
        TelegramClient::new(config.telegram_api_base.clone())?,
        config.project_key.clone(),
    ));

    Ok(ServerDeps::new(
        pool,
        scraper.clone(),
        scraper,
        Arc::new(ThreadsClient::new(config.threads_api_base.clone())?),
        draft_generator,
        error_notifier,
        StreamHub::new(),
        RealtimeHub::new(config.realtime_debounce),
        config.project_key.clone(),
    ))
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps, config: Config) -> Router {
    let app_state = AppState::new(deps, config);

    // CORS configuration - allow any origin, the dashboard may be served elsewhere
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([CONTENT_TYPE]);

    let api = Router::new()
        // Integration routes
        .route("/scraper", post(scraper_handler))
        .route("/integrations/threads-metadata", post(threads_metadata_handler))
        .route("/debug/draft-image", get(debug_draft_image_handler))
        .route("/log-client-error", post(client_error_handler))
        // Actions
        .route("/actions/ingestion", post(ingestion_handler))
        .route("/prompts", get(prompts_handler))
        .route("/prompts/by-key/:key", get(prompt_by_key_handler))
        .route("/prompts/:id", patch(update_prompt_handler))
        .route("/content", get(content_items_handler))
        .route("/content/stats", get(content_stats_handler))
        .route("/content/stats/sources", get(source_stats_handler))
        .route("/content/:id/approve", post(approve_content_handler))
        .route("/content/:id/reject", post(reject_content_handler))
        .route("/content/:id/viewed", post(mark_viewed_handler))
        // Streams
        .route("/realtime/:table", get(realtime_handler))
        .route("/streams/:topic", get(stream_handler));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health_handler))
        .route("/content", get(content_board_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
