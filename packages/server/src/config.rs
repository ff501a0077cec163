use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// `production` switches logging to info level by default.
    pub app_env: String,
    /// Key under which this dashboard's rows live in `project_settings` / `telegram_chats`.
    pub project_key: String,
    /// Public dashboard URL; origins starting with it may report client errors.
    pub app_url: Option<String>,
    pub threads_api_base: String,
    pub telegram_api_base: String,
    /// Draft generation endpoint called after an item is approved.
    pub generation_webhook_url: Option<String>,
    pub realtime_debounce: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            project_key: env::var("PROJECT_KEY").unwrap_or_else(|_| "ainews".to_string()),
            app_url: env::var("APP_URL").ok().filter(|v| !v.is_empty()),
            threads_api_base: env::var("THREADS_API_BASE")
                .unwrap_or_else(|_| "https://graph.threads.net".to_string()),
            telegram_api_base: env::var("TELEGRAM_API_BASE")
                .unwrap_or_else(|_| "https://api.telegram.org".to_string()),
            generation_webhook_url: env::var("GENERATION_WEBHOOK_URL")
                .ok()
                .filter(|v| !v.is_empty()),
            realtime_debounce: Duration::from_millis(
                env::var("REALTIME_DEBOUNCE_MS")
                    .unwrap_or_else(|_| "500".to_string())
                    .parse()
                    .context("REALTIME_DEBOUNCE_MS must be a number of milliseconds")?,
            ),
        })
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }
}
