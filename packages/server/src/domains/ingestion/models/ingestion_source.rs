use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::IngestionSourceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Rss,
    Html,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rss => "rss",
            Self::Html => "html",
        }
    }
}

/// Outcome stamped on a source after each run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Error,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A feed or page scanned for news (`ingestion_sources` row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct IngestionSource {
    pub id: IngestionSourceId,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub url: String,
    /// CSS selectors for HTML sources, optionally `legacy_parser`
    pub selectors: Option<serde_json::Value>,
    pub is_active: Option<bool>,
    pub last_run_at: Option<DateTime<Utc>>,
    pub last_status: Option<String>,
    pub error_message: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl IngestionSource {
    pub async fn find_active(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM ingestion_sources WHERE is_active IS DISTINCT FROM false ORDER BY created_at, name",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: IngestionSourceId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM ingestion_sources WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn create(
        name: &str,
        source_type: SourceType,
        url: &str,
        selectors: Option<serde_json::Value>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO ingestion_sources (name, type, url, selectors)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(source_type.as_str())
        .bind(url)
        .bind(selectors)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn set_active(id: IngestionSourceId, is_active: bool, pool: &PgPool) -> Result<()> {
        sqlx::query("UPDATE ingestion_sources SET is_active = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(is_active)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Stamp `last_run_at` with the outcome. `error` is cleared on success.
    pub async fn record_run(
        id: IngestionSourceId,
        status: RunStatus,
        error: Option<&str>,
        pool: &PgPool,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE ingestion_sources
            SET last_run_at = now(), last_status = $2, error_message = $3, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(error)
        .execute(pool)
        .await?;
        Ok(())
    }
}
