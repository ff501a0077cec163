use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;

use crate::common::NewsItemId;

/// `status` value of items still waiting for the Approve 1 decision.
pub const PENDING_STATUS: &str = "found";

/// Automated Gate 1 verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Gate1Decision {
    Send,
    Block,
}

/// Human Approve 1 verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Approve1Decision {
    Approved,
    Rejected,
}

impl Approve1Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Lifecycle status the item moves to after this decision.
    pub fn next_status(&self) -> &'static str {
        match self {
            Self::Approved => "approved_for_adaptation",
            Self::Rejected => "rejected",
        }
    }
}

/// Board tab selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFilter {
    All,
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ContentFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// SQL predicate selecting the rows of this tab.
    fn predicate(&self) -> &'static str {
        match self {
            Self::All => "gate1_decision IS NOT NULL",
            Self::Pending => "gate1_decision = 'send' AND approve1_decision IS NULL",
            Self::Approved => "approve1_decision = 'approved'",
            Self::Rejected => "approve1_decision = 'rejected'",
        }
    }
}

impl fmt::Display for ContentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => anyhow::bail!("Unknown content filter '{}'", other),
        }
    }
}

/// A news candidate (`news_items` row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContentItem {
    pub id: NewsItemId,
    pub title: String,
    pub source_name: Option<String>,
    pub canonical_url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub rss_summary: Option<String>,
    pub image_url: Option<String>,

    pub gate1_decision: Option<Gate1Decision>,
    pub gate1_score: Option<f32>,
    pub gate1_tags: Option<Vec<String>>,
    pub gate1_reason: Option<String>,
    pub gate1_processed_at: Option<DateTime<Utc>>,

    pub approve1_decision: Option<Approve1Decision>,
    pub approve1_decided_at: Option<DateTime<Utc>>,
    pub approve1_decided_by: Option<String>,
    pub sent_to_approve1_at: Option<DateTime<Utc>>,
    pub approve1_message_id: Option<i64>,
    pub approve1_chat_id: Option<i64>,

    pub status: String,
    pub is_viewed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContentStats {
    pub total: i64,
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SourceCount {
    pub source: String,
    pub count: i64,
}

/// Fields written by the ingestion runner for a newly found item.
#[derive(Debug, Clone, Default)]
pub struct NewContentItem {
    pub title: String,
    pub canonical_url: String,
    pub source_name: Option<String>,
    pub rss_summary: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
}

// =============================================================================
// SQL Queries
// =============================================================================

impl ContentItem {
    pub async fn find_by_id(id: NewsItemId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM news_items WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Newest first.
    pub async fn find_filtered(filter: ContentFilter, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let sql = format!(
            "SELECT * FROM news_items WHERE {} ORDER BY created_at DESC LIMIT $1",
            filter.predicate()
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(limit)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_canonical_url(id: NewsItemId, pool: &PgPool) -> Result<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT canonical_url FROM news_items WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn exists_by_canonical_url(canonical_url: &str, pool: &PgPool) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM news_items WHERE canonical_url = $1)",
        )
        .bind(canonical_url)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert a found item unless its canonical URL is already known.
    ///
    /// Returns `true` when a row was written.
    pub async fn insert_if_new(item: &NewContentItem, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO news_items (title, canonical_url, source_name, rss_summary, published_at, image_url, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (canonical_url) DO NOTHING
            "#,
        )
        .bind(&item.title)
        .bind(&item.canonical_url)
        .bind(&item.source_name)
        .bind(&item.rss_summary)
        .bind(item.published_at)
        .bind(&item.image_url)
        .bind(PENDING_STATUS)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record the Approve 1 decision, only while the item is still pending.
    ///
    /// `None` means someone else already decided (or the id is unknown).
    pub async fn decide(
        id: NewsItemId,
        decision: Approve1Decision,
        decided_by: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE news_items
            SET approve1_decision = $2,
                approve1_decided_at = now(),
                approve1_decided_by = $3,
                status = $4
            WHERE id = $1 AND status = $5
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(decision.as_str())
        .bind(decided_by)
        .bind(decision.next_status())
        .bind(PENDING_STATUS)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn mark_viewed(id: NewsItemId, pool: &PgPool) -> Result<()> {
        sqlx::query("UPDATE news_items SET is_viewed = true WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

impl ContentStats {
    /// Tab counters. `total` counts every row, ingested-but-unscored included.
    pub async fn load(pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE gate1_decision = 'send' AND approve1_decision IS NULL) AS pending,
                COUNT(*) FILTER (WHERE approve1_decision = 'approved') AS approved,
                COUNT(*) FILTER (WHERE approve1_decision = 'rejected') AS rejected
            FROM news_items
            "#,
        )
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}

impl SourceCount {
    /// Items per source for one tab, largest first.
    pub async fn by_source(filter: ContentFilter, pool: &PgPool) -> Result<Vec<Self>> {
        let sql = format!(
            r#"
            SELECT COALESCE(source_name, 'Unknown') AS source, COUNT(*) AS count
            FROM news_items
            WHERE {}
            GROUP BY 1
            ORDER BY count DESC, source ASC
            "#,
            filter.predicate()
        );
        sqlx::query_as::<_, Self>(&sql)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }
}
