use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::ReviewItemId;

/// Draft under editorial review (`review_items` row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReviewItem {
    pub id: ReviewItemId,
    pub canonical_url: Option<String>,
    pub draft_title: Option<String>,
    pub draft_image_file_id: Option<String>,
    pub draft_image_url: Option<String>,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Image fields shown by the draft image debug endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DraftImage {
    pub id: ReviewItemId,
    pub draft_title: Option<String>,
    pub draft_image_file_id: Option<String>,
}

impl ReviewItem {
    pub async fn find_by_id(id: ReviewItemId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM review_items WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Source article URL. `None` when the row is missing or has no URL.
    pub async fn find_canonical_url(id: ReviewItemId, pool: &PgPool) -> Result<Option<String>> {
        let url = sqlx::query_scalar::<_, Option<String>>(
            "SELECT canonical_url FROM review_items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(url.flatten())
    }

    pub async fn create(
        canonical_url: Option<&str>,
        draft_title: Option<&str>,
        draft_image_file_id: Option<&str>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO review_items (canonical_url, draft_title, draft_image_file_id, status)
            VALUES ($1, $2, $3, 'draft')
            RETURNING *
            "#,
        )
        .bind(canonical_url)
        .bind(draft_title)
        .bind(draft_image_file_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}

impl DraftImage {
    pub async fn find_by_id(id: ReviewItemId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT id, draft_title, draft_image_file_id FROM review_items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}
