use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Chat purposes used for routing.
pub mod purposes {
    /// Moderators' chat receiving Approve 1 cards
    pub const APPROVE: &str = "approve";
}

/// A Telegram chat the bot posts to (`telegram_chats` row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TelegramChat {
    pub id: i64,
    pub chat_id: i64,
    pub project_key: String,
    pub purpose: String,
    pub title: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TelegramChat {
    pub async fn find_all(project_key: &str, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM telegram_chats WHERE project_key = $1 ORDER BY purpose, created_at",
        )
        .bind(project_key)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Most recently added active chat for a purpose.
    pub async fn find_active(project_key: &str, purpose: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM telegram_chats
            WHERE project_key = $1 AND purpose = $2 AND is_active
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(project_key)
        .bind(purpose)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn create(
        project_key: &str,
        chat_id: i64,
        purpose: &str,
        title: Option<&str>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO telegram_chats (project_key, chat_id, purpose, title)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(project_key)
        .bind(chat_id)
        .bind(purpose)
        .bind(title)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
