use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Well-known setting keys.
pub mod keys {
    pub const TELEGRAM_BOT_TOKEN: &str = "telegram_bot_token";
    /// Older name of the bot token setting, still present in some projects
    pub const TG_BOT: &str = "tg_bot";
    pub const TELEGRAM_ERROR_CHAT_ID: &str = "telegram_error_chat_id";
}

/// Per-project key/value setting (`project_settings` row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectSetting {
    pub project_key: String,
    pub key: String,
    pub value: Option<String>,
    pub is_active: Option<bool>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProjectSetting {
    pub async fn find_all(project_key: &str, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM project_settings WHERE project_key = $1 ORDER BY key",
        )
        .bind(project_key)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Non-empty value of an active setting.
    pub async fn find_value(project_key: &str, key: &str, pool: &PgPool) -> Result<Option<String>> {
        let value = sqlx::query_scalar::<_, Option<String>>(
            r#"
            SELECT value FROM project_settings
            WHERE project_key = $1 AND key = $2 AND is_active IS DISTINCT FROM false
            "#,
        )
        .bind(project_key)
        .bind(key)
        .fetch_optional(pool)
        .await?;

        Ok(value.flatten().filter(|v| !v.trim().is_empty()))
    }

    /// First configured value among `keys`, in the given order.
    pub async fn find_first_value(project_key: &str, keys: &[&str], pool: &PgPool) -> Result<Option<String>> {
        for key in keys {
            if let Some(value) = Self::find_value(project_key, key, pool).await? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    /// Telegram bot token (`telegram_bot_token`, else `tg_bot`).
    pub async fn telegram_bot_token(project_key: &str, pool: &PgPool) -> Result<Option<String>> {
        Self::find_first_value(project_key, &[keys::TELEGRAM_BOT_TOKEN, keys::TG_BOT], pool).await
    }

    pub async fn upsert(project_key: &str, key: &str, value: &str, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO project_settings (project_key, key, value, is_active, updated_at)
            VALUES ($1, $2, $3, true, now())
            ON CONFLICT (project_key, key)
            DO UPDATE SET value = EXCLUDED.value, is_active = true, updated_at = now()
            RETURNING *
            "#,
        )
        .bind(project_key)
        .bind(key)
        .bind(value)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
