use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::common::SystemPromptId;

/// An editable LLM prompt (`system_prompts` row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SystemPrompt {
    pub id: SystemPromptId,
    pub key: String,
    pub content: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial update; `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemPromptUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl SystemPromptUpdate {
    pub fn is_empty(&self) -> bool {
        self.key.is_none()
            && self.content.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.provider.is_none()
            && self.model.is_none()
            && self.temperature.is_none()
    }
}

/// `(id, key)` pair used by the key maintenance command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct PromptKey {
    pub id: SystemPromptId,
    pub key: String,
}

// =============================================================================
// SQL Queries
// =============================================================================

impl SystemPrompt {
    /// Ordered by category, then key.
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM system_prompts ORDER BY category ASC, key ASC")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_id(id: SystemPromptId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM system_prompts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// First prompt whose key starts with `prefix`.
    ///
    /// Prefix matching tolerates stored keys with trailing whitespace.
    pub async fn find_by_key_prefix(prefix: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"SELECT * FROM system_prompts WHERE key LIKE $1 ESCAPE '\' ORDER BY id LIMIT 1"#,
        )
        .bind(format!("{}%", escape_like(prefix)))
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Apply a partial update. Returns `false` when the id does not exist.
    pub async fn update(id: SystemPromptId, changes: &SystemPromptUpdate, pool: &PgPool) -> Result<bool> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE system_prompts SET ");
        {
            let mut set = query.separated(", ");
            if let Some(key) = &changes.key {
                set.push("key = ").push_bind_unseparated(key.clone());
            }
            if let Some(content) = &changes.content {
                set.push("content = ").push_bind_unseparated(content.clone());
            }
            if let Some(category) = &changes.category {
                set.push("category = ").push_bind_unseparated(category.clone());
            }
            if let Some(description) = &changes.description {
                set.push("description = ").push_bind_unseparated(description.clone());
            }
            if let Some(provider) = &changes.provider {
                set.push("provider = ").push_bind_unseparated(provider.clone());
            }
            if let Some(model) = &changes.model {
                set.push("model = ").push_bind_unseparated(model.clone());
            }
            if let Some(temperature) = changes.temperature {
                set.push("temperature = ").push_bind_unseparated(temperature);
            }
            set.push("updated_at = now()");
        }
        query.push(" WHERE id = ").push_bind(id);

        let result = query.build().execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

impl PromptKey {
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT id, key FROM system_prompts ORDER BY id")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn rename(id: SystemPromptId, key: &str, pool: &PgPool) -> Result<()> {
        sqlx::query("UPDATE system_prompts SET key = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(key)
            .execute(pool)
            .await?;
        Ok(())
    }
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
