//! Test fixtures for creating test data.
//!
//! Rows that the service itself never writes (Gate 1 results, prompts) are
//! inserted with plain SQL; everything else goes through the model methods.

use anyhow::Result;
use control_center::common::{NewsItemId, ReviewItemId, SystemPromptId};
use control_center::domains::review::ReviewItem;
use sqlx::PgPool;
use uuid::Uuid;

/// Unique URL so tests sharing the database never collide.
pub fn unique_url(prefix: &str) -> String {
    format!("https://{}.example.org/news/{}", prefix, Uuid::new_v4())
}

/// News item that passed Gate 1 and awaits Approve 1.
pub async fn create_pending_news(pool: &PgPool, title: &str, source: &str) -> Result<NewsItemId> {
    let id: NewsItemId = sqlx::query_scalar(
        r#"
        INSERT INTO news_items (title, canonical_url, source_name, rss_summary, gate1_decision, gate1_score, gate1_tags)
        VALUES ($1, $2, $3, 'Summary', 'send', 87, ARRAY['hunting'])
        RETURNING id
        "#,
    )
    .bind(title)
    .bind(unique_url("pending"))
    .bind(source)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn find_news_status(pool: &PgPool, id: NewsItemId) -> Result<(String, Option<String>, Option<String>)> {
    let row: (String, Option<String>, Option<String>) = sqlx::query_as(
        "SELECT status, approve1_decision, approve1_decided_by FROM news_items WHERE id = $1",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn create_review_item(
    pool: &PgPool,
    canonical_url: Option<&str>,
    image_file_id: Option<&str>,
) -> Result<ReviewItemId> {
    let item = ReviewItem::create(canonical_url, Some("Draft title"), image_file_id, pool).await?;
    Ok(item.id)
}

pub async fn create_prompt(pool: &PgPool, key: &str, category: &str) -> Result<SystemPromptId> {
    let id: SystemPromptId = sqlx::query_scalar(
        r#"
        INSERT INTO system_prompts (key, content, category, provider, model, temperature)
        VALUES ($1, 'You are a news editor.', $2, 'openai', 'gpt-4o', 0.7)
        RETURNING id
        "#,
    )
    .bind(key)
    .bind(category)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Key unique to one test run, with an optional suffix (e.g. trailing spaces).
pub fn unique_key(base: &str) -> String {
    format!("{}_{}", base, Uuid::new_v4().simple())
}
