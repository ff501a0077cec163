//! Operator error notifications over Telegram.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, warn};

use crate::domains::settings::{keys, purposes, ProjectSetting, TelegramChat};
use crate::kernel::{BaseErrorNotifier, TelegramClient};

/// Text sent to the operators' chat.
pub fn format_error_message(context: &str, message: &str) -> String {
    format!(
        "[DASHBOARD ERROR]\n\nContext: {}\nMessage: {}\n\n#error #dashboard",
        context, message
    )
}

/// Sends errors to the project's error chat.
///
/// The chat is `telegram_error_chat_id` when set, else the active `approve`
/// chat. Without a bot token or a chat the notification is dropped.
pub struct TelegramErrorNotifier {
    pool: PgPool,
    telegram: TelegramClient,
    project_key: String,
}

impl TelegramErrorNotifier {
    pub fn new(pool: PgPool, telegram: TelegramClient, project_key: impl Into<String>) -> Self {
        Self {
            pool,
            telegram,
            project_key: project_key.into(),
        }
    }

    async fn resolve_chat_id(&self) -> Result<Option<String>> {
        if let Some(chat_id) =
            ProjectSetting::find_value(&self.project_key, keys::TELEGRAM_ERROR_CHAT_ID, &self.pool)
                .await?
        {
            return Ok(Some(chat_id));
        }

        Ok(
            TelegramChat::find_active(&self.project_key, purposes::APPROVE, &self.pool)
                .await?
                .map(|chat| chat.chat_id.to_string()),
        )
    }

    async fn send(&self, context: &str, message: &str) -> Result<()> {
        let token = ProjectSetting::telegram_bot_token(&self.project_key, &self.pool).await?;
        let chat_id = self.resolve_chat_id().await?;

        let (token, chat_id) = match (token, chat_id) {
            (Some(token), Some(chat_id)) => (token, chat_id),
            _ => {
                warn!(project_key = %self.project_key, "Missing Telegram configuration for error reports");
                return Ok(());
            }
        };

        self.telegram
            .send_message(&token, &chat_id, &format_error_message(context, message))
            .await
    }
}

#[async_trait]
impl BaseErrorNotifier for TelegramErrorNotifier {
    async fn notify_error(&self, context: &str, message: &str) {
        if let Err(e) = self.send(context, message).await {
            error!(context = %context, error = %e, "Failed to send error to Telegram");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_format() {
        assert_eq!(
            format_error_message("client:error", "boom"),
            "[DASHBOARD ERROR]\n\nContext: client:error\nMessage: boom\n\n#error #dashboard"
        );
    }
}
