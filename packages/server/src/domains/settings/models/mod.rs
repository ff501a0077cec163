pub mod project_setting;
pub mod telegram_chat;

pub use project_setting::{keys, ProjectSetting};
pub use telegram_chat::{purposes, TelegramChat};
