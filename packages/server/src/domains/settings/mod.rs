//! Settings domain - per-project settings and Telegram chat routing

pub mod models;

pub use models::{keys, purposes, ProjectSetting, TelegramChat};
