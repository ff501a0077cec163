//! Prompts domain - editable LLM system prompts

pub mod actions;
pub mod models;

pub use models::{PromptKey, SystemPrompt, SystemPromptUpdate};
