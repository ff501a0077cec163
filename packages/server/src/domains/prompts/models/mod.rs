pub mod system_prompt;

pub use system_prompt::{PromptKey, SystemPrompt, SystemPromptUpdate};
