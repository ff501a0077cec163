//! Prompt actions - listing, lookup and partial updates

use serde::Serialize;
use sqlx::PgPool;
use tracing::{error, info, warn};

use crate::common::{ActionError, ActionResult, SystemPromptId};
use crate::domains::prompts::models::{PromptKey, SystemPrompt, SystemPromptUpdate};
use crate::kernel::ServerDeps;

/// All prompts, by category then key.
pub async fn get_system_prompts(deps: &ServerDeps) -> ActionResult<Vec<SystemPrompt>> {
    match SystemPrompt::find_all(&deps.db_pool).await {
        Ok(prompts) => ActionResult::ok(prompts),
        Err(e) => {
            error!(error = %e, "Failed to load system prompts");
            ActionResult::fail(ActionError::database(format!("{:#}", e)))
        }
    }
}

/// First prompt whose key starts with `prefix`.
pub async fn get_system_prompt_by_key(prefix: &str, deps: &ServerDeps) -> ActionResult<SystemPrompt> {
    match SystemPrompt::find_by_key_prefix(prefix, &deps.db_pool).await {
        Ok(Some(prompt)) => ActionResult::ok(prompt),
        Ok(None) => {
            warn!(prefix = %prefix, "No prompt found for key prefix");
            ActionResult::fail(ActionError::not_found(format!(
                "No prompt found for key '{}'",
                prefix
            )))
        }
        Err(e) => {
            error!(prefix = %prefix, error = %e, "Failed to load system prompt");
            ActionResult::fail(ActionError::database(format!("{:#}", e)))
        }
    }
}

/// Apply the provided fields to one prompt.
pub async fn update_system_prompt(
    id: SystemPromptId,
    changes: SystemPromptUpdate,
    deps: &ServerDeps,
) -> ActionResult<()> {
    if changes.is_empty() {
        return ActionResult::fail(ActionError::invalid("No fields to update"));
    }

    match SystemPrompt::update(id, &changes, &deps.db_pool).await {
        Ok(true) => {
            info!(prompt_id = id, "System prompt updated");
            ActionResult::done()
        }
        Ok(false) => ActionResult::fail(ActionError::not_found(format!("Prompt {} not found", id))),
        Err(e) => {
            error!(prompt_id = id, error = %e, "Failed to update system prompt");
            ActionResult::fail(ActionError::database(format!("{:#}", e)))
        }
    }
}

/// A key that had surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyFix {
    pub id: SystemPromptId,
    pub from: String,
    pub to: String,
}

/// Trim whitespace around stored prompt keys. With `dry_run` nothing is written.
///
/// Failed renames are logged and left out of the result.
pub async fn fix_prompt_keys(dry_run: bool, pool: &PgPool) -> anyhow::Result<Vec<KeyFix>> {
    let mut fixes = Vec::new();

    for prompt in PromptKey::find_all(pool).await? {
        let trimmed = prompt.key.trim();
        if trimmed == prompt.key {
            continue;
        }

        let fix = KeyFix {
            id: prompt.id,
            from: prompt.key.clone(),
            to: trimmed.to_string(),
        };

        if !dry_run {
            if let Err(e) = PromptKey::rename(fix.id, &fix.to, pool).await {
                error!(prompt_id = fix.id, error = %e, "Failed to fix prompt key");
                continue;
            }
        }
        fixes.push(fix);
    }

    Ok(fixes)
}
