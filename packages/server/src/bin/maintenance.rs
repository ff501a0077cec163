//! One-off maintenance commands against the dashboard database.
//!
//! Results are printed as pretty JSON on stdout; logs go through tracing.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use control_center::config::Config;
use control_center::domains::prompts::actions::fix_prompt_keys;
use control_center::domains::prompts::SystemPrompt;
use control_center::domains::settings::{ProjectSetting, TelegramChat};
use control_center::kernel::logging::init_tracing;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;

#[derive(Parser)]
#[command(name = "maintenance")]
#[command(about = "AiNews Control Center maintenance commands")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print project settings and Telegram chats
    CheckSettings,

    /// Print id, key, provider and model of every prompt
    CheckPrompts,

    /// Trim whitespace around prompt keys
    FixPromptKeys {
        /// Report the fixes without writing them
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Serialize)]
struct SettingsReport {
    project_key: String,
    settings: Vec<ProjectSetting>,
    chats: Vec<TelegramChat>,
}

#[derive(Serialize)]
struct PromptSummary {
    id: i64,
    key: String,
    provider: Option<String>,
    model: Option<String>,
}

impl From<SystemPrompt> for PromptSummary {
    fn from(prompt: SystemPrompt) -> Self {
        Self {
            id: prompt.id,
            key: prompt.key,
            provider: prompt.provider,
            model: prompt.model,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(&config, "maintenance")?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::CheckSettings => {
            let report = SettingsReport {
                settings: ProjectSetting::find_all(&config.project_key, &pool).await?,
                chats: TelegramChat::find_all(&config.project_key, &pool).await?,
                project_key: config.project_key.clone(),
            };
            print_json(&report)?;
        }
        Commands::CheckPrompts => {
            let prompts: Vec<PromptSummary> = SystemPrompt::find_all(&pool)
                .await?
                .into_iter()
                .map(PromptSummary::from)
                .collect();
            tracing::info!(count = prompts.len(), "Loaded prompts");
            print_json(&prompts)?;
        }
        Commands::FixPromptKeys { dry_run } => {
            let fixes = fix_prompt_keys(dry_run, &pool).await?;
            tracing::info!(fixed = fixes.len(), dry_run, "Prompt key check finished");
            print_json(&fixes)?;
        }
    }

    Ok(())
}
