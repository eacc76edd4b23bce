//! `flyer` — command-line access to the verification service.
//!
//! Useful for checking a key, inspecting what a user is asked to do, and
//! re-verifying tasks by hand. Output is pretty-printed JSON on stdout; logs go to
//! stderr (`RUST_LOG` controls verbosity).

use clap::{Parser, Subcommand};
use futures_util::future::join_all;
use serde_json::{json, Value};
use std::path::PathBuf;

use flyer_client::config::{apply_env_overrides, load_config};
use flyer_client::observability::logging;
use flyer_client::{ClientConfig, FlyerClient, TaskStatus};

#[derive(Parser)]
#[command(name = "flyer")]
#[command(about = "Query the Flyer subscription-verification service", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API key (overrides config file and FLYER_API_KEY).
    #[arg(short, long)]
    key: Option<String>,

    /// Service endpoint (overrides config file and FLYER_BASE_URL).
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show bot account information
    Me,
    /// Check whether a user may use the bot
    Check {
        user_id: i64,
        #[arg(short, long)]
        language: Option<String>,
        /// Custom message payload as JSON
        #[arg(short, long)]
        message: Option<String>,
    },
    /// List the tasks a user is asked to complete
    Tasks {
        user_id: i64,
        #[arg(short, long)]
        language: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        /// Re-verify every pending task
        #[arg(long)]
        recheck: bool,
    },
    /// Re-verify one task
    CheckTask { user_id: i64, signature: String },
    /// Show tasks a user already completed
    Completed { user_id: i64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init(logging::DEFAULT_FILTER);

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => {
            let mut config = ClientConfig::default();
            apply_env_overrides(&mut config);
            config
        }
    };
    if let Some(key) = cli.key {
        config.api_key = key;
    }
    if let Some(url) = cli.base_url {
        config.base_url = url;
    }

    let client = FlyerClient::new(config)?;

    let output = match cli.command {
        Commands::Me => json!(client.bot_info().await?),
        Commands::Check {
            user_id,
            language,
            message,
        } => {
            let message: Option<Value> = message.as_deref().map(serde_json::from_str).transpose()?;
            let allowed = client
                .check_subscription(user_id, language.as_deref(), message.as_ref())
                .await?;
            json!({ "user_id": user_id, "allowed": allowed })
        }
        Commands::Tasks {
            user_id,
            language,
            limit,
            recheck,
        } => {
            let mut tasks = client
                .list_tasks(user_id, language.as_deref(), limit)
                .await?;

            if recheck {
                let pending: Vec<usize> = (0..tasks.len()).filter(|&i| tasks[i].is_pending()).collect();
                let results = join_all(
                    pending
                        .iter()
                        .map(|&i| client.recheck_task(user_id, &tasks[i].signature)),
                )
                .await;

                let mut updates: Vec<(usize, TaskStatus)> = Vec::new();
                for (&i, result) in pending.iter().zip(results) {
                    match result {
                        Ok(Some(status)) => updates.push((i, status)),
                        Ok(None) => {}
                        Err(e) => tracing::warn!(error = %e, "Task recheck rejected"),
                    }
                }
                for (i, status) in updates {
                    tasks[i].status = status;
                }
            }

            let done = tasks.iter().all(|t| !t.is_pending());
            json!({ "user_id": user_id, "all_complete": done, "tasks": tasks })
        }
        Commands::CheckTask { user_id, signature } => {
            let status = client.recheck_task(user_id, &signature).await?;
            json!({ "user_id": user_id, "signature": signature, "status": status })
        }
        Commands::Completed { user_id } => json!(client.completed_tasks(user_id).await?),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
