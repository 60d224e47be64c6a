use clap::{Parser, Subcommand};
use dnd_ui_toolkit::app::{handle_fatal_error, init_logging, AppConfig};
use dnd_ui_toolkit::config::ConfigLoader;
use dnd_ui_toolkit::error::{ErrorCode, Result, ToolkitError};
use dnd_ui_toolkit::storage::{self, KeyValueStore};
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::debug;

/// Inspect and edit the persisted widget state of a vault
#[derive(Parser)]
#[command(name = "dnd-ui-toolkit")]
#[command(about = "D&D UI Toolkit - inspect and edit persisted widget state", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a settings file (default: <vault>/dnd-ui-toolkit.toml)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Vault root (default: current directory)
    #[arg(long, global = true)]
    vault: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every state key
    Keys,
    /// Print the value stored under a key
    Get {
        key: String,
    },
    /// Store a JSON value under a key
    Set {
        key: String,
        /// Value as JSON, e.g. '{"value": 2}'
        value: String,
    },
    /// Remove a key
    Delete {
        key: String,
    },
    /// Remove every key
    Clear,
    /// Print the resolved state file location
    Path,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match AppConfig::new(cli.verbose) {
        Ok(config) => config,
        Err(e) => handle_fatal_error(e, cli.verbose),
    };
    if let Some(vault) = &cli.vault {
        config = config.with_vault_dir(vault.clone());
    }
    init_logging(&config);

    if let Err(e) = run(cli, &config).await {
        handle_fatal_error(e, config.verbose);
    }
}

async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    let settings = ConfigLoader::new(&config.vault_dir)
        .load(cli.config.as_deref())
        .await?;
    let state_path = settings.resolve_state_path(&config.vault_dir);
    debug!("Using state file {}", state_path.display());

    if let Commands::Path = cli.command {
        println!("{}", state_path.display());
        return Ok(());
    }

    let kv = storage::open_state_file(&state_path);
    let output = run_command(&kv, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run_command(kv: &KeyValueStore, command: Commands) -> Result<Value> {
    let output = match command {
        Commands::Keys => json!(kv.keys().await?),
        Commands::Get { key } => kv.get::<Value>(&key).await?.unwrap_or(Value::Null),
        Commands::Set { key, value } => {
            let value: Value = serde_json::from_str(&value).map_err(|e| {
                ToolkitError::validation_with_code(
                    ErrorCode::VALIDATION_INVALID_TYPE,
                    format!("Value for '{key}' is not valid JSON"),
                    Some("value".to_string()),
                )
                .with_source(e)
            })?;
            kv.set(&key, &value).await?;
            value
        }
        Commands::Delete { key } => json!({ "deleted": kv.delete(&key).await? }),
        Commands::Clear => {
            kv.clear().await?;
            json!({})
        }
        Commands::Path => Value::Null,
    };
    Ok(output)
}
