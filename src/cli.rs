//! Command-line interface for the provider selector.
//!
//! # Commands
//!
//! - `select`: show which provider the current configuration selects
//! - `check`: build that provider and query it
//!
//! # Example
//!
//! ```bash
//! # Show the selection without touching the network
//! INFURA_PROJECT_ID=... CLOUDFLARE_ENABLED=1 eth-provider-selector select
//!
//! # Machine-readable selection
//! eth-provider-selector --env-file ./prod.env select --json
//!
//! # Query the selected provider
//! eth-provider-selector check
//! ```

use crate::config::ProviderConfig;
use crate::rpc::{check_connection, get_chain_id, get_latest_block, AlloyProviderFactory};
use crate::selector::{SelectionPlan, SelectionShape};
use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::WrapErr;
use std::path::PathBuf;
use tracing::info;

/// Ethereum RPC provider selector
#[derive(Parser, Debug)]
#[command(name = "eth-provider-selector")]
#[command(about = "Select an Ethereum RPC provider from environment configuration", long_about = None)]
#[command(version)]
struct Cli {
    /// Load variables from this dotenv file instead of ./.env
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the provider selection for the current configuration
    Select {
        /// Print the selection plan as JSON (secrets redacted)
        #[arg(long)]
        json: bool,
    },

    /// Build the selected provider and query chain id and latest block
    Check,
}

/// Parse CLI arguments and execute the appropriate command.
///
/// # Errors
///
/// Returns an error if:
/// - The env file cannot be loaded
/// - The configuration is missing a required secret
/// - The provider cannot be built or does not answer
pub async fn run() -> eyre::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.env_file {
        Some(path) => ProviderConfig::from_env_file(path)?,
        None => ProviderConfig::from_env(),
    };
    let plan = SelectionPlan::from_config(&config)?;

    match cli.command {
        Commands::Select { json } => run_select_command(&plan, json),
        Commands::Check => run_check_command(&plan).await,
    }
}

/// Print the selection without constructing anything.
fn run_select_command(plan: &SelectionPlan, json: bool) -> eyre::Result<()> {
    if json {
        let rendered =
            serde_json::to_string_pretty(plan).wrap_err("Failed to serialize selection plan")?;
        println!("{rendered}");
        return Ok(());
    }

    println!("{} {}", "Network:".bold(), plan.network());
    println!("{} {}", "Provider:".bold(), describe(plan).as_str().green().bold());
    for (index, kind) in plan.kinds().iter().enumerate() {
        println!("  {}. {}", index + 1, kind);
    }

    Ok(())
}

/// Build the selected provider and query it.
async fn run_check_command(plan: &SelectionPlan) -> eyre::Result<()> {
    info!(shape = %describe(plan), "Checking selected provider");

    let handle = plan
        .build(&AlloyProviderFactory::new())
        .wrap_err("Failed to build provider")?;

    check_connection(&handle)
        .await
        .wrap_err_with(|| format!("Provider {} is not healthy", handle.label()))?;

    let chain_id = get_chain_id(&handle).await?;
    let block = get_latest_block(&handle).await?;

    println!("{} {}", "Provider:".bold(), handle.label().green().bold());
    println!("{} {}", "Chain id:".bold(), chain_id);
    println!("{} {}", "Latest block:".bold(), block.to_string().as_str().cyan());

    Ok(())
}

/// One-line description of what the plan builds into.
fn describe(plan: &SelectionPlan) -> String {
    match plan.shape() {
        SelectionShape::Default => "default".to_string(),
        SelectionShape::Single(kind) => kind.to_string(),
        SelectionShape::Fallback { members, quorum } => {
            let origin = if plan.quorum().is_some() {
                "configured"
            } else {
                "default"
            };
            format!("fallback over {members} providers (quorum {quorum}, {origin})")
        }
    }
}
