//! CLI entry point for the provider selector.
//!
//! ```text
//! main.rs (Runtime + tracing initialization)
//!     ↓
//! CLI Layer (src/cli.rs)
//!     ↓
//! 1. Config Layer (src/config.rs)      → Parse environment once
//! 2. Selector Layer (src/selector.rs)  → Validate and order upstreams
//! 3. RPC Layer (src/rpc/)              → Build and query the provider
//! ```
//!
//! This is the only place besides `ProviderConfig::from_env` that reads the
//! process environment.

use eth_provider_selector::{cli, config::is_env_true, observability};
use tracing::error;

#[tokio::main]
async fn main() {
    // Logging is controlled via environment variables:
    // - RUST_LOG: filter directives (e.g. "debug")
    // - LOG_JSON: JSON console output
    // - LOG_FILE: JSON file output with daily rotation
    let log_level = std::env::var("RUST_LOG").ok();
    let log_file = std::env::var("LOG_FILE").ok().map(std::path::PathBuf::from);
    let json_output = is_env_true(std::env::var("LOG_JSON").ok().as_deref());

    let _guard = match observability::init_tracing(log_level, log_file, json_output) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize tracing: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = cli::run().await {
        error!(error = %e, "Application error");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
