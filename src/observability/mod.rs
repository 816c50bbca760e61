//! Structured logging setup.
//!
//! Selection itself only emits `tracing` events; this module installs the
//! subscriber that renders them for the command-line binary. Library users
//! bring their own subscriber.
//!
//! # Environment Configuration
//!
//! ```bash
//! # Set log level for all modules
//! RUST_LOG=debug eth-provider-selector select
//!
//! # Component-specific levels
//! RUST_LOG=eth_provider_selector=debug,alloy=warn eth-provider-selector check
//!
//! # Enable JSON output for production
//! LOG_JSON=true eth-provider-selector check
//!
//! # Write logs to file with daily rotation
//! LOG_FILE=./logs/selector.log eth-provider-selector check
//! ```
//!
//! Configuration values logged by the selector are redacted before they reach
//! any of these outputs.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Filter used when neither `RUST_LOG` nor an explicit level is given.
const DEFAULT_FILTER: &str = "eth_provider_selector=info,warn";

/// Initialize the tracing subscriber.
///
/// # Arguments
///
/// * `log_level` - Optional filter directive (e.g. "debug"). `RUST_LOG` takes
///   precedence when set.
/// * `log_file` - Optional file path; enables daily-rotated JSON file output.
/// * `json_output` - JSON console output instead of human-readable text.
///
/// # Returns
///
/// The guard of the non-blocking file writer when file output is enabled.
/// Keep it alive for the lifetime of the program; dropping it flushes and
/// stops the writer.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or a global
/// subscriber is already installed.
pub fn init_tracing(
    log_level: Option<String>,
    log_file: Option<PathBuf>,
    json_output: bool,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let env_filter = if let Ok(filter) = std::env::var("RUST_LOG") {
        EnvFilter::new(filter)
    } else if let Some(level) = log_level {
        EnvFilter::new(level)
    } else {
        EnvFilter::new(DEFAULT_FILTER)
    };

    // Console output goes to stderr so `select --json` stays machine-readable.
    let console_layer = if json_output {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let (file_layer, guard) = if let Some(ref path) = log_file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file_appender = tracing_appender::rolling::daily(
            path.parent().unwrap_or_else(|| Path::new(".")),
            path.file_name().unwrap_or_else(|| OsStr::new("selector.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // File always uses JSON for structured log analysis
        let layer = fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_current_span(true)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    info!(
        json_output,
        file_logging = log_file.is_some(),
        "Tracing initialized"
    );

    Ok(guard)
}

/// Route log output to the test harness at debug level.
///
/// Safe to call from several tests; only the first call installs anything.
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice_fails_cleanly() {
        init_test_tracing();
        // A global subscriber is now installed, so a second one is refused
        // with an error instead of a panic.
        let result = init_tracing(Some("debug".to_string()), None, false);
        assert!(result.is_err());
    }
}
