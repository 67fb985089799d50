//! Logging configuration for git-hooks
//!
//! Console logs go to stderr so they never mix with hook output or with
//! machine-readable output such as `list --format json`. An optional file
//! layer records everything at debug level.

use githooks_core::{Error, Result};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logging system
///
/// # Arguments
/// * `verbose` - Enable debug level logging (with timestamps)
/// * `log_file` - Optional path to append logs to
///
/// # Examples
/// ```ignore
/// // Basic usage with info level
/// init(false, None)?;
///
/// // Verbose mode, also writing to a file
/// init(true, Some(Path::new("git-hooks.log")))?;
/// ```
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    // RUST_LOG overrides the default filter
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            EnvFilter::try_new(format!(
                "githooks={level},githooks_engine={level},githooks_config={level}"
            ))
        })
        .map_err(|e| Error::Message(format!("Invalid log filter: {e}")))?;

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .with_ansi(std::io::stderr().is_terminal());

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::with_capacity(2);
    if verbose {
        layers.push(console.with_filter(env_filter).boxed());
    } else {
        // No timestamps in normal mode
        layers.push(console.without_time().with_filter(env_filter).boxed());
    }

    if let Some(log_path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        layers.push(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .pretty()
                .with_filter(LevelFilter::DEBUG)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| Error::Message(format!("Failed to initialize logging: {e}")))
}
