//! Command-line interface parsing for hullwatch
//!
//! Handles parsing of CLI arguments using clap: forcing a refresh on
//! startup, dumping the price table as JSON, and clearing the on-disk
//! cache.

use clap::Parser;

/// hullwatch - view ship insurance valuations with offline caching
#[derive(Parser, Debug)]
#[command(name = "hullwatch")]
#[command(about = "EVE Online ship insurance valuations, cached between runs")]
#[command(version)]
pub struct Cli {
    /// Fetch fresh prices on startup even if the cached copy is still fresh
    #[arg(long)]
    pub refresh: bool,

    /// Print the price table as pretty JSON and exit instead of opening the TUI
    #[arg(long)]
    pub json: bool,

    /// Remove the persisted cache before doing anything else
    #[arg(long)]
    pub clear_cache: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Copy, Default)]
pub struct StartupConfig {
    /// Whether to refresh regardless of cache freshness
    pub force_refresh: bool,
    /// Whether to print JSON and exit instead of running the TUI
    pub json_output: bool,
    /// Whether to clear the persisted cache first
    pub clear_cache: bool,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            force_refresh: cli.refresh,
            json_output: cli.json,
            clear_cache: cli.clear_cache,
        }
    }
}
