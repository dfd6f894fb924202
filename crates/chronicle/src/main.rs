//! # chronicle
//!
//! Privacy-first local browsing history capture, search, and recall.
//!
//! This binary is a thin collaborator over `chronicle-store`: it resolves
//! settings, opens the store, and maps subcommands onto store operations.
//! All output goes to stdout; diagnostics go through `tracing` to stderr.

#![deny(unsafe_code)]

mod commands;
mod context;
mod duration;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::context::CliContext;

/// Privacy-first local browsing history capture, search, and recall.
#[derive(Parser, Debug)]
#[command(name = "chronicle", version, about)]
struct Cli {
    /// Path to the settings file (default: ~/.config/chronicle/settings.json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the SQLite database (overrides settings).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Output machine-readable JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manually record a URL/title/body.
    Add(commands::add::AddArgs),
    /// Search captured events.
    Search(commands::search::SearchArgs),
    /// Print the stored content of one event.
    Open(commands::open::OpenArgs),
    /// Show database statistics and daemon liveness.
    Status(commands::status::StatusArgs),
    /// Remove events past the retention window.
    Prune(commands::prune::PruneArgs),
    /// Delete ALL captured data.
    Purge(commands::purge::PurgeArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => chronicle_settings::load_settings_from_path(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => chronicle_settings::load_settings().context("failed to load settings")?,
    };

    init_tracing(cli.verbose, &settings.logging.level);

    let ctx = CliContext::new(settings, cli.db.clone(), cli.json);
    match &cli.command {
        Commands::Add(args) => commands::add::run(&ctx, args),
        Commands::Search(args) => commands::search::run(&ctx, args),
        Commands::Open(args) => commands::open::run(&ctx, args),
        Commands::Status(args) => commands::status::run(&ctx, args),
        Commands::Prune(args) => commands::prune::run(&ctx, args),
        Commands::Purge(args) => commands::purge::run(&ctx, args),
    }
}

/// Initialize logging to stderr. Precedence: `--verbose`, then `RUST_LOG`,
/// then the configured level.
fn init_tracing(verbose: bool, configured_level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(configured_level.to_string()))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add_with_body() {
        let cli = Cli::parse_from([
            "chronicle", "add", "--url", "https://example.com", "--title", "T", "--body", "text",
        ]);
        assert!(matches!(cli.command, Commands::Add(_)));
    }

    #[test]
    fn parses_search_filters() {
        let cli = Cli::parse_from([
            "chronicle", "--json", "search", "rust", "--domain", "example.com", "--since", "7d",
        ]);
        assert!(cli.json);
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.query.as_deref(), Some("rust"));
                assert_eq!(args.domain.as_deref(), Some("example.com"));
                assert_eq!(args.since.as_deref(), Some("7d"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn body_and_body_file_conflict() {
        let result = Cli::try_parse_from([
            "chronicle", "add", "--url", "https://example.com", "--title", "T", "--body", "x",
            "--body-file", "/tmp/f",
        ]);
        assert!(result.is_err());
    }
}
