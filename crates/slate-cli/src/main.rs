//! slate CLI - reset and restore editor tracking state
//!
//! This is the CLI binary that uses the slate library for backup, reset,
//! and restore orchestration.

mod cli;
mod commands;
mod config;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use slate::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    if let Err(e) = run() {
        error!("{}", e);
        eprintln!("slate: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Info => commands::cmd_info(cli.insiders),
        Commands::Backup => commands::cmd_backup(cli.insiders),
        Commands::Reset(args) => commands::cmd_reset(args, cli.insiders),
        Commands::Restore(args) => commands::cmd_restore(args, cli.insiders),
        Commands::List(args) => commands::cmd_list(args, cli.insiders),
        Commands::Show(args) => commands::cmd_show(args, cli.insiders),
        Commands::Scrub(args) => commands::cmd_scrub(args, cli.insiders),
        Commands::Purge(args) => commands::cmd_purge(args, cli.insiders),
    }
}
