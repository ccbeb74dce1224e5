//! CLI argument definitions for slate
//!
//! Uses clap for argument parsing. This module defines all subcommands
//! and their options.

use clap::{Args, Parser, Subcommand};

/// slate - wipe the slate clean
///
/// Backs up, resets, and restores the tracking state of a VSCode-family
/// editor installation: machine identifier, global storage, state
/// database, and per-extension data.
#[derive(Parser, Debug)]
#[command(name = "slate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Target the Insiders flavor of the editor
    #[arg(long, global = true)]
    pub insiders: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the current installation, machine id, and backup overview
    Info,

    /// Snapshot every tracked artifact under a fresh backup identity
    #[command(after_help = "EXAMPLES:
    # Back up everything the tool knows how to reset
    slate backup

    # Back up an Insiders installation
    slate backup --insiders
")]
    Backup,

    /// Reset tracking artifacts, backing them up first by default
    #[command(after_help = "EXAMPLES:
    # Reset everything, with a backup
    slate reset

    # Reset only the machine id
    slate reset --category machineId

    # Reset one extension's data
    slate reset --category extensions/publisher.name

    # Skip the safety backup and the confirmation prompt
    slate reset --no-backup --force
")]
    Reset(ResetArgs),

    /// Restore artifacts from a backup
    #[command(after_help = "EXAMPLES:
    # Restore everything recorded under a backup
    slate restore backup_20260807_143022
")]
    Restore(RestoreArgs),

    /// List available backups
    #[command(after_help = "EXAMPLES:
    # Human-readable listing, newest first
    slate list

    # Three most recent backups as JSON
    slate list --recent 3 --json
")]
    List(ListArgs),

    /// Show the categories recorded under one backup
    Show(ShowArgs),

    /// Surgically remove tracking state without replacing any file
    #[command(after_help = "EXAMPLES:
    # Remove all state rows mentioning an extension, plus tracking keys
    # from storage.json
    slate scrub publisher.name
")]
    Scrub(ScrubArgs),

    /// Delete one backup from the store
    Purge(PurgeArgs),
}

#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Reset a single category instead of everything
    /// (machineId, globalStorage, stateDb, extensions/<id>)
    #[arg(long)]
    pub category: Option<String>,

    /// Don't create a backup before resetting
    #[arg(long)]
    pub no_backup: bool,

    /// Don't ask for confirmation
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Backup identity to restore from (see `slate list`)
    pub backup_id: String,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Show only the N most recent backups
    #[arg(long)]
    pub recent: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Backup identity to inspect
    pub backup_id: String,
}

#[derive(Args, Debug)]
pub struct ScrubArgs {
    /// Substring matched against state database keys
    pub pattern: String,
}

#[derive(Args, Debug)]
pub struct PurgeArgs {
    /// Backup identity to delete
    pub backup_id: String,

    /// Don't ask for confirmation
    #[arg(long)]
    pub force: bool,
}
