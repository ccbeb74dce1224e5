//! Subcommand implementations
//!
//! Each command composes the library pieces (store, locator, cleaner,
//! orchestrator), runs one operation, and renders its report. No
//! interpretation happens here beyond presentation.

use crate::cli::{ListArgs, PurgeArgs, ResetArgs, RestoreArgs, ScrubArgs, ShowArgs};
use crate::config;
use crate::output::{self, confirm, format_bytes, prefix};
use colored::Colorize;
use slate::{
    machine_id, platform, ArtifactLocator, BackupId, BackupStore, CacheCleaner, Category, Flavor,
    InstallPaths, Logger, Orchestrator, Result, SlateError, TracingLogger,
};
use std::sync::Arc;

/// Everything a command needs: the resolved installation plus the
/// orchestrator built on top of it.
struct Context {
    install: InstallPaths,
    orchestrator: Orchestrator,
    logger: Arc<dyn Logger>,
}

fn build_context(insiders: bool) -> Result<Context> {
    let logger: Arc<dyn Logger> = Arc::new(TracingLogger);
    let config = config::load_user_config()?.unwrap_or_default();

    let flavor = if insiders {
        Flavor::Insiders
    } else {
        config.editor.resolved_flavor()?
    };
    let install = match config.editor.install_root {
        Some(root) => InstallPaths::with_root(root),
        None => InstallPaths::discover(flavor)?,
    };

    let backup_root = config
        .backup
        .root
        .unwrap_or_else(|| install.default_backup_root());
    let store = BackupStore::new(backup_root, logger.clone());
    let cleaner = CacheCleaner::new(platform::default_cache_roots(), logger.clone());
    let orchestrator = Orchestrator::new(
        store,
        Box::new(install.clone()),
        Box::new(cleaner),
        logger.clone(),
    );

    Ok(Context {
        install,
        orchestrator,
        logger,
    })
}

pub fn cmd_info(insiders: bool) -> Result<()> {
    let ctx = build_context(insiders)?;

    eprintln!("{} installation overview", prefix());
    eprintln!(
        "  {}  {}",
        "platform".white(),
        std::env::consts::OS
    );
    eprintln!(
        "  {}  {}",
        "install root".white(),
        ctx.install.install_root().display()
    );

    let machine_id = machine_id::read(&ctx.install.machine_id_path(), ctx.logger.as_ref())?;
    eprintln!(
        "  {}  {}",
        "machine id".white(),
        machine_id.as_deref().unwrap_or("not found")
    );

    let extensions = ctx.install.list_extension_ids();
    eprintln!("  {}  {}", "extensions with data".white(), extensions.len());

    let backups = ctx.orchestrator.store().list_identities()?;
    eprintln!("  {}  {}", "available backups".white(), backups.len());

    Ok(())
}

pub fn cmd_backup(insiders: bool) -> Result<()> {
    let ctx = build_context(insiders)?;
    let report = ctx.orchestrator.backup_all()?;
    output::print_report("backup", &report);
    Ok(())
}

pub fn cmd_reset(args: ResetArgs, insiders: bool) -> Result<()> {
    let ctx = build_context(insiders)?;

    match args.category {
        Some(name) => {
            let category = Category::from_name(&name).ok_or_else(|| {
                SlateError::ConfigParse(format!(
                    "unknown category '{name}' (expected machineId, globalStorage, stateDb, or extensions/<id>)"
                ))
            })?;

            if !args.force && !confirm(&format!("Reset {category}?")) {
                eprintln!("{} aborted", prefix());
                return Ok(());
            }

            let (outcome, identity) =
                ctx.orchestrator.reset_one(&category, !args.no_backup)?;
            eprintln!("  {}  {}", category.to_string().white().bold(), outcome);
            if let Some(id) = identity {
                eprintln!("{} backup identity: {}", prefix(), id.to_string().white().bold());
            }
        }
        None => {
            if !args.force && !confirm("Reset all tracking state?") {
                eprintln!("{} aborted", prefix());
                return Ok(());
            }

            let report = ctx.orchestrator.reset_all(!args.no_backup)?;
            output::print_report("reset", &report);
        }
    }
    Ok(())
}

pub fn cmd_restore(args: RestoreArgs, insiders: bool) -> Result<()> {
    let ctx = build_context(insiders)?;
    let identity: BackupId = args.backup_id.parse()?;
    let report = ctx.orchestrator.restore_all(&identity)?;
    output::print_report("restore", &report);
    Ok(())
}

pub fn cmd_list(args: ListArgs, insiders: bool) -> Result<()> {
    let ctx = build_context(insiders)?;
    let store = ctx.orchestrator.store();

    let mut identities = store.list_identities()?;
    // The timestamp encoding sorts lexicographically; newest first.
    identities.sort();
    identities.reverse();
    if let Some(n) = args.recent {
        identities.truncate(n);
    }

    if args.json {
        let entries: Vec<serde_json::Value> = identities
            .iter()
            .map(|id| {
                let categories: Vec<String> = store
                    .list_categories(id)
                    .unwrap_or_default()
                    .iter()
                    .map(|c| c.to_string())
                    .collect();
                serde_json::json!({
                    "id": id.to_string(),
                    "size_bytes": store.disk_usage(id),
                    "categories": categories,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_string())
        );
        return Ok(());
    }

    if identities.is_empty() {
        eprintln!("{} no backups found", prefix());
        return Ok(());
    }

    eprintln!("{} {} backup(s)\n", prefix(), identities.len());
    for id in &identities {
        let categories = store.list_categories(id).unwrap_or_default();
        eprintln!(
            "  {}  {}  {} categories",
            id.to_string().white().bold(),
            format_bytes(store.disk_usage(id)).truecolor(150, 150, 150),
            categories.len(),
        );
    }
    Ok(())
}

pub fn cmd_show(args: ShowArgs, insiders: bool) -> Result<()> {
    let ctx = build_context(insiders)?;
    let store = ctx.orchestrator.store();
    let identity: BackupId = args.backup_id.parse()?;

    let categories = store.list_categories(&identity)?;
    eprintln!(
        "{} {}  {}",
        prefix(),
        identity.to_string().white().bold(),
        format_bytes(store.disk_usage(&identity)).truecolor(150, 150, 150),
    );
    for category in &categories {
        eprintln!("  {category}");
    }
    Ok(())
}

pub fn cmd_scrub(args: ScrubArgs, insiders: bool) -> Result<()> {
    let ctx = build_context(insiders)?;
    let report = ctx.orchestrator.scrub(&args.pattern)?;

    if report.rows.store_found {
        eprintln!(
            "{} removed {} state row(s) matching '{}'",
            prefix(),
            report.rows.deleted,
            args.pattern
        );
    } else {
        eprintln!("{} state database not found, nothing to scrub", prefix());
    }
    match report.json_keys_removed {
        Some(removed) => {
            eprintln!("{} removed {} tracking key(s) from storage.json", prefix(), removed);
        }
        None => eprintln!("{} storage.json not found or not scrubbable", prefix()),
    }
    Ok(())
}

pub fn cmd_purge(args: PurgeArgs, insiders: bool) -> Result<()> {
    let ctx = build_context(insiders)?;
    let identity: BackupId = args.backup_id.parse()?;

    if !args.force && !confirm(&format!("Delete backup {identity}?")) {
        eprintln!("{} aborted", prefix());
        return Ok(());
    }

    ctx.orchestrator.store().remove_identity(&identity)?;
    eprintln!("{} deleted {}", prefix(), identity.to_string().white().bold());
    Ok(())
}
