//! slate - Backup, reset, and restore engine for editor tracking state
//!
//! This library snapshots the tracking artifacts of a VSCode-family editor
//! installation - machine identifier, global storage, state database,
//! per-extension data - under versioned backup identities, and restores
//! any subset of them later.
//!
//! # Overview
//!
//! slate is the orchestration core: the CLI (and any other presentation
//! layer) composes a [`BackupStore`], an [`ArtifactLocator`], and a
//! [`PlatformCleaner`] into an [`Orchestrator`], then renders the
//! resulting [`OperationReport`] without further interpretation.
//!
//! # Example
//!
//! ```no_run
//! use slate::{
//!     BackupStore, Flavor, InstallPaths, NoopCleaner, Orchestrator, TracingLogger,
//! };
//! use std::sync::Arc;
//!
//! fn main() -> slate::Result<()> {
//!     let logger = Arc::new(TracingLogger);
//!     let install = InstallPaths::discover(Flavor::Standard)?;
//!     let store = BackupStore::new(install.default_backup_root(), logger.clone());
//!     let orchestrator = Orchestrator::new(
//!         store,
//!         Box::new(install),
//!         Box::new(NoopCleaner),
//!         logger,
//!     );
//!
//!     let report = orchestrator.backup_all()?;
//!     println!(
//!         "{}/{} categories backed up",
//!         report.succeeded(),
//!         report.attempted()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! # Guarantees
//!
//! - A non-empty snapshot is immutable: engines refuse to overwrite an
//!   existing record under the same (identity, category).
//! - Restore never fabricates records: absent categories are "nothing to
//!   restore", not errors.
//! - When a backup is requested, every destructive mutation is preceded by
//!   a successful snapshot of the same artifact under the same identity.
//!
//! Execution is single-threaded and blocking; multi-artifact operations
//! run to completion past per-artifact failures and cannot be cancelled.

pub mod error;
pub mod locator;
pub mod log;
pub mod machine_id;
pub mod orchestrate;
pub mod platform;
pub mod restore;
pub mod snapshot;
pub mod state_db;
pub mod storage_json;
pub mod store;
pub mod types;

// Re-exports for convenience
pub use error::{Result, SlateError};
pub use locator::{ArtifactLocator, Flavor, InstallPaths};
pub use log::{Logger, RecordingLogger, TracingLogger};
pub use orchestrate::{Orchestrator, ScrubReport};
pub use platform::{CacheCleaner, NoopCleaner, PlatformCleaner};
pub use restore::RestoreEngine;
pub use snapshot::{SnapshotEngine, TreeSnapshot};
pub use state_db::{RowDeletion, StateStoreEditor};
pub use store::{BackupStore, BACKUP_DIR_NAME};
pub use types::{BackupId, Category, OperationReport, Outcome};
