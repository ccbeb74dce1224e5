//! Backup store: the on-disk catalog of snapshots
//!
//! Owns the snapshot layout under a single root directory: one subdirectory
//! per backup identity, each holding category subpaths mirroring the live
//! artifacts' relative structure. Snapshots are append-only and never
//! pruned automatically.

use crate::error::{Result, SlateError};
use crate::log::Logger;
use crate::types::{BackupId, Category, EXTENSIONS_DIR, PLATFORM_DIR};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// Fixed name of the backup root directory, created under the editor's
/// installation directory by default.
pub const BACKUP_DIR_NAME: &str = "slate_backups";

/// Append-only catalog of backup snapshots.
#[derive(Clone)]
pub struct BackupStore {
    root: PathBuf,
    logger: Arc<dyn Logger>,
}

impl BackupStore {
    #[must_use]
    pub fn new(root: PathBuf, logger: Arc<dyn Logger>) -> Self {
        Self { root, logger }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Allocate a fresh backup identity with second-level timestamp encoding.
    #[must_use]
    pub fn new_identity(&self) -> BackupId {
        BackupId::now()
    }

    /// Directory holding one snapshot.
    #[must_use]
    pub fn identity_dir(&self, identity: &BackupId) -> PathBuf {
        self.root.join(identity.as_str())
    }

    /// Path of one category's record inside a snapshot.
    #[must_use]
    pub fn record_path(&self, identity: &BackupId, category: &Category) -> PathBuf {
        self.identity_dir(identity).join(category.rel_path())
    }

    /// Deterministically map (identity, category) to a snapshot path,
    /// creating parent directories as a side effect.
    pub fn category_path(&self, identity: &BackupId, category: &Category) -> Result<PathBuf> {
        let path = self.record_path(identity, category);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| SlateError::StorageUnavailable {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        Ok(path)
    }

    /// Whether a record already exists for (identity, category).
    #[must_use]
    pub fn has_record(&self, identity: &BackupId, category: &Category) -> bool {
        self.record_path(identity, category).exists()
    }

    /// Enumerate existing snapshot identities by reading the store root.
    ///
    /// Order is directory enumeration order, not guaranteed chronological.
    /// A missing root means no backups have been taken yet.
    pub fn list_identities(&self) -> Result<Vec<BackupId>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.root).map_err(|e| SlateError::StorageUnavailable {
            path: self.root.clone(),
            source: e,
        })?;

        let mut identities = Vec::new();
        for entry in entries.filter_map(|e| e.ok()) {
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name();
            match name.to_string_lossy().parse::<BackupId>() {
                Ok(id) => identities.push(id),
                Err(_) => {
                    self.logger.warn(
                        "skipping unrecognized entry in backup root",
                        &[("name", name.to_string_lossy().into_owned())],
                    );
                }
            }
        }
        Ok(identities)
    }

    /// Discover the categories recorded under one snapshot by listing its
    /// directory. Returns them sorted for stable output.
    pub fn list_categories(&self, identity: &BackupId) -> Result<Vec<Category>> {
        let dir = self.identity_dir(identity);
        if !dir.is_dir() {
            return Err(SlateError::UnknownIdentity(identity.to_string()));
        }

        let mut categories = Vec::new();
        for entry in read_entries(&dir)? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();
            match name.as_str() {
                "machineId" if path.is_file() => categories.push(Category::MachineId),
                "stateDb" if path.is_file() => categories.push(Category::StateDb),
                "globalStorage" if path.is_dir() => categories.push(Category::GlobalStorage),
                EXTENSIONS_DIR if path.is_dir() => {
                    for child in read_entries(&path)? {
                        if child.path().is_dir() {
                            let id = child.file_name().to_string_lossy().into_owned();
                            categories.push(Category::Extension(id));
                        }
                    }
                }
                PLATFORM_DIR if path.is_dir() => {
                    for child in read_entries(&path)? {
                        if child.path().is_file() {
                            let store = child.file_name().to_string_lossy().into_owned();
                            categories.push(Category::Platform(store));
                        }
                    }
                }
                _ => {
                    self.logger.warn(
                        "skipping unrecognized snapshot entry",
                        &[
                            ("identity", identity.to_string()),
                            ("name", name.clone()),
                        ],
                    );
                }
            }
        }

        categories.sort_by_key(|c| c.to_string());
        Ok(categories)
    }

    /// Total disk usage of one snapshot in bytes.
    #[must_use]
    pub fn disk_usage(&self, identity: &BackupId) -> u64 {
        WalkDir::new(self.identity_dir(identity))
            .into_iter()
            .filter_map(|e| e.ok())
            .filter_map(|e| e.metadata().ok())
            .filter(|m| m.is_file())
            .map(|m| m.len())
            .sum()
    }

    /// Remove one snapshot entirely. Explicit, never automatic.
    pub fn remove_identity(&self, identity: &BackupId) -> Result<()> {
        let dir = self.identity_dir(identity);
        if !dir.is_dir() {
            return Err(SlateError::UnknownIdentity(identity.to_string()));
        }
        fs::remove_dir_all(&dir).map_err(|e| SlateError::StorageUnavailable {
            path: dir,
            source: e,
        })?;
        self.logger
            .info("removed backup", &[("identity", identity.to_string())]);
        Ok(())
    }
}

fn read_entries(dir: &Path) -> Result<Vec<fs::DirEntry>> {
    let entries = fs::read_dir(dir).map_err(|e| SlateError::StorageUnavailable {
        path: dir.to_path_buf(),
        source: e,
    })?;
    Ok(entries.filter_map(|e| e.ok()).collect())
}
