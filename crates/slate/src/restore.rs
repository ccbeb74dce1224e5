//! Restore engine: copies artifacts from a snapshot back to their live
//! locations
//!
//! Restores replace the current artifact. Tree restores are intentionally
//! not transactional: a crash mid-restore leaves the destination partially
//! populated from the snapshot, and re-running the restore recovers because
//! the remove-then-copy sequence is safe to repeat.

use crate::error::{Result, SlateError};
use crate::log::Logger;
use crate::snapshot::copy_preserving;
use crate::store::BackupStore;
use crate::types::{BackupId, Category};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use walkdir::WalkDir;

/// Copies one artifact at a time from a snapshot back to its live location.
pub struct RestoreEngine {
    store: BackupStore,
    logger: Arc<dyn Logger>,
}

impl RestoreEngine {
    #[must_use]
    pub fn new(store: BackupStore, logger: Arc<dyn Logger>) -> Self {
        Self { store, logger }
    }

    /// Restore a single-file record over `dest`, creating parent
    /// directories as needed.
    ///
    /// An absent record is "nothing to restore", reported as `Ok(false)`,
    /// never an error.
    pub fn restore_file(
        &self,
        identity: &BackupId,
        category: &Category,
        dest: &Path,
    ) -> Result<bool> {
        let record = self.store.record_path(identity, category);
        if !record.is_file() {
            self.logger.warn(
                "backup not found, nothing to restore",
                &[
                    ("category", category.to_string()),
                    ("identity", identity.to_string()),
                ],
            );
            return Ok(false);
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| SlateError::CopyFailed {
                path: dest.to_path_buf(),
                source: e,
            })?;
        }
        copy_preserving(&record, dest).map_err(|e| SlateError::CopyFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;

        self.logger.info(
            "restored file",
            &[
                ("category", category.to_string()),
                ("path", dest.display().to_string()),
            ],
        );
        Ok(true)
    }

    /// Restore a tree record into `dest_root`, removing any pre-existing
    /// content there first.
    pub fn restore_tree(
        &self,
        identity: &BackupId,
        category: &Category,
        dest_root: &Path,
    ) -> Result<bool> {
        let record_root = self.store.record_path(identity, category);
        if !record_root.is_dir() {
            self.logger.warn(
                "backup not found, nothing to restore",
                &[
                    ("category", category.to_string()),
                    ("identity", identity.to_string()),
                ],
            );
            return Ok(false);
        }

        if dest_root.exists() {
            fs::remove_dir_all(dest_root).map_err(|e| SlateError::CopyFailed {
                path: dest_root.to_path_buf(),
                source: e,
            })?;
        }
        fs::create_dir_all(dest_root).map_err(|e| SlateError::CopyFailed {
            path: dest_root.to_path_buf(),
            source: e,
        })?;

        let mut restored = 0usize;
        for entry in WalkDir::new(&record_root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Ok(rel) = path.strip_prefix(&record_root) else {
                continue;
            };
            let dest = dest_root.join(rel);

            let copied = dest
                .parent()
                .map(fs::create_dir_all)
                .unwrap_or(Ok(()))
                .and_then(|()| copy_preserving(path, &dest));

            match copied {
                Ok(()) => restored += 1,
                Err(e) => {
                    self.logger.warn(
                        "failed to restore file, continuing",
                        &[
                            ("path", dest.display().to_string()),
                            ("error", e.to_string()),
                        ],
                    );
                }
            }
        }

        self.logger.info(
            "restored directory tree",
            &[
                ("category", category.to_string()),
                ("path", dest_root.display().to_string()),
                ("restored", restored.to_string()),
            ],
        );
        Ok(true)
    }
}
