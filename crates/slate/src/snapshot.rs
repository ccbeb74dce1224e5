//! Snapshot engine: copies live artifacts into a backup snapshot
//!
//! Handles the two artifact shapes that get stored directly: single files
//! and directory trees. The state database is snapshotted as a single file
//! before any mutation touches it.

use crate::error::{Result, SlateError};
use crate::log::Logger;
use crate::store::BackupStore;
use crate::types::{BackupId, Category};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// One file that could not be copied during a tree snapshot.
#[derive(Debug, Clone)]
pub struct CopyFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Result of a tree snapshot.
///
/// `ok()` preserves the legacy contract: it is `true` whenever the source
/// root existed, even if individual file copies failed. Callers that need
/// precision inspect `failures` directly.
#[derive(Debug, Clone, Default)]
pub struct TreeSnapshot {
    root_found: bool,
    pub copied: usize,
    pub failures: Vec<CopyFailure>,
}

impl TreeSnapshot {
    /// Legacy success signal: the source root existed and the copy was
    /// attempted. "Attempted", not "perfect".
    #[must_use]
    pub fn ok(&self) -> bool {
        self.root_found
    }
}

/// Copies one artifact at a time into a given snapshot, preserving
/// relative structure.
pub struct SnapshotEngine {
    store: BackupStore,
    logger: Arc<dyn Logger>,
}

impl SnapshotEngine {
    #[must_use]
    pub fn new(store: BackupStore, logger: Arc<dyn Logger>) -> Self {
        Self { store, logger }
    }

    /// Copy one file into the snapshot, preserving content, permission
    /// bits, and modification time.
    ///
    /// A missing source is an expected, non-fatal condition: logged as a
    /// warning and reported as `Ok(false)`.
    pub fn snapshot_file(
        &self,
        identity: &BackupId,
        category: &Category,
        source: &Path,
    ) -> Result<bool> {
        if !source.is_file() {
            self.logger.warn(
                "artifact not found, nothing to back up",
                &[
                    ("category", category.to_string()),
                    ("path", source.display().to_string()),
                ],
            );
            return Ok(false);
        }

        self.guard_immutable(identity, category)?;
        let dest = self.store.category_path(identity, category)?;
        copy_preserving(source, &dest).map_err(|e| SlateError::CopyFailed {
            path: source.to_path_buf(),
            source: e,
        })?;

        self.logger.info(
            "backed up file",
            &[
                ("category", category.to_string()),
                ("identity", identity.to_string()),
            ],
        );
        Ok(true)
    }

    /// Recursively copy every regular file under `source_root` into the
    /// snapshot, preserving paths relative to the root.
    ///
    /// Symbolic links and directory entries are excluded; the directory
    /// skeleton is reconstructed implicitly by the copied file paths. A
    /// single file's failure is logged and collected but does not abort
    /// the remaining copies.
    pub fn snapshot_tree(
        &self,
        identity: &BackupId,
        category: &Category,
        source_root: &Path,
    ) -> Result<TreeSnapshot> {
        if !source_root.is_dir() {
            self.logger.warn(
                "artifact directory not found, nothing to back up",
                &[
                    ("category", category.to_string()),
                    ("path", source_root.display().to_string()),
                ],
            );
            return Ok(TreeSnapshot::default());
        }

        self.guard_immutable(identity, category)?;
        let dest_root = self.store.category_path(identity, category)?;
        fs::create_dir_all(&dest_root).map_err(|e| SlateError::StorageUnavailable {
            path: dest_root.clone(),
            source: e,
        })?;

        let mut outcome = TreeSnapshot {
            root_found: true,
            ..TreeSnapshot::default()
        };

        for entry in WalkDir::new(source_root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Ok(rel) = path.strip_prefix(source_root) else {
                continue;
            };
            let dest = dest_root.join(rel);

            let copied = dest
                .parent()
                .map(fs::create_dir_all)
                .unwrap_or(Ok(()))
                .and_then(|()| copy_preserving(path, &dest));

            match copied {
                Ok(()) => outcome.copied += 1,
                Err(e) => {
                    self.logger.warn(
                        "failed to copy file into snapshot, continuing",
                        &[
                            ("path", path.display().to_string()),
                            ("error", e.to_string()),
                        ],
                    );
                    outcome.failures.push(CopyFailure {
                        path: path.to_path_buf(),
                        error: e.to_string(),
                    });
                }
            }
        }

        self.logger.info(
            "backed up directory tree",
            &[
                ("category", category.to_string()),
                ("identity", identity.to_string()),
                ("copied", outcome.copied.to_string()),
                ("failed", outcome.failures.len().to_string()),
            ],
        );
        Ok(outcome)
    }

    /// A non-empty snapshot is immutable per (identity, category).
    fn guard_immutable(&self, identity: &BackupId, category: &Category) -> Result<()> {
        if self.store.has_record(identity, category) {
            return Err(SlateError::RecordExists {
                identity: identity.to_string(),
                category: category.to_string(),
            });
        }
        Ok(())
    }
}

/// Copy a file preserving permission bits and modification time.
pub(crate) fn copy_preserving(source: &Path, dest: &Path) -> std::io::Result<()> {
    fs::copy(source, dest)?;
    if let Ok(mtime) = fs::metadata(source).and_then(|m| m.modified()) {
        let file = fs::File::options().write(true).open(dest)?;
        file.set_times(fs::FileTimes::new().set_modified(mtime))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{LogLevel, RecordingLogger};
    use tempfile::TempDir;

    fn setup() -> (TempDir, SnapshotEngine, Arc<RecordingLogger>) {
        let dir = TempDir::new().expect("tempdir");
        let logger = Arc::new(RecordingLogger::new());
        let store = BackupStore::new(dir.path().join("backups"), logger.clone());
        let engine = SnapshotEngine::new(store, logger.clone());
        (dir, engine, logger)
    }

    fn test_id(s: &str) -> BackupId {
        s.parse().expect("valid identity")
    }

    #[test]
    fn snapshot_file_copies_content() {
        let (dir, engine, _logger) = setup();
        let source = dir.path().join("machineId");
        fs::write(&source, b"a1b2c3").expect("write source");

        let id = test_id("backup_20260807_120000");
        let stored = engine
            .snapshot_file(&id, &Category::MachineId, &source)
            .expect("snapshot");
        assert!(stored);

        let record = engine.store.record_path(&id, &Category::MachineId);
        assert_eq!(fs::read(&record).expect("read record"), b"a1b2c3");
    }

    #[test]
    fn snapshot_file_preserves_mtime() {
        let (dir, engine, _logger) = setup();
        let source = dir.path().join("machineId");
        fs::write(&source, b"token").expect("write source");
        let source_mtime = fs::metadata(&source)
            .and_then(|m| m.modified())
            .expect("source mtime");

        let id = test_id("backup_20260807_120000");
        engine
            .snapshot_file(&id, &Category::MachineId, &source)
            .expect("snapshot");

        let record = engine.store.record_path(&id, &Category::MachineId);
        let record_mtime = fs::metadata(&record)
            .and_then(|m| m.modified())
            .expect("record mtime");
        assert_eq!(record_mtime, source_mtime);
    }

    #[test]
    fn snapshot_file_missing_source_is_not_error() {
        let (dir, engine, logger) = setup();
        let id = test_id("backup_20260807_120000");

        let stored = engine
            .snapshot_file(&id, &Category::MachineId, &dir.path().join("nope"))
            .expect("snapshot");
        assert!(!stored);

        let entries = logger.entries();
        assert!(entries.iter().any(|e| e.level == LogLevel::Warn));
    }

    #[test]
    fn snapshot_file_refuses_overwrite() {
        let (dir, engine, _logger) = setup();
        let source = dir.path().join("machineId");
        fs::write(&source, b"token").expect("write source");

        let id = test_id("backup_20260807_120000");
        engine
            .snapshot_file(&id, &Category::MachineId, &source)
            .expect("first snapshot");
        let second = engine.snapshot_file(&id, &Category::MachineId, &source);
        assert!(matches!(second, Err(SlateError::RecordExists { .. })));
    }

    #[test]
    fn snapshot_tree_preserves_relative_paths() {
        let (dir, engine, _logger) = setup();
        let root = dir.path().join("globalStorage");
        fs::create_dir_all(root.join("a")).expect("create");
        fs::write(root.join("a/1.txt"), b"x").expect("write");
        fs::write(root.join("a/2.txt"), b"y").expect("write");

        let id = test_id("backup_20260807_120000");
        let outcome = engine
            .snapshot_tree(&id, &Category::GlobalStorage, &root)
            .expect("snapshot");
        assert!(outcome.ok());
        assert_eq!(outcome.copied, 2);
        assert!(outcome.failures.is_empty());

        let record = engine.store.record_path(&id, &Category::GlobalStorage);
        assert_eq!(fs::read(record.join("a/1.txt")).expect("read"), b"x");
        assert_eq!(fs::read(record.join("a/2.txt")).expect("read"), b"y");
    }

    #[test]
    fn snapshot_tree_missing_root_reports_not_ok() {
        let (dir, engine, _logger) = setup();
        let id = test_id("backup_20260807_120000");
        let outcome = engine
            .snapshot_tree(&id, &Category::GlobalStorage, &dir.path().join("nope"))
            .expect("snapshot");
        assert!(!outcome.ok());
        assert_eq!(outcome.copied, 0);
    }

    #[cfg(unix)]
    #[test]
    fn snapshot_tree_excludes_symlinks() {
        let (dir, engine, _logger) = setup();
        let root = dir.path().join("globalStorage");
        fs::create_dir_all(&root).expect("create");
        fs::write(root.join("real.txt"), b"x").expect("write");
        std::os::unix::fs::symlink(root.join("real.txt"), root.join("link.txt"))
            .expect("symlink");

        let id = test_id("backup_20260807_120000");
        let outcome = engine
            .snapshot_tree(&id, &Category::GlobalStorage, &root)
            .expect("snapshot");
        assert_eq!(outcome.copied, 1);

        let record = engine.store.record_path(&id, &Category::GlobalStorage);
        assert!(record.join("real.txt").exists());
        assert!(!record.join("link.txt").exists());
    }
}
