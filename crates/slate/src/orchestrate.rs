//! Orchestrator: sequences engines across the full artifact set
//!
//! Drives the top-level operations (backup everything, reset one or all
//! categories, restore everything) and aggregates per-category outcomes
//! into one report. Category processing order is fixed: machine ID,
//! global storage, state store, extensions, platform stores. Per-category
//! failures are recorded and never abort sibling categories; only a
//! backup-store failure aborts an entire operation.

use crate::error::{Result, SlateError};
use crate::locator::ArtifactLocator;
use crate::log::Logger;
use crate::machine_id;
use crate::platform::PlatformCleaner;
use crate::restore::RestoreEngine;
use crate::snapshot::SnapshotEngine;
use crate::state_db::{RowDeletion, StateStoreEditor};
use crate::storage_json::{self, TRACKING_KEY_PREFIXES};
use crate::store::BackupStore;
use crate::types::{BackupId, Category, OperationReport, Outcome};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Result of a surgical scrub: state rows plus storage.json keys.
#[derive(Debug, Clone, Copy)]
pub struct ScrubReport {
    pub rows: RowDeletion,
    /// Keys removed from storage.json, `None` when the file was absent or
    /// unusable.
    pub json_keys_removed: Option<usize>,
}

pub struct Orchestrator {
    store: BackupStore,
    snapshots: SnapshotEngine,
    restores: RestoreEngine,
    editor: StateStoreEditor,
    locator: Box<dyn ArtifactLocator>,
    cleaner: Box<dyn PlatformCleaner>,
    logger: Arc<dyn Logger>,
}

impl Orchestrator {
    #[must_use]
    pub fn new(
        store: BackupStore,
        locator: Box<dyn ArtifactLocator>,
        cleaner: Box<dyn PlatformCleaner>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        let snapshots = SnapshotEngine::new(store.clone(), logger.clone());
        let restores = RestoreEngine::new(store.clone(), logger.clone());
        let editor = StateStoreEditor::new(logger.clone());
        Self {
            store,
            snapshots,
            restores,
            editor,
            locator,
            cleaner,
            logger,
        }
    }

    #[must_use]
    pub fn store(&self) -> &BackupStore {
        &self.store
    }

    /// The fixed category enumeration: machine ID, global storage, state
    /// store, discovered extensions, platform stores. Extension discovery
    /// is a point-in-time query against the locator.
    fn fixed_categories(&self) -> Vec<Category> {
        let mut categories = vec![
            Category::MachineId,
            Category::GlobalStorage,
            Category::StateDb,
        ];
        categories.extend(
            self.locator
                .list_extension_ids()
                .into_iter()
                .map(Category::Extension),
        );
        categories.extend(
            self.locator
                .platform_store_paths()
                .into_iter()
                .map(|(name, _)| Category::Platform(name)),
        );
        categories
    }

    /// Snapshot every known artifact category under one fresh identity.
    pub fn backup_all(&self) -> Result<OperationReport> {
        let identity = self.store.new_identity();
        let mut report = OperationReport::new(Some(identity.clone()));

        for category in self.fixed_categories() {
            let outcome = demote(self.backup_category(&identity, &category))?;
            self.log_outcome("backup outcome", &category, &outcome);
            report.push(category, outcome);
        }
        Ok(report)
    }

    /// Optionally snapshot one category, then destructively clear it.
    ///
    /// Returns the outcome and the identity used for the snapshot, if any.
    pub fn reset_one(
        &self,
        category: &Category,
        backup: bool,
    ) -> Result<(Outcome, Option<BackupId>)> {
        let identity = (backup && self.live_artifact_exists(category))
            .then(|| self.store.new_identity());

        if let Some(id) = &identity {
            let snapped = demote(self.backup_category(id, category))?;
            self.log_outcome("backup outcome", category, &snapped);
            if let Outcome::Failed(err) = snapped {
                // Never destroy an artifact whose snapshot failed.
                let outcome =
                    Outcome::Failed(format!("backup failed, artifact left untouched: {err}"));
                self.log_outcome("reset outcome", category, &outcome);
                return Ok((outcome, identity));
            }
        }

        let outcome = demote(self.clear_category(category))?;
        self.log_outcome("reset outcome", category, &outcome);
        Ok((outcome, identity))
    }

    /// Backup everything (if requested) under one identity, then reset
    /// every category in the fixed order, continuing past individual
    /// failures. The platform cleaner runs after the file/db-level resets
    /// and its result is folded into the report.
    pub fn reset_all(&self, backup: bool) -> Result<OperationReport> {
        let categories = self.fixed_categories();
        let identity = backup.then(|| self.store.new_identity());

        let mut blocked: HashMap<Category, String> = HashMap::new();
        if let Some(id) = &identity {
            for category in &categories {
                let outcome = demote(self.backup_category(id, category))?;
                self.log_outcome("backup outcome", category, &outcome);
                if let Outcome::Failed(err) = outcome {
                    blocked.insert(category.clone(), err);
                }
            }
        }

        let mut report = OperationReport::new(identity);
        for category in categories {
            let outcome = if let Some(err) = blocked.get(&category) {
                Outcome::Failed(format!("backup failed, artifact left untouched: {err}"))
            } else {
                demote(self.clear_category(&category))?
            };
            self.log_outcome("reset outcome", &category, &outcome);
            report.push(category, outcome);
        }

        let cleaner_category = Category::Platform(self.cleaner.name().to_string());
        let cleaned = demote(self.cleaner.clean().map(|ok| {
            if ok {
                Outcome::Success
            } else {
                Outcome::Failed("platform cleaner reported failure".to_string())
            }
        }))?;
        self.log_outcome("reset outcome", &cleaner_category, &cleaned);
        report.push(cleaner_category, cleaned);

        Ok(report)
    }

    /// Restore every category present under one identity, discovered by
    /// listing the snapshot directory. Categories absent from the snapshot
    /// are skipped silently.
    pub fn restore_all(&self, identity: &BackupId) -> Result<OperationReport> {
        let categories = self.store.list_categories(identity)?;
        let mut report = OperationReport::new(Some(identity.clone()));

        for category in categories {
            let outcome = demote(self.restore_category(identity, &category))?;
            self.log_outcome("restore outcome", &category, &outcome);
            report.push(category, outcome);
        }
        Ok(report)
    }

    /// Surgical reset: delete matching state rows and scrub tracking keys
    /// from storage.json, without replacing any file.
    pub fn scrub(&self, pattern: &str) -> Result<ScrubReport> {
        let rows = self
            .editor
            .delete_rows_matching(&self.locator.state_db_path(), pattern)?;
        let json_keys_removed = storage_json::scrub_keys(
            &self.locator.storage_json_path(),
            TRACKING_KEY_PREFIXES,
            self.logger.as_ref(),
        )?;
        Ok(ScrubReport {
            rows,
            json_keys_removed,
        })
    }

    fn backup_category(&self, identity: &BackupId, category: &Category) -> Result<Outcome> {
        let outcome = match category {
            Category::MachineId => self
                .snapshots
                .snapshot_file(identity, category, &self.locator.machine_id_path())?
                .into_outcome(),
            Category::GlobalStorage => self
                .snapshots
                .snapshot_tree(identity, category, &self.locator.global_storage_path())?
                .ok()
                .into_outcome(),
            Category::StateDb => self
                .snapshots
                .snapshot_file(identity, category, &self.locator.state_db_path())?
                .into_outcome(),
            Category::Extension(id) => self
                .snapshots
                .snapshot_tree(identity, category, &self.locator.extension_data_path(id))?
                .ok()
                .into_outcome(),
            Category::Platform(name) => match self.platform_store_path(name) {
                Some(path) => self
                    .snapshots
                    .snapshot_file(identity, category, &path)?
                    .into_outcome(),
                None => Outcome::Skipped("no live location for platform store".to_string()),
            },
        };
        Ok(outcome)
    }

    fn clear_category(&self, category: &Category) -> Result<Outcome> {
        match category {
            Category::MachineId => {
                let path = self.locator.machine_id_path();
                let old = machine_id::read(&path, self.logger.as_ref())?;
                let new = machine_id::generate();
                machine_id::write(&path, &new)?;
                self.logger.info(
                    "machine id reset",
                    &[
                        ("old", old.unwrap_or_else(|| "none".to_string())),
                        ("new", new),
                    ],
                );
                Ok(Outcome::Success)
            }
            Category::GlobalStorage => {
                let path = self.locator.global_storage_path();
                if !path.is_dir() {
                    return Ok(Outcome::Skipped("not present".to_string()));
                }
                fs::remove_dir_all(&path)?;
                fs::create_dir_all(&path)?;
                Ok(Outcome::Success)
            }
            Category::StateDb => {
                let path = self.locator.state_db_path();
                if !path.is_file() {
                    return Ok(Outcome::Skipped("not present".to_string()));
                }
                fs::remove_file(&path)?;
                let journal = journal_path(&path);
                if journal.is_file() {
                    fs::remove_file(&journal)?;
                }
                Ok(Outcome::Success)
            }
            Category::Extension(id) => {
                let path = self.locator.extension_data_path(id);
                let removed_dir = path.is_dir();
                if removed_dir {
                    fs::remove_dir_all(&path)?;
                }
                let rows = self
                    .editor
                    .delete_rows_matching(&self.locator.state_db_path(), id)?;
                if removed_dir || rows.deleted > 0 {
                    Ok(Outcome::Success)
                } else {
                    Ok(Outcome::Skipped("not present".to_string()))
                }
            }
            Category::Platform(name) => match self.platform_store_path(name) {
                Some(path) if path.is_file() => {
                    fs::remove_file(&path)?;
                    Ok(Outcome::Success)
                }
                Some(_) => Ok(Outcome::Skipped("not present".to_string())),
                None => Ok(Outcome::Skipped(
                    "no live location for platform store".to_string(),
                )),
            },
        }
    }

    fn restore_category(&self, identity: &BackupId, category: &Category) -> Result<Outcome> {
        let restored = match category {
            Category::MachineId => {
                self.restores
                    .restore_file(identity, category, &self.locator.machine_id_path())?
            }
            Category::GlobalStorage => self.restores.restore_tree(
                identity,
                category,
                &self.locator.global_storage_path(),
            )?,
            Category::StateDb => {
                self.restores
                    .restore_file(identity, category, &self.locator.state_db_path())?
            }
            Category::Extension(id) => self.restores.restore_tree(
                identity,
                category,
                &self.locator.extension_data_path(id),
            )?,
            Category::Platform(name) => match self.platform_store_path(name) {
                Some(path) => self.restores.restore_file(identity, category, &path)?,
                None => {
                    return Ok(Outcome::Skipped(
                        "no live location for platform store".to_string(),
                    ))
                }
            },
        };
        if restored {
            Ok(Outcome::Success)
        } else {
            Ok(Outcome::Skipped("nothing to restore".to_string()))
        }
    }

    fn live_artifact_exists(&self, category: &Category) -> bool {
        match category {
            Category::MachineId => self.locator.machine_id_path().is_file(),
            Category::GlobalStorage => self.locator.global_storage_path().is_dir(),
            Category::StateDb => self.locator.state_db_path().is_file(),
            Category::Extension(id) => self.locator.extension_data_path(id).is_dir(),
            Category::Platform(name) => self
                .platform_store_path(name)
                .is_some_and(|p| p.is_file()),
        }
    }

    fn platform_store_path(&self, name: &str) -> Option<PathBuf> {
        self.locator
            .platform_store_paths()
            .into_iter()
            .find(|(n, _)| n == name)
            .map(|(_, path)| path)
    }

    fn log_outcome(&self, operation: &str, category: &Category, outcome: &Outcome) {
        let fields = [
            ("category", category.to_string()),
            ("outcome", outcome.to_string()),
        ];
        match outcome {
            Outcome::Success => self.logger.info(operation, &fields),
            Outcome::Skipped(_) => self.logger.warn(operation, &fields),
            Outcome::Failed(_) => self.logger.error(operation, &fields),
        }
    }
}

/// Convert engine errors into per-category failures, letting only
/// backup-store failures abort the enclosing operation.
fn demote(result: Result<Outcome>) -> Result<Outcome> {
    match result {
        Err(e @ SlateError::StorageUnavailable { .. }) => Err(e),
        Err(e) => Ok(Outcome::Failed(e.to_string())),
        ok => ok,
    }
}

fn journal_path(db_path: &std::path::Path) -> PathBuf {
    let mut name = db_path.as_os_str().to_os_string();
    name.push("-journal");
    PathBuf::from(name)
}

trait IntoOutcome {
    fn into_outcome(self) -> Outcome;
}

impl IntoOutcome for bool {
    fn into_outcome(self) -> Outcome {
        if self {
            Outcome::Success
        } else {
            Outcome::Skipped("source missing".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::RecordingLogger;
    use crate::platform::NoopCleaner;
    use rusqlite::Connection;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Locator with independent artifact locations so individual sources
    /// can be absent without affecting siblings.
    struct TestLocator {
        root: PathBuf,
        platform: Vec<(String, PathBuf)>,
    }

    impl TestLocator {
        fn new(root: PathBuf) -> Self {
            Self {
                root,
                platform: Vec::new(),
            }
        }
    }

    impl ArtifactLocator for TestLocator {
        fn install_root(&self) -> &Path {
            &self.root
        }

        fn machine_id_path(&self) -> PathBuf {
            self.root.join("machineId")
        }

        fn global_storage_path(&self) -> PathBuf {
            self.root.join("globalStorage")
        }

        fn state_db_path(&self) -> PathBuf {
            self.root.join("state.vscdb")
        }

        fn storage_json_path(&self) -> PathBuf {
            self.root.join("storage.json")
        }

        fn extension_data_path(&self, extension_id: &str) -> PathBuf {
            self.root.join("extensions").join(extension_id)
        }

        fn list_extension_ids(&self) -> Vec<String> {
            let Ok(entries) = fs::read_dir(self.root.join("extensions")) else {
                return Vec::new();
            };
            let mut ids: Vec<String> = entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().is_dir())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect();
            ids.sort();
            ids
        }

        fn platform_store_paths(&self) -> Vec<(String, PathBuf)> {
            self.platform.clone()
        }
    }

    fn setup() -> (TempDir, Orchestrator, Arc<RecordingLogger>) {
        let dir = TempDir::new().expect("tempdir");
        let logger = Arc::new(RecordingLogger::new());
        let store = BackupStore::new(dir.path().join("backups"), logger.clone());
        let locator = TestLocator::new(dir.path().join("editor"));
        let orchestrator = Orchestrator::new(
            store,
            Box::new(locator),
            Box::new(NoopCleaner),
            logger.clone(),
        );
        (dir, orchestrator, logger)
    }

    fn editor_root(dir: &TempDir) -> PathBuf {
        dir.path().join("editor")
    }

    fn create_state_db(path: &Path, rows: &[(&str, &str)]) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        let conn = Connection::open(path).expect("open");
        conn.execute_batch(
            "CREATE TABLE ItemTable (key TEXT UNIQUE ON CONFLICT REPLACE, value BLOB)",
        )
        .expect("create table");
        for (key, value) in rows {
            conn.execute(
                "INSERT INTO ItemTable (key, value) VALUES (?1, ?2)",
                [key, value],
            )
            .expect("insert");
        }
    }

    fn state_rows(path: &Path) -> Vec<String> {
        let conn = Connection::open(path).expect("open");
        let mut stmt = conn
            .prepare("SELECT key FROM ItemTable ORDER BY key")
            .expect("prepare");
        stmt.query_map([], |row| row.get::<_, String>(0))
            .expect("query")
            .filter_map(|r| r.ok())
            .collect()
    }

    fn seed_all(dir: &TempDir) {
        let root = editor_root(dir);
        fs::create_dir_all(root.join("globalStorage/pub.name")).expect("create");
        fs::write(root.join("machineId"), b"old-machine-id").expect("write");
        fs::write(root.join("globalStorage/pub.name/data.json"), b"{}").expect("write");
        create_state_db(&root.join("state.vscdb"), &[("pub.name.install", "1")]);
        fs::create_dir_all(root.join("extensions/pub.name")).expect("create");
        fs::write(root.join("extensions/pub.name/usage.log"), b"lines").expect("write");
    }

    fn outcome_for<'a>(report: &'a OperationReport, name: &str) -> &'a Outcome {
        &report
            .outcomes()
            .iter()
            .find(|(c, _)| c.to_string() == name)
            .unwrap_or_else(|| panic!("category {name} missing from report"))
            .1
    }

    #[test]
    fn backup_all_snapshots_every_category() {
        let (dir, orchestrator, _logger) = setup();
        seed_all(&dir);

        let report = orchestrator.backup_all().expect("backup");
        let identity = report.identity().expect("identity").clone();

        assert!(report.overall_ok());
        assert_eq!(outcome_for(&report, "machineId"), &Outcome::Success);
        assert_eq!(outcome_for(&report, "globalStorage"), &Outcome::Success);
        assert_eq!(outcome_for(&report, "stateDb"), &Outcome::Success);
        assert_eq!(
            outcome_for(&report, "extensions/pub.name"),
            &Outcome::Success
        );

        let store = orchestrator.store();
        assert!(store.has_record(&identity, &Category::MachineId));
        assert!(store.has_record(&identity, &Category::StateDb));
        assert!(store.has_record(&identity, &Category::GlobalStorage));
    }

    #[test]
    fn backup_all_survives_missing_global_storage() {
        let (dir, orchestrator, _logger) = setup();
        let root = editor_root(&dir);
        fs::create_dir_all(&root).expect("create");
        fs::write(root.join("machineId"), b"token").expect("write");
        create_state_db(&root.join("state.vscdb"), &[("k", "v")]);
        // globalStorage deliberately absent

        let report = orchestrator.backup_all().expect("backup");
        let identity = report.identity().expect("identity");

        assert_eq!(outcome_for(&report, "machineId"), &Outcome::Success);
        assert_eq!(outcome_for(&report, "stateDb"), &Outcome::Success);
        assert!(matches!(
            outcome_for(&report, "globalStorage"),
            Outcome::Skipped(_)
        ));

        let store = orchestrator.store();
        assert!(store.has_record(identity, &Category::MachineId));
        assert!(store.has_record(identity, &Category::StateDb));
        assert!(!store.has_record(identity, &Category::GlobalStorage));
    }

    #[test]
    fn backup_all_aborts_when_store_root_uncreatable() {
        let (dir, _orchestrator, logger) = setup();
        seed_all(&dir);

        // A plain file where the store root should be makes every
        // create_dir_all under it fail.
        fs::write(dir.path().join("blocked"), b"").expect("write");
        let store = BackupStore::new(dir.path().join("blocked"), logger.clone());
        let orchestrator = Orchestrator::new(
            store,
            Box::new(TestLocator::new(editor_root(&dir))),
            Box::new(NoopCleaner),
            logger,
        );

        let result = orchestrator.backup_all();
        assert!(matches!(
            result,
            Err(SlateError::StorageUnavailable { .. })
        ));
    }

    #[test]
    fn reset_all_processes_categories_in_fixed_order() {
        let (dir, orchestrator, _logger) = setup();
        seed_all(&dir);

        let first = orchestrator.reset_all(false).expect("first reset");
        let first_order: Vec<String> = first
            .outcomes()
            .iter()
            .map(|(c, _)| c.to_string())
            .collect();
        assert_eq!(
            first_order,
            vec![
                "machineId",
                "globalStorage",
                "stateDb",
                "extensions/pub.name",
                "platform/noop",
            ]
        );

        // Second run: extension data is gone, so discovery yields nothing,
        // but the remaining categories keep their documented order.
        let second = orchestrator.reset_all(false).expect("second reset");
        let second_order: Vec<String> = second
            .outcomes()
            .iter()
            .map(|(c, _)| c.to_string())
            .collect();
        assert_eq!(
            second_order,
            vec!["machineId", "globalStorage", "stateDb", "platform/noop"]
        );
    }

    #[test]
    fn reset_all_with_backup_snapshots_before_clearing() {
        let (dir, orchestrator, _logger) = setup();
        seed_all(&dir);
        let root = editor_root(&dir);

        let report = orchestrator.reset_all(true).expect("reset");
        let identity = report.identity().expect("identity");

        // Old state is preserved under the identity.
        let store = orchestrator.store();
        let machine_record = store.record_path(identity, &Category::MachineId);
        assert_eq!(
            fs::read(machine_record).expect("read record"),
            b"old-machine-id"
        );
        assert!(store.has_record(identity, &Category::StateDb));

        // Live state is cleared: fresh machine id, empty global storage,
        // no state db, no extension data.
        let new_id = fs::read_to_string(root.join("machineId")).expect("read");
        assert_ne!(new_id, "old-machine-id");
        assert!(root.join("globalStorage").is_dir());
        assert_eq!(
            fs::read_dir(root.join("globalStorage"))
                .expect("read dir")
                .count(),
            0
        );
        assert!(!root.join("state.vscdb").exists());
        assert!(!root.join("extensions/pub.name").exists());
    }

    #[test]
    fn reset_all_continues_past_category_failure() {
        let (dir, orchestrator, _logger) = setup();
        let root = editor_root(&dir);
        // A directory squatting on the machineId path makes the token
        // rewrite fail; later categories must still be processed.
        fs::create_dir_all(root.join("machineId")).expect("create");
        fs::create_dir_all(root.join("globalStorage")).expect("create");
        fs::write(root.join("globalStorage/a.txt"), b"x").expect("write");
        create_state_db(&root.join("state.vscdb"), &[("k", "v")]);

        let report = orchestrator.reset_all(false).expect("reset");
        assert!(matches!(
            outcome_for(&report, "machineId"),
            Outcome::Failed(_)
        ));
        assert_eq!(outcome_for(&report, "globalStorage"), &Outcome::Success);
        assert_eq!(outcome_for(&report, "stateDb"), &Outcome::Success);
        assert!(!report.overall_ok());
        assert!(report.succeeded() >= 2);
    }

    #[test]
    fn reset_one_extension_fails_on_corrupt_state_store() {
        let (dir, orchestrator, _logger) = setup();
        let root = editor_root(&dir);
        fs::create_dir_all(root.join("extensions/pub.name")).expect("create");
        fs::write(root.join("state.vscdb"), b"not a database").expect("write");

        let (outcome, _identity) = orchestrator
            .reset_one(&Category::Extension("pub.name".to_string()), false)
            .expect("reset");
        assert!(matches!(outcome, Outcome::Failed(_)));
    }

    #[test]
    fn reset_one_machine_id_backs_up_and_regenerates() {
        let (dir, orchestrator, _logger) = setup();
        let root = editor_root(&dir);
        fs::create_dir_all(&root).expect("create");
        fs::write(root.join("machineId"), b"old-token").expect("write");

        let (outcome, identity) = orchestrator
            .reset_one(&Category::MachineId, true)
            .expect("reset");
        assert_eq!(outcome, Outcome::Success);
        let identity = identity.expect("identity allocated");

        let record = orchestrator
            .store()
            .record_path(&identity, &Category::MachineId);
        assert_eq!(fs::read(record).expect("read"), b"old-token");

        let new_token = fs::read_to_string(root.join("machineId")).expect("read");
        assert_ne!(new_token, "old-token");
    }

    #[test]
    fn reset_one_without_artifact_allocates_no_identity() {
        let (_dir, orchestrator, _logger) = setup();
        let (outcome, identity) = orchestrator
            .reset_one(&Category::StateDb, true)
            .expect("reset");
        assert!(matches!(outcome, Outcome::Skipped(_)));
        assert!(identity.is_none());
    }

    #[test]
    fn reset_one_extension_removes_data_and_state_rows() {
        let (dir, orchestrator, _logger) = setup();
        let root = editor_root(&dir);
        fs::create_dir_all(root.join("extensions/pub.name")).expect("create");
        fs::write(root.join("extensions/pub.name/data"), b"x").expect("write");
        create_state_db(
            &root.join("state.vscdb"),
            &[("pub.name.install", "1"), ("other.key", "2")],
        );

        let category = Category::Extension("pub.name".to_string());
        let (outcome, _identity) = orchestrator.reset_one(&category, false).expect("reset");
        assert_eq!(outcome, Outcome::Success);

        assert!(!root.join("extensions/pub.name").exists());
        assert_eq!(
            state_rows(&root.join("state.vscdb")),
            vec!["other.key".to_string()]
        );
    }

    #[test]
    fn restore_all_brings_back_backed_up_state() {
        let (dir, orchestrator, _logger) = setup();
        seed_all(&dir);
        let root = editor_root(&dir);

        let backup = orchestrator.backup_all().expect("backup");
        let identity = backup.identity().expect("identity").clone();

        orchestrator.reset_all(false).expect("reset");
        assert!(!root.join("state.vscdb").exists());

        let report = orchestrator.restore_all(&identity).expect("restore");
        assert!(report.overall_ok());

        assert_eq!(
            fs::read(root.join("machineId")).expect("read"),
            b"old-machine-id"
        );
        assert!(root.join("globalStorage/pub.name/data.json").exists());
        assert_eq!(
            state_rows(&root.join("state.vscdb")),
            vec!["pub.name.install".to_string()]
        );
        assert!(root.join("extensions/pub.name/usage.log").exists());
    }

    #[test]
    fn restore_all_skips_categories_absent_from_snapshot() {
        let (dir, orchestrator, _logger) = setup();
        let root = editor_root(&dir);
        fs::create_dir_all(&root).expect("create");
        fs::write(root.join("machineId"), b"token").expect("write");
        // Only the machine id exists at backup time.

        let backup = orchestrator.backup_all().expect("backup");
        let identity = backup.identity().expect("identity").clone();

        let report = orchestrator.restore_all(&identity).expect("restore");
        let names: Vec<String> = report
            .outcomes()
            .iter()
            .map(|(c, _)| c.to_string())
            .collect();
        assert_eq!(names, vec!["machineId"]);
    }

    #[test]
    fn restore_all_unknown_identity_is_an_error() {
        let (_dir, orchestrator, _logger) = setup();
        let identity: BackupId = "backup_20990101_000000".parse().expect("parse");
        let result = orchestrator.restore_all(&identity);
        assert!(matches!(result, Err(SlateError::UnknownIdentity(_))));
    }

    #[test]
    fn scrub_deletes_rows_and_json_keys() {
        let (dir, orchestrator, _logger) = setup();
        let root = editor_root(&dir);
        create_state_db(
            &root.join("state.vscdb"),
            &[("pub.name.session", "1"), ("unrelated", "2")],
        );
        fs::write(
            root.join("storage.json"),
            r#"{"extensionTracker.count": 4, "theme": "dark"}"#,
        )
        .expect("write");

        let report = orchestrator.scrub("pub.name").expect("scrub");
        assert!(report.rows.store_found);
        assert_eq!(report.rows.deleted, 1);
        assert_eq!(report.json_keys_removed, Some(1));

        assert_eq!(
            state_rows(&root.join("state.vscdb")),
            vec!["unrelated".to_string()]
        );
    }

    #[test]
    fn scrub_with_no_stores_is_nothing_to_do() {
        let (_dir, orchestrator, _logger) = setup();
        let report = orchestrator.scrub("anything").expect("scrub");
        assert!(!report.rows.store_found);
        assert_eq!(report.rows.deleted, 0);
        assert!(report.json_keys_removed.is_none());
    }

    #[test]
    fn reset_logs_every_category() {
        let (dir, orchestrator, logger) = setup();
        seed_all(&dir);

        let report = orchestrator.reset_all(false).expect("reset");

        let logged: Vec<String> = logger
            .entries()
            .into_iter()
            .filter(|e| e.message == "reset outcome")
            .filter_map(|e| e.field("category").map(str::to_string))
            .collect();
        let reported: Vec<String> = report
            .outcomes()
            .iter()
            .map(|(c, _)| c.to_string())
            .collect();
        assert_eq!(logged, reported);
    }
}
