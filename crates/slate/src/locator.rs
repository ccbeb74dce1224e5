//! Artifact locator: maps logical artifact names to live locations
//!
//! The core trusts these paths verbatim. [`InstallPaths`] implements the
//! platform rules for a real editor installation; tests substitute their
//! own locator rooted in a temp directory.

use crate::error::{Result, SlateError};
use std::fs;
use std::path::{Path, PathBuf};

/// Which editor flavor an installation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flavor {
    #[default]
    Standard,
    Insiders,
}

impl Flavor {
    #[must_use]
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Standard => "Code",
            Self::Insiders => "Code - Insiders",
        }
    }
}

/// Resolves live artifact locations for the orchestrator.
///
/// `list_extension_ids` is a point-in-time query: it returns the directory
/// names present at call time, not a live view.
pub trait ArtifactLocator: Send + Sync {
    fn install_root(&self) -> &Path;
    fn machine_id_path(&self) -> PathBuf;
    fn global_storage_path(&self) -> PathBuf;
    fn state_db_path(&self) -> PathBuf;
    fn storage_json_path(&self) -> PathBuf;
    fn extension_data_path(&self, extension_id: &str) -> PathBuf;
    fn list_extension_ids(&self) -> Vec<String>;

    /// Platform-specific store files, as (name, live path) pairs.
    fn platform_store_paths(&self) -> Vec<(String, PathBuf)> {
        Vec::new()
    }
}

/// Locator for an on-disk editor installation.
#[derive(Debug, Clone)]
pub struct InstallPaths {
    root: PathBuf,
}

impl InstallPaths {
    /// Discover the installation directory for the current platform.
    pub fn discover(flavor: Flavor) -> Result<Self> {
        let base = if cfg!(target_os = "windows") {
            std::env::var_os("APPDATA")
                .map(PathBuf::from)
                .ok_or(SlateError::HomeNotFound)?
        } else if cfg!(target_os = "macos") {
            let home = dirs::home_dir().ok_or(SlateError::HomeNotFound)?;
            home.join("Library").join("Application Support")
        } else {
            let home = dirs::home_dir().ok_or(SlateError::HomeNotFound)?;
            home.join(".config")
        };
        Ok(Self {
            root: base.join(flavor.dir_name()),
        })
    }

    /// Locator rooted at an explicit installation directory.
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    /// Default backup store root for this installation.
    #[must_use]
    pub fn default_backup_root(&self) -> PathBuf {
        self.root.join(crate::store::BACKUP_DIR_NAME)
    }
}

impl ArtifactLocator for InstallPaths {
    fn install_root(&self) -> &Path {
        &self.root
    }

    fn machine_id_path(&self) -> PathBuf {
        self.root.join("machineId")
    }

    fn global_storage_path(&self) -> PathBuf {
        self.root.join("User").join("globalStorage")
    }

    fn state_db_path(&self) -> PathBuf {
        self.global_storage_path().join("state.vscdb")
    }

    fn storage_json_path(&self) -> PathBuf {
        self.global_storage_path().join("storage.json")
    }

    fn extension_data_path(&self, extension_id: &str) -> PathBuf {
        self.global_storage_path().join(extension_id)
    }

    fn list_extension_ids(&self) -> Vec<String> {
        let root = self.global_storage_path();
        let Ok(entries) = fs::read_dir(&root) else {
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
}
