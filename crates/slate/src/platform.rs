//! Platform cleaners
//!
//! OS-specific cleaning actions live behind [`PlatformCleaner`]: the core
//! only consumes the success/failure signal and folds it into the
//! aggregate outcome. [`CacheCleaner`] covers the one action every
//! platform shares: removing stray machine-id cache files the editor
//! scatters outside its installation directory.

use crate::error::Result;
use crate::log::Logger;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use walkdir::WalkDir;

/// One platform family's cleaning action.
pub trait PlatformCleaner: Send + Sync {
    fn name(&self) -> &str;

    /// Run the cleaning action. `Ok(false)` means it ran but could not
    /// finish everything.
    fn clean(&self) -> Result<bool>;
}

/// Cleaner that does nothing and always succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCleaner;

impl PlatformCleaner for NoopCleaner {
    fn name(&self) -> &str {
        "noop"
    }

    fn clean(&self) -> Result<bool> {
        Ok(true)
    }
}

/// Removes stray `machineid` cache files beneath a set of root directories.
///
/// Best-effort: individual removal failures are logged and flip the
/// aggregate signal to `false` without stopping the pass. Missing roots
/// are skipped.
pub struct CacheCleaner {
    roots: Vec<PathBuf>,
    logger: Arc<dyn Logger>,
}

impl CacheCleaner {
    #[must_use]
    pub fn new(roots: Vec<PathBuf>, logger: Arc<dyn Logger>) -> Self {
        Self { roots, logger }
    }
}

impl PlatformCleaner for CacheCleaner {
    fn name(&self) -> &str {
        "machineid-cache"
    }

    fn clean(&self) -> Result<bool> {
        let mut success = true;
        for root in &self.roots {
            if !root.is_dir() {
                continue;
            }
            for entry in WalkDir::new(root)
                .follow_links(false)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if !entry.file_type().is_file() {
                    continue;
                }
                let is_machine_id_cache = entry
                    .file_name()
                    .to_str()
                    .is_some_and(|n| n.eq_ignore_ascii_case("machineid"));
                if !is_machine_id_cache {
                    continue;
                }
                match fs::remove_file(entry.path()) {
                    Ok(()) => self.logger.info(
                        "removed machine id cache file",
                        &[("path", entry.path().display().to_string())],
                    ),
                    Err(e) => {
                        self.logger.error(
                            "failed to remove machine id cache file",
                            &[
                                ("path", entry.path().display().to_string()),
                                ("error", e.to_string()),
                            ],
                        );
                        success = false;
                    }
                }
            }
        }
        Ok(success)
    }
}

/// Directories worth sweeping for stray machine-id cache files on the
/// current platform. Missing directories are harmless.
#[must_use]
pub fn default_cache_roots() -> Vec<PathBuf> {
    if cfg!(target_os = "windows") {
        let Some(local) = std::env::var_os("LOCALAPPDATA").map(PathBuf::from) else {
            return Vec::new();
        };
        vec![local.join("Microsoft").join("VSCode"), local.join("VSCode")]
    } else {
        let Some(home) = dirs::home_dir() else {
            return Vec::new();
        };
        if cfg!(target_os = "macos") {
            vec![home.join("Library").join("Application Support").join("Code")]
        } else {
            vec![home.join(".config").join("Code"), home.join(".vscode")]
        }
    }
}
