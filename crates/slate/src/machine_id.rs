//! Machine identifier handling
//!
//! The editor stores a per-installation identifier in a flat file. Resets
//! replace it with a freshly generated token; restores bring back the
//! snapshotted one.

use crate::error::Result;
use crate::log::Logger;
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// Read the current machine identifier, trimmed. `None` when absent.
pub fn read(path: &Path, logger: &dyn Logger) -> Result<Option<String>> {
    if !path.is_file() {
        logger.warn(
            "machine id file not found",
            &[("path", path.display().to_string())],
        );
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(content.trim().to_string()))
}

/// Generate a fresh random machine identifier.
#[must_use]
pub fn generate() -> String {
    Uuid::new_v4().to_string()
}

/// Write a machine identifier, creating parent directories as needed.
pub fn write(path: &Path, id: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, id)?;
    Ok(())
}
