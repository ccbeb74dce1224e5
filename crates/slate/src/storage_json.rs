//! storage.json scrubbing
//!
//! The editor keeps a JSON settings file alongside the state database that
//! accumulates extension tracking entries. Scrubbing removes keys by prefix
//! and rewrites the file, leaving everything else untouched.

use crate::error::{Result, SlateError};
use crate::log::Logger;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Key prefixes holding extension tracking data.
pub const TRACKING_KEY_PREFIXES: &[&str] = &["extensionIdentifier", "extensionTracker"];

/// Remove every top-level key starting with one of `prefixes` from the
/// JSON object at `path` and rewrite the file.
///
/// Returns the number of keys removed, or `None` when there was nothing to
/// do: the file is absent, or its top level is not an object.
pub fn scrub_keys(path: &Path, prefixes: &[&str], logger: &dyn Logger) -> Result<Option<usize>> {
    if !path.is_file() {
        logger.warn(
            "storage file not found, nothing to scrub",
            &[("path", path.display().to_string())],
        );
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content).map_err(|e| SlateError::MalformedStore {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let Value::Object(map) = value else {
        logger.warn(
            "unexpected storage file shape, leaving untouched",
            &[("path", path.display().to_string())],
        );
        return Ok(None);
    };

    let before = map.len();
    let cleaned: serde_json::Map<String, Value> = map
        .into_iter()
        .filter(|(key, _)| !prefixes.iter().any(|p| key.starts_with(p)))
        .collect();
    let removed = before - cleaned.len();

    let rendered = serde_json::to_string_pretty(&Value::Object(cleaned)).map_err(|e| {
        SlateError::MalformedStore {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;
    fs::write(path, rendered)?;

    logger.info(
        "scrubbed storage file",
        &[
            ("path", path.display().to_string()),
            ("removed", removed.to_string()),
        ],
    );
    Ok(Some(removed))
}
