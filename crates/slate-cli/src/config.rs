//! User configuration loading
//!
//! Loads user-level configuration from `<config dir>/slate/config.toml`,
//! e.g. `~/.config/slate/config.toml` on Linux. Everything is optional;
//! a missing file simply means defaults.

use serde::Deserialize;
use slate::{Flavor, Result, SlateError};
use std::fs;
use std::path::PathBuf;

/// User configuration file name
const USER_CONFIG_FILE: &str = "config.toml";

/// Root structure for user config
#[derive(Debug, Default, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub backup: BackupConfig,
}

/// Which installation to operate on
#[derive(Debug, Default, Deserialize)]
pub struct EditorConfig {
    /// "standard" or "insiders"
    #[serde(default)]
    pub flavor: Option<String>,

    /// Explicit installation directory, overriding platform discovery
    #[serde(default)]
    pub install_root: Option<PathBuf>,
}

/// Where backups go
#[derive(Debug, Default, Deserialize)]
pub struct BackupConfig {
    /// Backup store root, overriding the default under the installation
    #[serde(default)]
    pub root: Option<PathBuf>,
}

impl EditorConfig {
    /// Resolve the configured flavor name, defaulting to Standard.
    pub fn resolved_flavor(&self) -> Result<Flavor> {
        match self.flavor.as_deref() {
            None | Some("standard") => Ok(Flavor::Standard),
            Some("insiders") => Ok(Flavor::Insiders),
            Some(other) => Err(SlateError::ConfigParse(format!(
                "unknown editor flavor '{other}' (expected 'standard' or 'insiders')"
            ))),
        }
    }
}

/// Load user configuration.
///
/// Returns None if the config file doesn't exist.
/// Returns Err if the file exists but is malformed.
pub fn load_user_config() -> Result<Option<UserConfig>> {
    let config_path = user_config_path()?;
    if !config_path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&config_path).map_err(|e| SlateError::ConfigRead {
        path: config_path.clone(),
        source: e,
    })?;
    let config = toml::from_str(&content).map_err(|e| {
        SlateError::ConfigParse(format!("{}: {e}", config_path.display()))
    })?;
    Ok(Some(config))
}

/// Path to the user configuration file.
pub fn user_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or(SlateError::HomeNotFound)?;
    Ok(config_dir.join("slate").join(USER_CONFIG_FILE))
}
