//! Error types for the slate library

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the slate library
#[derive(Error, Debug)]
pub enum SlateError {
    // Backup store errors
    #[error("Backup storage unavailable at {path}: {source}")]
    StorageUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Backup record already exists for {identity}/{category}")]
    RecordExists { identity: String, category: String },

    #[error("No backup found under identity: {0}")]
    UnknownIdentity(String),

    #[error("Invalid backup identity '{identity}': {reason}")]
    InvalidIdentity { identity: String, reason: String },

    // Copy errors
    #[error("Failed to copy {path}: {source}")]
    CopyFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    // State store errors
    #[error("State store error: {0}")]
    StoreError(String),

    #[error("Malformed storage file {path}: {reason}")]
    MalformedStore { path: PathBuf, reason: String },

    // Configuration errors (CLI-level but useful in library)
    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Home directory not found")]
    HomeNotFound,

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for slate operations
pub type Result<T> = std::result::Result<T, SlateError>;
