//! Core types for the backup/restore system
//!
//! Defines backup identities, artifact categories, and the per-operation
//! report handed to presentation layers.

use crate::error::{Result, SlateError};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Snapshot-relative directory holding per-extension records
pub const EXTENSIONS_DIR: &str = "extensions";

/// Snapshot-relative directory holding platform store records
pub const PLATFORM_DIR: &str = "platform";

/// The unique name of one backup snapshot.
///
/// Derived from a local timestamp with second resolution, e.g.
/// `backup_20260807_143022`. Two identities allocated within the same
/// second collide; the snapshot engine refuses to overwrite existing
/// records, so a collision is loud rather than a silent merge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BackupId(String);

impl BackupId {
    /// Allocate a fresh identity from the current local time.
    #[must_use]
    pub fn now() -> Self {
        Self(chrono::Local::now().format("backup_%Y%m%d_%H%M%S").to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BackupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BackupId {
    type Err = SlateError;

    /// Parse an identity from user input or a directory name.
    ///
    /// Identities become path components under the backup root, so anything
    /// that could escape it is rejected.
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(SlateError::InvalidIdentity {
                identity: s.to_string(),
                reason: "empty".to_string(),
            });
        }
        if s.contains(std::path::MAIN_SEPARATOR)
            || s.contains('/')
            || s.contains("..")
            || s.contains('\0')
        {
            return Err(SlateError::InvalidIdentity {
                identity: s.to_string(),
                reason: "contains path separator or traversal".to_string(),
            });
        }
        Ok(Self(s.to_string()))
    }
}

/// The logical name distinguishing one artifact within a snapshot.
///
/// A category's relative path is the durable on-disk contract: any restore
/// implementation must be able to read snapshots produced by any backup
/// implementation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// The per-installation machine identifier file
    MachineId,
    /// The editor's global storage directory tree
    GlobalStorage,
    /// The key-value state database file
    StateDb,
    /// One extension's storage directory, keyed by `publisher.name`
    Extension(String),
    /// One platform-specific store file, keyed by its locator name
    Platform(String),
}

impl Category {
    /// Snapshot-relative path of this category's record.
    #[must_use]
    pub fn rel_path(&self) -> PathBuf {
        match self {
            Self::MachineId => PathBuf::from("machineId"),
            Self::GlobalStorage => PathBuf::from("globalStorage"),
            Self::StateDb => PathBuf::from("stateDb"),
            Self::Extension(id) => PathBuf::from(EXTENSIONS_DIR).join(id),
            Self::Platform(name) => PathBuf::from(PLATFORM_DIR).join(name),
        }
    }

    /// Whether this category's record is a directory tree (vs. a flat file).
    #[must_use]
    pub fn is_tree(&self) -> bool {
        matches!(self, Self::GlobalStorage | Self::Extension(_))
    }

    /// Parse a category from its display name, e.g. `machineId` or
    /// `extensions/publisher.name`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "machineId" => Some(Self::MachineId),
            "globalStorage" => Some(Self::GlobalStorage),
            "stateDb" => Some(Self::StateDb),
            _ => {
                if let Some(id) = name.strip_prefix("extensions/") {
                    (!id.is_empty() && !id.contains('/')).then(|| Self::Extension(id.to_string()))
                } else if let Some(n) = name.strip_prefix("platform/") {
                    (!n.is_empty() && !n.contains('/')).then(|| Self::Platform(n.to_string()))
                } else {
                    None
                }
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MachineId => write!(f, "machineId"),
            Self::GlobalStorage => write!(f, "globalStorage"),
            Self::StateDb => write!(f, "stateDb"),
            Self::Extension(id) => write!(f, "{EXTENSIONS_DIR}/{id}"),
            Self::Platform(name) => write!(f, "{PLATFORM_DIR}/{name}"),
        }
    }
}

/// Per-category result of one orchestrated operation.
///
/// `Skipped` covers the "nothing to do" cases the legacy contract folded
/// into its success boolean: absent sources, absent records, absent stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Skipped(String),
    Failed(String),
}

impl Outcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "ok"),
            Self::Skipped(reason) => write!(f, "skipped ({reason})"),
            Self::Failed(err) => write!(f, "failed ({err})"),
        }
    }
}

/// Aggregate result of one top-level operation.
///
/// Presentation layers render this without further interpretation: the
/// identity used (if any), per-category outcomes in processing order, and
/// success/attempted counts.
#[derive(Debug, Clone)]
pub struct OperationReport {
    identity: Option<BackupId>,
    outcomes: Vec<(Category, Outcome)>,
}

impl OperationReport {
    #[must_use]
    pub fn new(identity: Option<BackupId>) -> Self {
        Self {
            identity,
            outcomes: Vec::new(),
        }
    }

    pub fn push(&mut self, category: Category, outcome: Outcome) {
        self.outcomes.push((category, outcome));
    }

    #[must_use]
    pub fn identity(&self) -> Option<&BackupId> {
        self.identity.as_ref()
    }

    #[must_use]
    pub fn outcomes(&self) -> &[(Category, Outcome)] {
        &self.outcomes
    }

    /// Number of categories processed.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of categories that succeeded.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_success()).count()
    }

    /// Overall success: no category failed. Skipped categories do not count
    /// against the operation.
    #[must_use]
    pub fn overall_ok(&self) -> bool {
        !self.outcomes.iter().any(|(_, o)| o.is_failed())
    }
}
