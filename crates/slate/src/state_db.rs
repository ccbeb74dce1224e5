//! State-store editor: targeted row deletion in the key-value database
//!
//! The editor's state database is a SQLite file with a single `ItemTable`
//! of key/value rows. Surgical resets delete rows whose key contains a
//! pattern, inside one transaction, without replacing the file. The file
//! is snapshotted as a single-file artifact before any mutation.

use crate::error::{Result, SlateError};
use crate::log::Logger;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::sync::Arc;

/// Result of a row deletion pass.
#[derive(Debug, Clone, Copy)]
pub struct RowDeletion {
    /// Number of rows removed.
    pub deleted: usize,
    /// Whether the store file existed. `false` means "nothing to do",
    /// not a failure.
    pub store_found: bool,
}

/// Opens the state database, deletes rows by key pattern, commits, closes.
///
/// No guard is taken against concurrent external writers; the design
/// assumes the host editor is not running during the operation. SQLite's
/// own file locking covers the transaction itself.
pub struct StateStoreEditor {
    logger: Arc<dyn Logger>,
}

impl StateStoreEditor {
    #[must_use]
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }

    /// Delete every row whose key contains `pattern` as a substring.
    ///
    /// The match runs against the indexed `key` column with `LIKE`; SQLite
    /// wildcard characters in `pattern` keep their meaning, as they did in
    /// every prior version of this tool.
    pub fn delete_rows_matching(&self, db_path: &Path, pattern: &str) -> Result<RowDeletion> {
        if !db_path.is_file() {
            self.logger.warn(
                "state store not found, nothing to do",
                &[("path", db_path.display().to_string())],
            );
            return Ok(RowDeletion {
                deleted: 0,
                store_found: false,
            });
        }

        // Read-write, never create: a missing file must stay missing.
        let mut conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_WRITE)
            .map_err(store_err)?;
        let tx = conn.transaction().map_err(store_err)?;
        let deleted = tx
            .execute(
                "DELETE FROM ItemTable WHERE key LIKE '%' || ?1 || '%'",
                [pattern],
            )
            .map_err(store_err)?;
        tx.commit().map_err(store_err)?;

        self.logger.info(
            "deleted matching state rows",
            &[
                ("pattern", pattern.to_string()),
                ("deleted", deleted.to_string()),
            ],
        );
        Ok(RowDeletion {
            deleted,
            store_found: true,
        })
    }
}

fn store_err(e: rusqlite::Error) -> SlateError {
    SlateError::StoreError(e.to_string())
}
