use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};

use crate::error::{AppError, AppResult};

/// A database file path, not a live connection. Every operation opens a
/// fresh connection scoped to that single call and drops it on exit, so two
/// in-flight operations against the same file are only as consistent as
/// SQLite's own concurrent-access guarantees. Callers serialize access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseHandle {
    path: PathBuf,
    busy_timeout_ms: u64,
}

impl DatabaseHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: 2_000,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a connection for one operation. No CREATE flag: a missing file
    /// is a connection error, not a new empty database. SQLite opens
    /// lazily, so a probe statement runs here to classify a file that
    /// exists but is not a database as a connection error too.
    pub fn open(&self) -> AppResult<Connection> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE;
        let conn =
            Connection::open_with_flags(&self.path, flags).map_err(|source| AppError::Connection {
                path: self.path.clone(),
                source,
            })?;
        let _ = conn.busy_timeout(std::time::Duration::from_millis(self.busy_timeout_ms));
        conn.query_row("PRAGMA schema_version", [], |_| Ok(()))
            .map_err(|source| AppError::Connection {
                path: self.path.clone(),
                source,
            })?;
        Ok(conn)
    }
}

/// Quote an identifier for literal interpolation into SQL text. Wrapping in
/// double quotes only; an identifier containing a double quote will break
/// query construction. Values are never interpolated, only bound.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{name}\"")
}

/// Table names must be non-empty; beyond that they are interpolated as-is
/// (see `quote_ident`).
pub(crate) fn check_table_name(table: &str) -> AppResult<()> {
    if table.trim().is_empty() {
        return Err(AppError::InvalidTable(table.to_string()));
    }
    Ok(())
}
