//! Recency lists backing the "recent databases" and "recent SQL" menus.
//! Persisted as a pretty-printed JSON array of strings, most-recent-first.
//! Persistence is best-effort: a failed load starts empty, a failed save is
//! logged and dropped, neither ever reaches the caller.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

pub const PATH_HISTORY_FILE: &str = "history.json";
pub const SQL_HISTORY_FILE: &str = "sqlhistory.json";

/// Canonical form of a SQL string, used only for duplicate detection in the
/// history, never for execution: trimmed, trailing semicolons stripped,
/// whitespace runs collapsed to a single space, lowercased.
pub fn normalize_sql(sql: &str) -> String {
    let s = sql.trim().trim_end_matches(';');
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<String>,
}

impl HistoryStore {
    /// Load the history at `path`, or start empty if the file is missing or
    /// unreadable.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match read_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "starting with empty history");
                Vec::new()
            }
        };
        Self { path, entries }
    }

    /// Most-recent-first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Record an issued SQL statement. Deduplicated by normalized equality;
    /// the newest literal form wins and moves to the front.
    pub fn add_sql(&mut self, sql: &str) {
        if sql.trim().is_empty() {
            return;
        }
        let norm = normalize_sql(sql);
        self.entries.retain(|existing| normalize_sql(existing) != norm);
        self.entries.insert(0, sql.to_string());
        self.save();
    }

    /// Record an opened file path. Exact-match dedup, move-to-front.
    pub fn add_path(&mut self, path: &str) {
        if path.trim().is_empty() {
            return;
        }
        self.entries.retain(|existing| existing != path);
        self.entries.insert(0, path.to_string());
        self.save();
    }

    fn save(&self) {
        if let Err(e) = write_entries(&self.path, &self.entries) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to persist history");
        }
    }
}

fn read_entries(path: &Path) -> AppResult<Vec<String>> {
    let json =
        fs::read_to_string(path).map_err(|e| AppError::Persistence(e.to_string()))?;
    serde_json::from_str(&json).map_err(|e| AppError::Persistence(e.to_string()))
}

// Write-then-rename so a crash mid-write never truncates the existing file.
fn write_entries(path: &Path, entries: &[String]) -> AppResult<()> {
    let json = serde_json::to_string_pretty(entries)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|e| AppError::Persistence(e.to_string()))?;
    fs::rename(&tmp, path).map_err(|e| AppError::Persistence(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> HistoryStore {
        HistoryStore::load(dir.path().join(SQL_HISTORY_FILE))
    }

    #[test]
    fn normalize_collapses_and_lowercases() {
        assert_eq!(normalize_sql("SELECT * FROM t;\n  "), "select * from t");
        assert_eq!(normalize_sql("  select\t1 "), "select 1");
        assert_eq!(normalize_sql("select 1;;;"), "select 1");
    }

    #[test]
    fn normalize_is_idempotent() {
        for s in ["SELECT * FROM t;\n  ", "", "  A  b\tC ;", "x"] {
            let once = normalize_sql(s);
            assert_eq!(normalize_sql(&once), once);
        }
    }

    #[test]
    fn add_sql_dedups_by_normalized_form() {
        let dir = TempDir::new().unwrap();
        let mut h = store(&dir);
        h.add_sql("SELECT 1");
        h.add_sql("select 1;");
        assert_eq!(h.entries(), ["select 1;"]);
    }

    #[test]
    fn add_sql_moves_to_front() {
        let dir = TempDir::new().unwrap();
        let mut h = store(&dir);
        h.add_sql("select a");
        h.add_sql("select b");
        h.add_sql("SELECT A;");
        assert_eq!(h.entries(), ["SELECT A;", "select b"]);
    }

    #[test]
    fn add_sql_ignores_blank() {
        let dir = TempDir::new().unwrap();
        let mut h = store(&dir);
        h.add_sql("   ");
        assert!(h.entries().is_empty());
    }

    #[test]
    fn add_path_exact_match_move_to_front() {
        let dir = TempDir::new().unwrap();
        let mut h = HistoryStore::load(dir.path().join(PATH_HISTORY_FILE));
        h.add_path("/a.db");
        h.add_path("/b.db");
        h.add_path("/a.db");
        assert_eq!(h.entries(), ["/a.db", "/b.db"]);
        // paths are not normalized
        h.add_path("/A.DB");
        assert_eq!(h.entries(), ["/A.DB", "/a.db", "/b.db"]);
    }

    #[test]
    fn entries_survive_reload() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join(SQL_HISTORY_FILE);
        {
            let mut h = HistoryStore::load(&file);
            h.add_sql("select 1");
            h.add_sql("select 2");
        }
        let h = HistoryStore::load(&file);
        assert_eq!(h.entries(), ["select 2", "select 1"]);
        let raw = std::fs::read_to_string(&file).unwrap();
        // pretty-printed JSON array
        assert!(raw.starts_with("[\n"));
    }

    #[test]
    fn unreadable_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join(SQL_HISTORY_FILE);
        std::fs::write(&file, "not json").unwrap();
        let h = HistoryStore::load(&file);
        assert!(h.entries().is_empty());
    }
}
