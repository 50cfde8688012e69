use serde::{Deserialize, Serialize};

/// One column of a table definition, as reported by `PRAGMA table_info`.
/// Only name/type/notnull/pk are retained; default values are dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub name: String,
    #[serde(default)]
    pub decl_type: String,
    #[serde(default)]
    pub not_null: bool,
    #[serde(default)]
    pub primary_key: bool,
}

/// An index on some table, flattened to `table.index` with its member
/// columns joined in index order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyInfo {
    /// `<table>.<index>`
    pub name: String,
    /// Comma-joined member column names, in index-column order.
    pub columns: String,
    pub unique: bool,
}

/// A tabular result. All values are carried as display text; `None` is NULL.
/// Full-table reads prepend a synthetic `__rowid` column holding the engine
/// row identity; free-form query results only carry it if the query selects
/// it explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// Column name of the synthetic row-identity column in full-table reads.
pub const ROWID_COLUMN: &str = "__rowid";

impl RowSet {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Row identity of row `row_ix`, if the result carries a `__rowid`
    /// column and the cell parses as an integer.
    pub fn rowid(&self, row_ix: usize) -> Option<i64> {
        let col = self.column_index(ROWID_COLUMN)?;
        let cell = self.rows.get(row_ix)?.get(col)?;
        cell.as_deref().and_then(|s| s.parse::<i64>().ok())
    }

    /// Cell text for `column` in row `row_ix`; `None` for NULL or when the
    /// column is not part of this result.
    pub fn value(&self, row_ix: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row_ix)?.get(col)?.as_deref()
    }
}
