use rusqlite::{
    types::{Value, ValueRef},
    Statement,
};

use crate::core::connection::{check_table_name, quote_ident, DatabaseHandle};
use crate::core::limits::DEFAULT_ROW_LIMIT;
use crate::core::types::{RowSet, ROWID_COLUMN};
use crate::error::AppResult;

/// An ordered column -> value mapping for a row mutation. Everything is
/// text: no type coercion is attempted, `None` binds NULL and the engine
/// applies its own affinity rules.
pub type RowValues = Vec<(String, Option<String>)>;

/// Full-table read with a synthetic `__rowid` column prepended, capped at
/// `limit` rows (default 1000). The cap keeps interactive grids responsive
/// and makes the result lossy for larger tables; callers must not use it
/// for aggregate reasoning.
pub fn read_table(handle: &DatabaseHandle, table: &str, limit: Option<usize>) -> AppResult<RowSet> {
    check_table_name(table)?;
    let conn = handle.open()?;
    let limit = limit.unwrap_or(DEFAULT_ROW_LIMIT);
    let sql = format!(
        "SELECT rowid AS {ROWID_COLUMN}, * FROM {} LIMIT {limit}",
        quote_ident(table)
    );
    let mut stmt = conn.prepare(&sql)?;
    collect_rows(&mut stmt)
}

/// Execute arbitrary SQL verbatim and return whatever it projects. No
/// sanitization and no confirmation layer; destructive statements run.
pub fn run_query(handle: &DatabaseHandle, sql: &str) -> AppResult<RowSet> {
    let conn = handle.open()?;
    let mut stmt = conn.prepare(sql)?;
    collect_rows(&mut stmt)
}

/// Update one row by engine row identity, binding every entry of `values`.
/// `rowid <= 0` is a deliberate no-op: there is no fallback primary-key
/// match when the identity is unknown.
pub fn update_row(
    handle: &DatabaseHandle,
    table: &str,
    rowid: i64,
    values: &RowValues,
) -> AppResult<()> {
    check_table_name(table)?;
    if rowid <= 0 || values.is_empty() {
        return Ok(());
    }
    let conn = handle.open()?;
    let sets = values
        .iter()
        .map(|(name, _)| format!("{} = ?", quote_ident(name)))
        .collect::<Vec<_>>()
        .join(",");
    let sql = format!("UPDATE {} SET {sets} WHERE rowid = ?", quote_ident(table));
    let mut params = bind_values(values);
    params.push(Value::Integer(rowid));
    conn.execute(&sql, rusqlite::params_from_iter(params))?;
    Ok(())
}

/// Delete one row by engine row identity. Any identity is sent; deleting a
/// nonexistent row affects zero rows and is not an error.
pub fn delete_row(handle: &DatabaseHandle, table: &str, rowid: i64) -> AppResult<()> {
    check_table_name(table)?;
    let conn = handle.open()?;
    let sql = format!("DELETE FROM {} WHERE rowid = ?", quote_ident(table));
    conn.execute(&sql, [rowid])?;
    Ok(())
}

/// Insert a row and return the identity the engine assigned to it (0 when
/// unavailable). The identity is read on the same connection right after
/// the insert, as a separate statement.
pub fn insert_row(handle: &DatabaseHandle, table: &str, values: &RowValues) -> AppResult<i64> {
    check_table_name(table)?;
    let conn = handle.open()?;
    let cols = values
        .iter()
        .map(|(name, _)| quote_ident(name))
        .collect::<Vec<_>>()
        .join(",");
    let binds = vec!["?"; values.len()].join(",");
    let sql = format!("INSERT INTO {} ({cols}) VALUES ({binds})", quote_ident(table));
    conn.execute(&sql, rusqlite::params_from_iter(bind_values(values)))?;
    Ok(conn.last_insert_rowid())
}

fn bind_values(values: &RowValues) -> Vec<Value> {
    values
        .iter()
        .map(|(_, v)| match v {
            Some(s) => Value::Text(s.clone()),
            None => Value::Null,
        })
        .collect()
}

fn collect_rows(stmt: &mut Statement<'_>) -> AppResult<RowSet> {
    let columns: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
    let width = columns.len();

    let mut rows = Vec::new();
    let mut r = stmt.query([])?;
    while let Some(row) = r.next()? {
        let mut cells = Vec::with_capacity(width);
        for i in 0..width {
            cells.push(cell_text(row.get_ref(i)?));
        }
        rows.push(cells);
    }
    Ok(RowSet { columns, rows })
}

// Display projection of a stored value. Blobs are rendered lossily; this
// layer is for browsing and editing text, not round-tripping binary data.
fn cell_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(x) => Some(x.to_string()),
        ValueRef::Real(x) => Some(x.to_string()),
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).to_string()),
        ValueRef::Blob(b) => Some(String::from_utf8_lossy(b).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use rusqlite::Connection;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, DatabaseHandle) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT, age INTEGER);
             INSERT INTO people (name, age) VALUES ('ada', 36), ('grace', 45);",
        )
        .unwrap();
        (dir, DatabaseHandle::new(path))
    }

    fn values(pairs: &[(&str, Option<&str>)]) -> RowValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(|s| s.to_string())))
            .collect()
    }

    #[test]
    fn read_table_prepends_rowid() {
        let (_dir, handle) = fixture();
        let rs = read_table(&handle, "people", None).unwrap();
        assert_eq!(rs.columns[0], ROWID_COLUMN);
        assert_eq!(rs.rows.len(), 2);
        assert_eq!(rs.rowid(0), Some(1));
        assert_eq!(rs.value(0, "name"), Some("ada"));
    }

    #[test]
    fn read_table_honors_limit() {
        let (_dir, handle) = fixture();
        let rs = read_table(&handle, "people", Some(1)).unwrap();
        assert_eq!(rs.rows.len(), 1);
    }

    #[test]
    fn run_query_has_no_synthetic_rowid() {
        let (_dir, handle) = fixture();
        let rs = run_query(&handle, "SELECT name FROM people ORDER BY name").unwrap();
        assert_eq!(rs.columns, vec!["name"]);
        assert_eq!(rs.rowid(0), None);
    }

    #[test]
    fn run_query_surfaces_engine_error() {
        let (_dir, handle) = fixture();
        assert!(matches!(
            run_query(&handle, "SELECT * FROM missing"),
            Err(AppError::Query(_))
        ));
    }

    #[test]
    fn insert_then_read_round_trips() {
        let (_dir, handle) = fixture();
        let id = insert_row(
            &handle,
            "people",
            &values(&[("name", Some("linus")), ("age", Some("54"))]),
        )
        .unwrap();
        assert!(id > 0);
        let rs = read_table(&handle, "people", None).unwrap();
        let ix = (0..rs.rows.len()).find(|&i| rs.rowid(i) == Some(id)).unwrap();
        assert_eq!(rs.value(ix, "name"), Some("linus"));
        assert_eq!(rs.value(ix, "age"), Some("54"));
    }

    #[test]
    fn update_targets_one_row() {
        let (_dir, handle) = fixture();
        update_row(&handle, "people", 1, &values(&[("name", Some("ada l."))])).unwrap();
        let rs = read_table(&handle, "people", None).unwrap();
        assert_eq!(rs.value(0, "name"), Some("ada l."));
        assert_eq!(rs.value(1, "name"), Some("grace"));
    }

    #[test]
    fn update_with_zero_rowid_is_noop() {
        let (_dir, handle) = fixture();
        update_row(&handle, "people", 0, &values(&[("name", Some("x"))])).unwrap();
        let rs = read_table(&handle, "people", None).unwrap();
        assert_eq!(rs.rows.len(), 2);
        assert_eq!(rs.value(0, "name"), Some("ada"));
        assert_eq!(rs.value(1, "name"), Some("grace"));
    }

    #[test]
    fn update_binds_null() {
        let (_dir, handle) = fixture();
        update_row(&handle, "people", 2, &values(&[("age", None)])).unwrap();
        let rs = read_table(&handle, "people", None).unwrap();
        assert_eq!(rs.value(1, "age"), None);
    }

    #[test]
    fn delete_unknown_rowid_leaves_table_unchanged() {
        let (_dir, handle) = fixture();
        delete_row(&handle, "people", 999).unwrap();
        let rs = read_table(&handle, "people", None).unwrap();
        assert_eq!(rs.rows.len(), 2);
    }

    #[test]
    fn delete_removes_row() {
        let (_dir, handle) = fixture();
        delete_row(&handle, "people", 1).unwrap();
        let rs = read_table(&handle, "people", None).unwrap();
        assert_eq!(rs.rows.len(), 1);
        assert_eq!(rs.value(0, "name"), Some("grace"));
    }
}
