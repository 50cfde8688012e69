use rusqlite::Connection;

use crate::core::connection::{check_table_name, quote_ident, DatabaseHandle};
use crate::core::types::{ColumnMeta, KeyInfo};
use crate::error::{AppError, AppResult};

/// All user table names, alphabetically, excluding the `sqlite_` internals.
pub fn list_tables(handle: &DatabaseHandle) -> AppResult<Vec<String>> {
    let conn = handle.open()?;
    tables_on(&conn)
}

fn tables_on(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let rows = stmt
        .query_map([], |r| r.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Column metadata in table-definition order, via `PRAGMA table_info`.
/// PRAGMAs return an empty set for unknown tables instead of failing, so an
/// empty result is turned into a query error here.
pub fn list_columns(handle: &DatabaseHandle, table: &str) -> AppResult<Vec<ColumnMeta>> {
    check_table_name(table)?;
    let conn = handle.open()?;
    let sql = format!("PRAGMA table_info({})", quote_ident(table));
    let mut stmt = conn.prepare(&sql)?;
    let cols = stmt
        .query_map([], |row| {
            let name: String = row.get("name")?;
            let decl_type: Option<String> = row.get("type")?;
            let not_null: i64 = row.get("notnull")?;
            let pk: i64 = row.get("pk")?;
            Ok(ColumnMeta {
                name,
                decl_type: decl_type.unwrap_or_default(),
                not_null: not_null == 1,
                primary_key: pk == 1,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    if cols.is_empty() {
        return Err(AppError::Query(format!("no such table: {table}")));
    }
    Ok(cols)
}

/// Every index of every table, in `list_tables` order then engine-reported
/// index order. Reading one index's member columns is best-effort: a failure
/// there skips that index rather than aborting the scan. Failures in the
/// table/index enumeration itself abort the whole call.
pub fn list_keys(handle: &DatabaseHandle) -> AppResult<Vec<KeyInfo>> {
    let conn = handle.open()?;
    let tables = tables_on(&conn)?;

    let mut result = Vec::new();
    for table in &tables {
        let sql = format!("PRAGMA index_list({})", quote_ident(table));
        let mut stmt = conn.prepare(&sql)?;
        let indexes = stmt
            .query_map([], |row| {
                // columns: seq, name, unique, origin, partial
                let name: Option<String> = row.get("name")?;
                // unique flag is best-effort; default to non-unique
                let unique = row.get::<_, i64>("unique").unwrap_or(0);
                Ok((name, unique == 1))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        for (name, unique) in indexes {
            let Some(index) = name.filter(|n| !n.is_empty()) else {
                continue;
            };
            match index_columns(&conn, &index) {
                Ok(cols) => result.push(KeyInfo {
                    name: format!("{table}.{index}"),
                    columns: cols.join(","),
                    unique,
                }),
                Err(e) => {
                    tracing::debug!(index = %index, error = %e, "skipping unreadable index");
                }
            }
        }
    }
    Ok(result)
}

fn index_columns(conn: &Connection, index: &str) -> AppResult<Vec<String>> {
    let sql = format!("PRAGMA index_info({})", quote_ident(index));
    let mut stmt = conn.prepare(&sql)?;
    // seqno, cid, name; name is NULL for rowid/expression members
    let cols = stmt
        .query_map([], |row| row.get::<_, Option<String>>("name"))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(cols.into_iter().flatten().collect())
}
