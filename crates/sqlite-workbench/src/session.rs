//! The stateful editing core behind a row-edit form: tracks the selected
//! row, mirrors its column values into an editable working set, detects
//! dirty state, and applies save/discard/insert/delete through the row
//! data-access layer.

use crate::core::connection::DatabaseHandle;
use crate::core::query::{self, RowValues};
use crate::core::schema;
use crate::core::types::{ColumnMeta, RowSet};
use crate::decode::decode_escaped;
use crate::error::AppResult;

/// Live, user-editable projection of one table column for the currently
/// selected row. All values are text; `None` is NULL.
#[derive(Debug, Clone)]
pub struct EditableColumn {
    pub meta: ColumnMeta,
    current: Option<String>,
    original: Option<String>,
}

impl EditableColumn {
    fn new(meta: ColumnMeta) -> Self {
        Self {
            meta,
            current: Some(String::new()),
            original: Some(String::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn original(&self) -> Option<&str> {
        self.original.as_deref()
    }

    fn differs(&self) -> bool {
        // NULL and empty text compare equal here, as in the edit form.
        self.current.as_deref().unwrap_or("") != self.original.as_deref().unwrap_or("")
    }
}

/// Edit session over one database. Reusable for the application lifetime;
/// closing the database returns it to the empty state.
///
/// Mutations (`save`/`insert`/`delete`) absorb failures: they log and leave
/// the in-memory edit state untouched. The `try_*` variants return the
/// error instead for callers that want to surface it.
#[derive(Debug, Default)]
pub struct EditSession {
    handle: Option<DatabaseHandle>,
    table: Option<String>,
    columns: Vec<EditableColumn>,
    rows: Option<RowSet>,
    selected_rowid: Option<i64>,
    dirty: bool,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_database(&mut self, handle: DatabaseHandle) {
        self.close_database();
        self.handle = Some(handle);
    }

    pub fn close_database(&mut self) {
        self.handle = None;
        self.table = None;
        self.columns.clear();
        self.rows = None;
        self.selected_rowid = None;
        self.dirty = false;
    }

    pub fn handle(&self) -> Option<&DatabaseHandle> {
        self.handle.as_ref()
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn columns(&self) -> &[EditableColumn] {
        &self.columns
    }

    /// Last-loaded page of the selected table. Fully replaced on every
    /// reload, never patched in place.
    pub fn rows(&self) -> Option<&RowSet> {
        self.rows.as_ref()
    }

    pub fn selected_rowid(&self) -> Option<i64> {
        self.selected_rowid
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Make `table` the active table: loads its column metadata and the
    /// first page of rows, clearing any prior selection and edits.
    pub fn select_table(&mut self, table: &str) -> AppResult<()> {
        let Some(handle) = self.handle.clone() else {
            return Ok(());
        };
        let metas = schema::list_columns(&handle, table)?;
        let rows = query::read_table(&handle, table, None)?;
        self.table = Some(table.to_string());
        self.columns = metas.into_iter().map(EditableColumn::new).collect();
        self.rows = Some(rows);
        self.selected_rowid = None;
        self.dirty = false;
        Ok(())
    }

    /// Select row `index` of the loaded page (or `None` to clear the
    /// selection). Column values are snapshotted through the escape decoder;
    /// originals track currents, so the session starts clean.
    pub fn select_row(&mut self, index: Option<usize>) {
        let Some(index) = index else {
            for col in &mut self.columns {
                col.current = Some(String::new());
                col.original = Some(String::new());
            }
            self.selected_rowid = None;
            self.dirty = false;
            return;
        };

        let rowid = self.rows.as_ref().and_then(|rs| rs.rowid(index));
        for col in &mut self.columns {
            let raw = self
                .rows
                .as_ref()
                .and_then(|rs| rs.value(index, &col.meta.name));
            col.current = Some(raw.map(decode_escaped).unwrap_or_default());
            col.original = col.current.clone();
        }
        self.selected_rowid = rowid;
        self.dirty = false;
    }

    /// Change one column's working value and recompute dirtiness across all
    /// columns. A full linear re-scan per edit; column counts are UI-scale.
    /// Returns the new dirty flag. Unknown column names are ignored.
    pub fn edit_column(&mut self, name: &str, value: Option<String>) -> bool {
        if let Some(col) = self.columns.iter_mut().find(|c| c.meta.name == name) {
            col.current = value;
            self.dirty = self.columns.iter().any(|c| c.differs());
        }
        self.dirty
    }

    /// Restore every column's working value from its snapshot.
    pub fn discard(&mut self) {
        for col in &mut self.columns {
            col.current = col.original.clone();
        }
        self.dirty = false;
    }

    /// Write all column values (changed or not) back to the selected row,
    /// then reload the table. Without a usable row identity the update layer
    /// no-ops; there is no primary-key fallback.
    pub fn try_save(&mut self) -> AppResult<()> {
        let (Some(handle), Some(table)) = (self.handle.clone(), self.table.clone()) else {
            return Ok(());
        };
        let rowid = self.selected_rowid.unwrap_or(0);
        let values = self.current_values();
        query::update_row(&handle, &table, rowid, &values)?;
        self.reload(&handle, &table)
    }

    pub fn save(&mut self) {
        if let Err(e) = self.try_save() {
            tracing::warn!(error = %e, "save failed; edits kept");
        }
    }

    /// Insert the current working values as a new row, then reload the
    /// table. Returns the identity the engine assigned.
    pub fn try_insert(&mut self) -> AppResult<i64> {
        let (Some(handle), Some(table)) = (self.handle.clone(), self.table.clone()) else {
            return Ok(0);
        };
        let values = self.current_values();
        let new_id = query::insert_row(&handle, &table, &values)?;
        self.reload(&handle, &table)?;
        Ok(new_id)
    }

    pub fn insert(&mut self) {
        if let Err(e) = self.try_insert() {
            tracing::warn!(error = %e, "insert failed; edits kept");
        }
    }

    /// Delete the selected row, then reload the table. With no selected row
    /// identity this is a no-op.
    pub fn try_delete(&mut self) -> AppResult<()> {
        let (Some(handle), Some(table)) = (self.handle.clone(), self.table.clone()) else {
            return Ok(());
        };
        let Some(rowid) = self.selected_rowid else {
            return Ok(());
        };
        query::delete_row(&handle, &table, rowid)?;
        self.reload(&handle, &table)
    }

    pub fn delete(&mut self) {
        if let Err(e) = self.try_delete() {
            tracing::warn!(error = %e, "delete failed; edits kept");
        }
    }

    fn current_values(&self) -> RowValues {
        self.columns
            .iter()
            .map(|c| (c.meta.name.clone(), c.current.clone()))
            .collect()
    }

    // Post-mutation refresh: new page of rows, blank working set, selection
    // context cleared.
    fn reload(&mut self, handle: &DatabaseHandle, table: &str) -> AppResult<()> {
        self.rows = Some(query::read_table(handle, table, None)?);
        self.select_row(None);
        Ok(())
    }
}
