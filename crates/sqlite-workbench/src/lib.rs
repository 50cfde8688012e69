//! Data-access and editing core for a SQLite browser. The windowed shell
//! (grids, menus, dialogs) lives elsewhere and calls in through this crate;
//! nothing here renders UI or spawns threads. Operations are synchronous
//! and blocking; interactive callers run them off their event loop.

pub mod core;
pub mod decode;
pub mod error;
pub mod history;
pub mod session;

pub use crate::core::connection::DatabaseHandle;
pub use crate::core::query::{delete_row, insert_row, read_table, run_query, update_row, RowValues};
pub use crate::core::schema::{list_columns, list_keys, list_tables};
pub use crate::core::types::{ColumnMeta, KeyInfo, RowSet, ROWID_COLUMN};
pub use crate::decode::decode_escaped;
pub use crate::error::{AppError, AppResult};
pub use crate::history::{normalize_sql, HistoryStore};
pub use crate::session::{EditSession, EditableColumn};
