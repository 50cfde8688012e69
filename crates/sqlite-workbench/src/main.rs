mod cli;
mod logging;

use std::path::Path;

use clap::Parser;
use sqlite_workbench::{
    core::limits, history, list_columns, list_keys, list_tables, read_table, run_query,
    AppError, AppResult, DatabaseHandle, HistoryStore,
};

use crate::cli::{Args, Command};

fn main() -> AppResult<()> {
    let args = Args::parse();
    logging::init(&args.log_level);
    run(args, Path::new("."))
}

fn run(args: Args, history_dir: &Path) -> AppResult<()> {
    if let Command::History = args.command {
        let history = HistoryStore::load(history_dir.join(history::SQL_HISTORY_FILE));
        for sql in history.entries() {
            println!("{sql}");
        }
        return Ok(());
    }

    let db = args
        .db
        .clone()
        .ok_or_else(|| AppError::InvalidRequest("--db is required".into()))?;
    let handle = DatabaseHandle::new(&db);

    match args.command {
        Command::Tables => print_json(&list_tables(&handle)?),
        Command::Columns { table } => print_json(&list_columns(&handle, &table)?),
        Command::Keys => print_json(&list_keys(&handle)?),
        Command::Read { table, limit } => {
            let limit = limits::effective_limit(limit, args.max_rows);
            print_json(&read_table(&handle, &table, Some(limit))?)
        }
        Command::Query { sql } => {
            let mut history = HistoryStore::load(history_dir.join(history::SQL_HISTORY_FILE));
            history.add_sql(&sql);
            print_json(&run_query(&handle, &sql)?)
        }
        Command::History => unreachable!(),
    }?;

    // Command succeeded against this file; move it to the front of the
    // recent-databases list.
    let mut paths = HistoryStore::load(history_dir.join(history::PATH_HISTORY_FILE));
    paths.add_path(&db.to_string_lossy());
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use tempfile::TempDir;

    fn args(db: Option<std::path::PathBuf>, command: Command) -> Args {
        Args {
            db,
            log_level: "info".into(),
            max_rows: 1000,
            command,
        }
    }

    fn make_db(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("cli.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("CREATE TABLE t (a TEXT);").unwrap();
        path
    }

    #[test]
    fn successful_command_records_db_path() {
        let dir = TempDir::new().unwrap();
        let db = make_db(&dir);
        run(args(Some(db.clone()), Command::Tables), dir.path()).unwrap();

        let paths = HistoryStore::load(dir.path().join(history::PATH_HISTORY_FILE));
        assert_eq!(paths.entries(), [db.to_string_lossy().to_string()]);
    }

    #[test]
    fn failed_command_records_nothing() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.db");
        assert!(run(args(Some(missing), Command::Tables), dir.path()).is_err());
        assert!(!dir.path().join(history::PATH_HISTORY_FILE).exists());
    }

    #[test]
    fn query_command_records_sql_history() {
        let dir = TempDir::new().unwrap();
        let db = make_db(&dir);
        let cmd = Command::Query {
            sql: "SELECT * FROM t".into(),
        };
        run(args(Some(db), cmd), dir.path()).unwrap();

        let history = HistoryStore::load(dir.path().join(history::SQL_HISTORY_FILE));
        assert_eq!(history.entries(), ["SELECT * FROM t"]);
    }

    #[test]
    fn missing_db_flag_is_invalid_request() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            run(args(None, Command::Tables), dir.path()),
            Err(AppError::InvalidRequest(_))
        ));
    }
}
