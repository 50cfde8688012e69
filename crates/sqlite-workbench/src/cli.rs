use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "sqlite-workbench")]
pub struct Args {
    /// Database file to operate on.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Logging level (stderr). Also supports RUST_LOG.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Maximum rows returned per read (unless a smaller limit is provided).
    #[arg(long, default_value_t = sqlite_workbench::core::limits::DEFAULT_ROW_LIMIT)]
    pub max_rows: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List table names.
    Tables,
    /// List column metadata for a table.
    Columns { table: String },
    /// List every index of every table.
    Keys,
    /// Read the first page of a table (with a synthetic __rowid column).
    Read {
        table: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Run arbitrary SQL and print the result. The statement is recorded in
    /// sqlhistory.json.
    Query { sql: String },
    /// Print the recorded SQL history, most recent first.
    History,
}
