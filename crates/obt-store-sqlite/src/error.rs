//! Error type for `obt-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("table {0:?} not found")]
  MissingTable(String),

  #[error("column {column:?} not found in table {table:?}")]
  MissingColumn { table: String, column: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
