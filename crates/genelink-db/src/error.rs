//! Database error types.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Error reading CSV file: {0}")]
    Csv(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input file '{}' not found", .0.display())]
    InputNotFound(PathBuf),

    #[error("Invalid HGNC ID: '{0}'")]
    InvalidHgncId(String),
}

impl From<csv::Error> for DbError {
    fn from(err: csv::Error) -> Self {
        DbError::Csv(err.to_string())
    }
}
