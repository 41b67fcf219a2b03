use thiserror::Error;

use crate::column::ColumnType;

/// Errors raised by table construction and the reshape operators
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid column set: {0}")]
    InvalidColumnSet(String),

    #[error("type mismatch in {context}: expected {expected:?}, found {found:?}")]
    TypeMismatch {
        context: String,
        expected: ColumnType,
        found: ColumnType,
    },

    #[error("repeated values with same label are not allowed: key {key}, label {label:?}")]
    DuplicateLabel { key: String, label: String },

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("duplicate column name: {0}")]
    DuplicateColumnName(String),

    #[error("inconsistent row count: expected {expected}, found {found}")]
    InconsistentRowCount { expected: usize, found: usize },

    #[error("index out of bounds: index {index}, size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Config(err.to_string())
    }
}
