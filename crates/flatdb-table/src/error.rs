//! Table error types.

use std::path::PathBuf;

use flatdb_common::DataType;
use flatdb_storage::StorageError;
use flatdb_wal::WalError;
use thiserror::Error;

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Errors that can occur during table operations.
#[derive(Debug, Error)]
pub enum TableError {
    /// Error from the table file.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Error from the write-ahead log.
    #[error("WAL error: {0}")]
    Wal(#[from] WalError),

    /// A row, `where` or update key names a column the table lacks.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// An inserted row has no value for a declared column.
    #[error("column {0} is missing in the record")]
    MissingColumn(String),

    /// NULL given for a column that does not allow it.
    #[error("column {0} does not allow NULL")]
    NullNotAllowed(String),

    /// A value's type differs from its column's type.
    #[error("column {column} expects {expected}, got {found}")]
    TypeMismatch {
        /// Column name.
        column: String,
        /// Declared type.
        expected: DataType,
        /// Type of the given value.
        found: DataType,
    },

    /// The table name cannot be derived from the file path.
    #[error("invalid table filename: {}", path.display())]
    InvalidFilename {
        /// Offending path.
        path: PathBuf,
    },

    /// The column list cannot form a table.
    #[error("cannot create table: {0}")]
    CannotCreateTable(String),

    /// A table file already exists at the path.
    #[error("table already exists: {}", path.display())]
    TableExists {
        /// Existing table file.
        path: PathBuf,
    },
}

impl TableError {
    /// Creates a cannot-create-table error.
    pub fn cannot_create(reason: impl Into<String>) -> Self {
        Self::CannotCreateTable(reason.into())
    }

    /// Returns true if the error indicates damaged files.
    pub fn is_corruption(&self) -> bool {
        match self {
            Self::Storage(err) => err.is_corruption(),
            Self::Wal(err) => err.is_corruption(),
            _ => false,
        }
    }

    /// Returns true if the error was caused by the caller's input rather
    /// than the files.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::UnknownColumn(_)
                | Self::MissingColumn(_)
                | Self::NullNotAllowed(_)
                | Self::TypeMismatch { .. }
                | Self::CannotCreateTable(_)
        )
    }
}
