//! Storage error types.

use std::io;
use std::path::PathBuf;

use flatdb_common::CodecError;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by the table-file layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Standard I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying error.
        #[from]
        source: io::Error,
    },

    /// The file already exists (exclusive create).
    #[error("file already exists: {path}")]
    AlreadyExists {
        /// Path that was being created.
        path: PathBuf,
    },

    /// Fewer bytes were available than a read required.
    #[error("incomplete read at offset {offset}: expected {expected} bytes, got {actual}")]
    IncompleteRead {
        /// Position of the read.
        offset: u64,
        /// Bytes requested.
        expected: usize,
        /// Bytes obtained before end of file.
        actual: usize,
    },

    /// The OS accepted fewer bytes than a write required.
    #[error("incomplete write at offset {offset}: expected {expected} bytes, wrote {actual}")]
    IncompleteWrite {
        /// Position of the write.
        offset: u64,
        /// Bytes to be written.
        expected: usize,
        /// Bytes accepted.
        actual: usize,
    },

    /// Unexpected marker, tag, or malformed item.
    #[error("corrupt record at offset {offset}: {reason}")]
    CorruptRecord {
        /// Position of the offending item.
        offset: u64,
        /// What was wrong.
        reason: String,
    },

    /// A decoded record has a different number of fields than the schema.
    #[error("mismatching columns: expected {expected}, got {actual}")]
    MismatchingColumns {
        /// Schema column count.
        expected: usize,
        /// Fields found.
        actual: usize,
    },

    /// A column definition names an unknown data type.
    #[error("unsupported data type tag {tag} in column definition")]
    UnsupportedDataType {
        /// The offending tag.
        tag: u8,
    },

    /// A value could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

impl StorageError {
    /// Creates a corrupt record error.
    pub fn corrupt(offset: u64, reason: impl Into<String>) -> Self {
        Self::CorruptRecord {
            offset,
            reason: reason.into(),
        }
    }

    /// Creates an incomplete read error.
    pub fn short_read(offset: u64, expected: usize, actual: usize) -> Self {
        Self::IncompleteRead {
            offset,
            expected,
            actual,
        }
    }

    /// Creates an incomplete write error.
    pub fn short_write(offset: u64, expected: usize, actual: usize) -> Self {
        Self::IncompleteWrite {
            offset,
            expected,
            actual,
        }
    }

    /// Returns true if this error means the file contents are malformed.
    pub fn is_corruption(&self) -> bool {
        match self {
            Self::CorruptRecord { .. }
            | Self::MismatchingColumns { .. }
            | Self::UnsupportedDataType { .. } => true,
            Self::Codec(err) => err.is_corruption(),
            _ => false,
        }
    }

    /// Returns true if this is a short read or write.
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self,
            Self::IncompleteRead { .. } | Self::IncompleteWrite { .. }
        )
    }

    /// Converts from `std::io::Error` with path context.
    pub fn from_io_with_path(err: io::Error, path: impl Into<PathBuf>) -> Self {
        match err.kind() {
            io::ErrorKind::AlreadyExists => Self::AlreadyExists { path: path.into() },
            _ => Self::Io { source: err },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(StorageError::corrupt(10, "bad marker").is_corruption());
        assert!(StorageError::MismatchingColumns {
            expected: 2,
            actual: 1
        }
        .is_corruption());
        assert!(StorageError::short_write(0, 5, 3).is_incomplete());
        assert!(!StorageError::short_read(0, 5, 3).is_corruption());
    }

    #[test]
    fn test_from_io_with_path() {
        let err = io::Error::new(io::ErrorKind::AlreadyExists, "exists");
        let err = StorageError::from_io_with_path(err, "/tmp/t.bin");
        assert!(matches!(err, StorageError::AlreadyExists { .. }));

        let err = io::Error::new(io::ErrorKind::Other, "boom");
        let err = StorageError::from_io_with_path(err, "/tmp/t.bin");
        assert!(matches!(err, StorageError::Io { .. }));
    }

    #[test]
    fn test_display() {
        let err = StorageError::short_read(42, 5, 2);
        assert_eq!(
            err.to_string(),
            "incomplete read at offset 42: expected 5 bytes, got 2"
        );
    }
}
