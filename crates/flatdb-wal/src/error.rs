//! WAL error types.
//!
//! This module defines all error types for the write-ahead log.

use std::io;

use flatdb_common::CodecError;
use flatdb_storage::StorageError;
use thiserror::Error;

/// Result type for WAL operations.
pub type WalResult<T> = Result<T, WalError>;

/// Errors that can occur during WAL operations.
#[derive(Debug, Error)]
pub enum WalError {
    /// I/O error during WAL operations.
    #[error("WAL I/O error: {source}")]
    Io {
        /// Underlying error.
        #[from]
        source: io::Error,
    },

    /// Error from the file or codec layer.
    #[error("WAL storage error: {0}")]
    Storage(StorageError),

    /// The log or last-commit file holds a malformed item.
    #[error("WAL entry corrupted at offset {offset}: {reason}")]
    CorruptEntry {
        /// Offset of the offending item.
        offset: u64,
        /// What was wrong.
        reason: String,
    },

    /// The last entry of the log runs past the end of the file, as left by
    /// a crash during an append.
    #[error("WAL entry at offset {offset} is cut off by the end of the log")]
    TruncatedEntry {
        /// Offset of the incomplete entry.
        offset: u64,
    },

    /// An entry after the last commit names an operation recovery cannot
    /// replay.
    #[error("unsupported WAL operation: {op}")]
    UnsupportedOperation {
        /// The operation string found in the log.
        op: String,
    },

    /// The OS accepted fewer bytes than a WAL write required.
    #[error("incomplete WAL write: expected {expected} bytes, wrote {actual}")]
    IncompleteWrite {
        /// Bytes to be written.
        expected: usize,
        /// Bytes accepted.
        actual: usize,
    },

    /// WAL configuration is invalid.
    #[error("WAL configuration error: {reason}")]
    ConfigError {
        /// What was wrong.
        reason: String,
    },
}

impl WalError {
    /// Creates a corrupt entry error.
    pub fn corrupt_entry(offset: u64, reason: impl Into<String>) -> Self {
        Self::CorruptEntry {
            offset,
            reason: reason.into(),
        }
    }

    /// Creates an unsupported operation error.
    pub fn unsupported_operation(op: impl Into<String>) -> Self {
        Self::UnsupportedOperation { op: op.into() }
    }

    /// Creates a config error.
    pub fn config_error(reason: impl Into<String>) -> Self {
        Self::ConfigError {
            reason: reason.into(),
        }
    }

    /// Returns true if this is a corruption error.
    pub fn is_corruption(&self) -> bool {
        match self {
            Self::CorruptEntry { .. } | Self::TruncatedEntry { .. } => true,
            Self::Storage(err) => err.is_corruption(),
            _ => false,
        }
    }
}

impl From<StorageError> for WalError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::IncompleteWrite {
                expected, actual, ..
            } => Self::IncompleteWrite { expected, actual },
            StorageError::Io { source } => Self::Io { source },
            other => Self::Storage(other),
        }
    }
}

impl From<CodecError> for WalError {
    fn from(err: CodecError) -> Self {
        Self::Storage(StorageError::Codec(err))
    }
}
