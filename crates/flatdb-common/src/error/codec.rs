//! Value codec errors.

use thiserror::Error;

use crate::types::DataType;

/// Errors raised while converting between [`Value`](crate::types::Value)s
/// and their byte form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A tag that names no supported column type.
    #[error("unsupported data type tag: {tag}")]
    UnsupportedDataType {
        /// The offending tag.
        tag: u8,
    },

    /// The tag read from the buffer differs from the expected one.
    #[error("type mismatch: expected tag {expected}, found {found}")]
    TypeMismatch {
        /// Expected tag.
        expected: u8,
        /// Tag actually present.
        found: u8,
    },

    /// A fixed-width value whose byte length is wrong.
    #[error("invalid length for {data_type}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Type being decoded.
        data_type: DataType,
        /// Width the type requires.
        expected: usize,
        /// Width found.
        actual: usize,
    },

    /// A NULL item that carries value bytes.
    #[error("NULL value carries {len} bytes")]
    NonEmptyNull {
        /// Number of bytes found.
        len: usize,
    },

    /// String bytes that are not valid UTF-8.
    #[error("string value is not valid UTF-8")]
    InvalidUtf8,

    /// A value too large for the 32-bit length prefix.
    #[error("value of {len} bytes exceeds the length prefix range")]
    TooLarge {
        /// Size of the value.
        len: usize,
    },
}

impl CodecError {
    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: u8, found: u8) -> Self {
        Self::TypeMismatch { expected, found }
    }

    /// Returns true if the error indicates malformed bytes rather than an
    /// unsupported request.
    #[must_use]
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::TypeMismatch { .. }
                | Self::InvalidLength { .. }
                | Self::NonEmptyNull { .. }
                | Self::InvalidUtf8
        )
    }
}

/// Result type alias for codec operations.
pub type CodecResult<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = CodecError::type_mismatch(5, 2);
        assert_eq!(err.to_string(), "type mismatch: expected tag 5, found 2");
        assert!(err.is_corruption());
        assert!(!CodecError::UnsupportedDataType { tag: 42 }.is_corruption());
    }
}
