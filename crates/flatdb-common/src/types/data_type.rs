//! Column data types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    LEN_BYTE, LEN_INT32, LEN_INT64, TAG_BOOL, TAG_BYTE, TAG_INT32, TAG_INT64, TAG_STRING,
};

/// The scalar type of a table column.
///
/// The discriminant of each variant is the type tag written in front of
/// every encoded value of that type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64 = TAG_INT64,
    /// UTF-8 string of arbitrary length.
    String = TAG_STRING,
    /// Single unsigned byte.
    Byte = TAG_BYTE,
    /// Boolean.
    Bool = TAG_BOOL,
    /// 32-bit signed integer.
    Int32 = TAG_INT32,
}

impl DataType {
    /// All column types, in tag order.
    pub const ALL: [DataType; 5] = [
        DataType::Int64,
        DataType::String,
        DataType::Byte,
        DataType::Bool,
        DataType::Int32,
    ];

    /// Returns the type tag.
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a type tag into a column type.
    ///
    /// Returns `None` for tags that do not name a column type (NULL, WAL
    /// items, markers).
    #[must_use]
    pub const fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            TAG_INT64 => Some(Self::Int64),
            TAG_STRING => Some(Self::String),
            TAG_BYTE => Some(Self::Byte),
            TAG_BOOL => Some(Self::Bool),
            TAG_INT32 => Some(Self::Int32),
            _ => None,
        }
    }

    /// Returns the encoded width of values of this type, or `None` when the
    /// width varies (strings).
    #[must_use]
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            Self::Int64 => Some(LEN_INT64),
            Self::Int32 => Some(LEN_INT32),
            Self::Byte | Self::Bool => Some(LEN_BYTE),
            Self::String => None,
        }
    }

    /// Returns the lowercase name of this type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int64 => "int64",
            Self::String => "string",
            Self::Byte => "byte",
            Self::Bool => "bool",
            Self::Int32 => "int32",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_conversion() {
        for ty in DataType::ALL {
            assert_eq!(DataType::from_u8(ty.as_u8()), Some(ty));
        }
        assert_eq!(DataType::Int32.as_u8(), 5);
        assert_eq!(DataType::String.as_u8(), 2);
    }

    #[test]
    fn test_non_column_tags() {
        assert_eq!(DataType::from_u8(0), None);
        assert_eq!(DataType::from_u8(7), None);
        assert_eq!(DataType::from_u8(100), None);
    }

    #[test]
    fn test_fixed_width() {
        assert_eq!(DataType::Int64.fixed_width(), Some(8));
        assert_eq!(DataType::Bool.fixed_width(), Some(1));
        assert_eq!(DataType::String.fixed_width(), None);
    }
}
