//! Scalar field values.
//!
//! A [`Value`] is the in-memory form of one record field. The set of
//! variants is closed: every column type has exactly one variant, plus
//! [`Value::Null`] for nullable columns.

use std::fmt;

use crate::constants::{LEN_META, TAG_NULL};
use crate::types::DataType;

/// A single field value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Explicit NULL.
    Null,
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),
    /// Single unsigned byte.
    Byte(u8),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    String(String),
}

impl Value {
    /// Creates a string value.
    pub fn string(v: impl Into<String>) -> Self {
        Value::String(v.into())
    }

    /// Returns true if this value is NULL.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the column type of this value, or `None` for NULL.
    #[must_use]
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Int32(_) => Some(DataType::Int32),
            Value::Int64(_) => Some(DataType::Int64),
            Value::Byte(_) => Some(DataType::Byte),
            Value::Bool(_) => Some(DataType::Bool),
            Value::String(_) => Some(DataType::String),
        }
    }

    /// Returns the tag this value is written with.
    #[must_use]
    pub fn tag(&self) -> u8 {
        self.data_type().map_or(TAG_NULL, DataType::as_u8)
    }

    /// Returns true if this value may be stored in a column of `data_type`.
    ///
    /// NULL matches every type; nullability is checked separately.
    #[must_use]
    pub fn fits(&self, data_type: DataType) -> bool {
        self.data_type().map_or(true, |ty| ty == data_type)
    }

    /// Number of bytes the raw value occupies, without any prefix.
    #[must_use]
    pub fn value_len(&self) -> usize {
        match self {
            Value::Null => 0,
            Value::String(s) => s.len(),
            other => other
                .data_type()
                .and_then(DataType::fixed_width)
                .unwrap_or_default(),
        }
    }

    /// Number of bytes the value occupies once wrapped as a TLV item.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        LEN_META + self.value_len()
    }

    /// Returns the string contents, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an i64 if it is any integer kind.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int32(v) => Some(i64::from(*v)),
            Value::Int64(v) => Some(*v),
            Value::Byte(v) => Some(i64::from(*v)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Byte(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::Byte(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type() {
        assert_eq!(Value::from(1i32).data_type(), Some(DataType::Int32));
        assert_eq!(Value::from(1i64).data_type(), Some(DataType::Int64));
        assert_eq!(Value::from("x").data_type(), Some(DataType::String));
        assert_eq!(Value::Null.data_type(), None);
        assert_eq!(Value::Null.tag(), 0);
    }

    #[test]
    fn test_fits() {
        assert!(Value::Int32(1).fits(DataType::Int32));
        assert!(!Value::Int32(1).fits(DataType::Int64));
        assert!(Value::Null.fits(DataType::String));
    }

    #[test]
    fn test_encoded_len() {
        assert_eq!(Value::Int32(7).encoded_len(), 9);
        assert_eq!(Value::Int64(7).encoded_len(), 13);
        assert_eq!(Value::Bool(true).encoded_len(), 6);
        assert_eq!(Value::string("bany").encoded_len(), 9);
        assert_eq!(Value::string("").encoded_len(), 5);
        assert_eq!(Value::Null.encoded_len(), 5);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::string("a"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::string("bany").to_string(), "bany");
    }
}
