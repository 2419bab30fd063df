//! Record markers.

use std::fmt;

use flatdb_common::{TAG_DELETED_RECORD, TAG_RECORD};

/// First byte of every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RecordMarker {
    /// A live record.
    Active = TAG_RECORD,
    /// A tombstone: same length as the record it replaced, payload zeroed.
    Deleted = TAG_DELETED_RECORD,
}

impl RecordMarker {
    /// Returns the marker byte.
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a byte into a marker.
    pub const fn from_u8(v: u8) -> Option<Self> {
        match v {
            TAG_RECORD => Some(Self::Active),
            TAG_DELETED_RECORD => Some(Self::Deleted),
            _ => None,
        }
    }
}

impl fmt::Display for RecordMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Deleted => write!(f, "DELETED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_roundtrip() {
        assert_eq!(RecordMarker::from_u8(100), Some(RecordMarker::Active));
        assert_eq!(RecordMarker::from_u8(101), Some(RecordMarker::Deleted));
        assert_eq!(RecordMarker::from_u8(102), None);
        assert_eq!(RecordMarker::Deleted.as_u8(), 101);
    }
}
