//! Page header.

use flatdb_common::{PAGE_CAPACITY, PAGE_HEADER_SIZE, TAG_PAGE};

use crate::codec::TlvHeader;
use crate::error::{StorageError, StorageResult};
use crate::file::{ReadAt, WriteAt};

/// Location and fill level of one page.
///
/// On disk a page header is `[102][used_length:u32]`, immediately followed
/// by `used_length` bytes of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageHeader {
    /// Offset of the header's marker byte.
    pub offset: u64,
    /// Payload bytes currently written after the header.
    pub used: u32,
}

impl PageHeader {
    /// Offset of the first payload byte.
    #[inline]
    pub fn payload_start(&self) -> u64 {
        self.offset + PAGE_HEADER_SIZE as u64
    }

    /// Offset one past the last payload byte; records are appended here.
    #[inline]
    pub fn payload_end(&self) -> u64 {
        self.payload_start() + u64::from(self.used)
    }

    /// Returns true if `required` more bytes fit within the page capacity.
    #[inline]
    pub fn fits(&self, required: usize) -> bool {
        self.used as usize + required <= PAGE_CAPACITY
    }

    /// Bytes left before the nominal capacity is reached.
    #[inline]
    pub fn free_space(&self) -> usize {
        PAGE_CAPACITY.saturating_sub(self.used as usize)
    }

    /// Reads the page header at `offset`.
    ///
    /// Returns `Ok(None)` at the end of the source. A truncated header or a
    /// marker other than `Page` is `CorruptRecord`.
    pub fn read_at<R: ReadAt + ?Sized>(src: &R, offset: u64) -> StorageResult<Option<Self>> {
        let header = match TlvHeader::read_at(src, offset) {
            Ok(Some(header)) => header,
            Ok(None) => return Ok(None),
            Err(StorageError::IncompleteRead { actual, .. }) => {
                return Err(StorageError::corrupt(
                    offset,
                    format!("truncated page header ({actual} bytes)"),
                ))
            }
            Err(e) => return Err(e),
        };
        if header.tag != TAG_PAGE {
            return Err(StorageError::corrupt(
                offset,
                format!("expected page marker, found tag {}", header.tag),
            ));
        }
        Ok(Some(Self {
            offset,
            used: header.len,
        }))
    }

    /// Writes the header to `dst`.
    pub fn write_to<W: WriteAt + ?Sized>(&self, dst: &W) -> StorageResult<()> {
        let mut buf = Vec::with_capacity(PAGE_HEADER_SIZE);
        TlvHeader {
            tag: TAG_PAGE,
            len: self.used,
        }
        .encode(&mut buf);
        dst.write_all_at(&buf, self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits() {
        let page = PageHeader {
            offset: 0,
            used: 100,
        };
        assert!(page.fits(28));
        assert!(!page.fits(29));
        assert_eq!(page.free_space(), 28);
        assert_eq!(page.payload_start(), 5);
        assert_eq!(page.payload_end(), 105);
    }

    #[test]
    fn test_read_at() {
        let buf = vec![102u8, 9, 0, 0, 0];
        let page = PageHeader::read_at(&buf, 0).unwrap().unwrap();
        assert_eq!(page, PageHeader { offset: 0, used: 9 });
        assert!(PageHeader::read_at(&buf, 5).unwrap().is_none());
    }

    #[test]
    fn test_bad_marker_and_truncation() {
        let buf = vec![100u8, 9, 0, 0, 0];
        assert!(PageHeader::read_at(&buf, 0).unwrap_err().is_corruption());
        assert!(PageHeader::read_at(&buf[..3], 0)
            .unwrap_err()
            .is_corruption());
    }
}
