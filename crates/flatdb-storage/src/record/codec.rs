//! Record encoding, decoding and tombstoning.
//!
//! ```text
//! +-------------+-------------+--------------------------------+
//! | marker (1B) | length (4B) | field TLVs, one per column     |
//! +-------------+-------------+--------------------------------+
//! ```
//!
//! `length` counts every field TLV in full, prefixes included, so the
//! record occupies `LEN_META + length` bytes.

use flatdb_common::{Value, LEN_META};
use tracing::debug;

use super::marker::RecordMarker;
use crate::codec::{encode_tlv, TlvHeader, TlvItem};
use crate::column::ColumnDefinition;
use crate::error::{StorageError, StorageResult};
use crate::file::{ReadAt, WriteAt};

/// A live record found by a scan, with its position in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedRecord {
    /// Offset of the record's marker byte.
    pub offset: u64,
    /// Declared length of the field bytes.
    pub length: u32,
    /// Field values in column order.
    pub values: Vec<Value>,
}

impl ScannedRecord {
    /// Total bytes the record occupies (marker, length and fields).
    #[inline]
    pub fn full_size(&self) -> u64 {
        LEN_META as u64 + u64::from(self.length)
    }

    /// Offset of the first byte after the record.
    #[inline]
    pub fn end(&self) -> u64 {
        self.offset + self.full_size()
    }
}

/// Serializes `values` (already in column order) as a record.
pub fn encode_record(marker: RecordMarker, values: &[Value]) -> StorageResult<Vec<u8>> {
    let length: usize = values.iter().map(Value::encoded_len).sum();
    let header = TlvHeader::new(marker.as_u8(), length)?;

    let mut buf = Vec::with_capacity(header.full_size());
    header.encode(&mut buf);
    for value in values {
        encode_tlv(value, &mut buf)?;
    }
    Ok(buf)
}

/// Decodes the next live record at or after `offset`, stopping at `end`.
///
/// Tombstones are skipped by their declared length. Returns `Ok(None)` when
/// `end` is reached at a record boundary, or when the source ends exactly at
/// a field boundary inside the final record.
pub fn decode_one<R: ReadAt + ?Sized>(
    src: &R,
    mut offset: u64,
    end: u64,
    columns: &[ColumnDefinition],
) -> StorageResult<Option<ScannedRecord>> {
    loop {
        if offset >= end {
            return Ok(None);
        }
        let Some(header) = TlvHeader::read_at(src, offset).map_err(|e| truncated(e, offset))?
        else {
            return Ok(None);
        };

        match RecordMarker::from_u8(header.tag) {
            Some(RecordMarker::Deleted) => {
                offset += header.full_size() as u64;
                if offset > end {
                    return Err(StorageError::corrupt(offset, "tombstone overruns its page"));
                }
            }
            Some(RecordMarker::Active) => {
                return decode_fields(src, offset, header.len, end, columns);
            }
            None => {
                return Err(StorageError::corrupt(
                    offset,
                    format!("expected record marker, found tag {}", header.tag),
                ));
            }
        }
    }
}

fn decode_fields<R: ReadAt + ?Sized>(
    src: &R,
    offset: u64,
    length: u32,
    end: u64,
    columns: &[ColumnDefinition],
) -> StorageResult<Option<ScannedRecord>> {
    let body_end = offset + LEN_META as u64 + u64::from(length);
    if body_end > end {
        return Err(StorageError::corrupt(offset, "record overruns its page"));
    }

    let mut values = Vec::with_capacity(columns.len());
    let mut pos = offset + LEN_META as u64;

    while pos < body_end {
        let Some(item) = TlvItem::read_at(src, pos).map_err(|e| truncated(e, pos))? else {
            debug!(offset, fields = values.len(), "source ends inside final record");
            return Ok(None);
        };
        pos += item.encoded_len() as u64;
        if pos > body_end {
            return Err(StorageError::corrupt(pos, "field overruns record length"));
        }

        let value = match columns.get(values.len()) {
            Some(column) => item.into_value_as(column.data_type)?,
            None => item.into_value()?,
        };
        values.push(value);
    }

    if values.len() != columns.len() {
        return Err(StorageError::MismatchingColumns {
            expected: columns.len(),
            actual: values.len(),
        });
    }

    Ok(Some(ScannedRecord {
        offset,
        length,
        values,
    }))
}

fn truncated(err: StorageError, offset: u64) -> StorageError {
    match err {
        StorageError::IncompleteRead {
            expected, actual, ..
        } => StorageError::corrupt(
            offset,
            format!("truncated item: expected {expected} bytes, got {actual}"),
        ),
        other => other,
    }
}

/// Turns the live record at `offset` into a tombstone.
///
/// Overwrites the marker and zero-fills the field bytes; the record keeps
/// its length, so the file does not change size. Returns the length.
pub fn tombstone<F: ReadAt + WriteAt + ?Sized>(file: &F, offset: u64) -> StorageResult<u32> {
    let header = TlvHeader::read_at(file, offset)?
        .ok_or_else(|| StorageError::short_read(offset, LEN_META, 0))?;
    if RecordMarker::from_u8(header.tag).is_none() {
        return Err(StorageError::corrupt(
            offset,
            format!("cannot tombstone tag {}", header.tag),
        ));
    }

    file.write_all_at(&[RecordMarker::Deleted.as_u8()], offset)?;
    let zeros = vec![0u8; header.len as usize];
    file.write_all_at(&zeros, offset + LEN_META as u64)?;
    Ok(header.len)
}
