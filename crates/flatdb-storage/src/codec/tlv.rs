//! Type-length-value framing.
//!
//! Every value is written as:
//!
//! ```text
//! +----------+-----------------+-------------------------+
//! | tag (1B) | length (4B, LE) | value bytes (length B)  |
//! +----------+-----------------+-------------------------+
//! ```
//!
//! The same `[tag][length]` prefix also fronts records, column definitions,
//! page headers and WAL items, so [`TlvHeader`] is shared by all of them.

use bytes::{Buf, BufMut};
use flatdb_common::{
    CodecError, CodecResult, DataType, Value, LEN_INT32, LEN_META, TAG_NULL, TAG_STRING,
    TAG_UINT32,
};

use super::value::{encode_value, unmarshal};
use crate::error::{StorageError, StorageResult};
use crate::file::ReadAt;

/// The `[tag][length]` prefix of a framed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlvHeader {
    /// Type tag or marker byte.
    pub tag: u8,
    /// Number of bytes following the header.
    pub len: u32,
}

impl TlvHeader {
    /// Encoded size of the header.
    pub const SIZE: usize = LEN_META;

    /// Creates a header, checking that `len` fits the 32-bit length field.
    pub fn new(tag: u8, len: usize) -> CodecResult<Self> {
        let len = u32::try_from(len).map_err(|_| CodecError::TooLarge { len })?;
        Ok(Self { tag, len })
    }

    /// Appends the header to `buf`.
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.tag);
        buf.put_u32_le(self.len);
    }

    /// Decodes a header from exactly [`Self::SIZE`] bytes.
    #[must_use]
    pub fn decode(bytes: &[u8; LEN_META]) -> Self {
        let mut bytes: &[u8] = &bytes[..];
        let tag = bytes.get_u8();
        let len = bytes.get_u32_le();
        Self { tag, len }
    }

    /// Reads a header at `offset`.
    ///
    /// Returns `Ok(None)` when `offset` is exactly at the end of `src`;
    /// a partial header is `IncompleteRead`.
    pub fn read_at<R: ReadAt + ?Sized>(src: &R, offset: u64) -> StorageResult<Option<Self>> {
        let mut buf = [0u8; LEN_META];
        if !src.try_read_exact_at(&mut buf, offset)? {
            return Ok(None);
        }
        Ok(Some(Self::decode(&buf)))
    }

    /// Total size of the item this header fronts.
    #[inline]
    #[must_use]
    pub fn full_size(&self) -> usize {
        LEN_META + self.len as usize
    }
}

/// A framed item read from a source, with its raw value bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvItem {
    /// Type tag.
    pub tag: u8,
    /// Raw value bytes.
    pub value: Vec<u8>,
}

impl TlvItem {
    /// Reads a whole item at `offset`.
    ///
    /// Returns `Ok(None)` when `offset` is exactly at the end of `src`.
    pub fn read_at<R: ReadAt + ?Sized>(src: &R, offset: u64) -> StorageResult<Option<Self>> {
        let Some(header) = TlvHeader::read_at(src, offset)? else {
            return Ok(None);
        };
        let start = offset + LEN_META as u64;
        let available = src.size()?.saturating_sub(start);
        if u64::from(header.len) > available {
            // never allocate more than the source holds
            return Err(StorageError::short_read(
                start,
                header.len as usize,
                available as usize,
            ));
        }
        let mut value = vec![0u8; header.len as usize];
        src.read_exact_at(&mut value, start)?;
        Ok(Some(Self {
            tag: header.tag,
            value,
        }))
    }

    /// Reads a whole item at `offset`, treating end of input as an error.
    pub fn read_required<R: ReadAt + ?Sized>(src: &R, offset: u64) -> StorageResult<Self> {
        Self::read_at(src, offset)?.ok_or_else(|| StorageError::short_read(offset, LEN_META, 0))
    }

    /// Number of bytes the item occupies, including its header.
    #[inline]
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        LEN_META + self.value.len()
    }

    /// Interprets the item as a value, trusting its tag.
    pub fn into_value(self) -> CodecResult<Value> {
        unmarshal(self.tag, &self.value)
    }

    /// Interprets the item as a value of `expected` type, or NULL.
    ///
    /// Any other tag is rejected rather than reinterpreted.
    pub fn into_value_as(self, expected: DataType) -> CodecResult<Value> {
        if self.tag != expected.as_u8() && self.tag != TAG_NULL {
            return Err(CodecError::type_mismatch(expected.as_u8(), self.tag));
        }
        self.into_value()
    }

    /// Interprets the item as a string.
    pub fn into_string(self) -> CodecResult<String> {
        match self.into_value_as(DataType::String)? {
            Value::String(s) => Ok(s),
            _ => Err(CodecError::type_mismatch(TAG_STRING, TAG_NULL)),
        }
    }

    /// Interprets the item as an internal unsigned 32-bit integer.
    pub fn into_u32(self) -> CodecResult<u32> {
        if self.tag != TAG_UINT32 {
            return Err(CodecError::type_mismatch(TAG_UINT32, self.tag));
        }
        let mut bytes = self.value.as_slice();
        if bytes.len() != LEN_INT32 {
            return Err(CodecError::InvalidLength {
                data_type: DataType::Int32,
                expected: LEN_INT32,
                actual: bytes.len(),
            });
        }
        Ok(bytes.get_u32_le())
    }
}

/// Appends `value` as a TLV item.
pub fn encode_tlv<B: BufMut>(value: &Value, buf: &mut B) -> CodecResult<()> {
    TlvHeader::new(value.tag(), value.value_len())?.encode(buf);
    encode_value(value, buf);
    Ok(())
}

/// Appends a string TLV item.
pub fn encode_str_tlv<B: BufMut>(value: &str, buf: &mut B) -> CodecResult<()> {
    TlvHeader::new(TAG_STRING, value.len())?.encode(buf);
    buf.put_slice(value.as_bytes());
    Ok(())
}

/// Appends an internal unsigned 32-bit TLV item.
pub fn encode_u32_tlv<B: BufMut>(value: u32, buf: &mut B) {
    TlvHeader {
        tag: TAG_UINT32,
        len: LEN_INT32 as u32,
    }
    .encode(buf);
    buf.put_u32_le(value);
}

/// Returns `value` as a standalone TLV item.
pub fn tlv_bytes(value: &Value) -> CodecResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(value.encoded_len());
    encode_tlv(value, &mut buf)?;
    Ok(buf)
}

/// Decodes one TLV value at `offset`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode_tlv<R: ReadAt + ?Sized>(src: &R, offset: u64) -> StorageResult<(Value, usize)> {
    let item = TlvItem::read_required(src, offset)?;
    let consumed = item.encoded_len();
    Ok((item.into_value()?, consumed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int32_layout() {
        let bytes = tlv_bytes(&Value::Int32(3)).unwrap();
        assert_eq!(bytes, vec![5, 4, 0, 0, 0, 3, 0, 0, 0]);
    }

    #[test]
    fn test_string_layout() {
        let bytes = tlv_bytes(&Value::string("bany")).unwrap();
        assert_eq!(bytes, vec![2, 4, 0, 0, 0, b'b', b'a', b'n', b'y']);
    }

    #[test]
    fn test_null_layout() {
        assert_eq!(tlv_bytes(&Value::Null).unwrap(), vec![0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_two_values_back_to_back() {
        let mut buf = Vec::new();
        encode_tlv(&Value::Int64(-7), &mut buf).unwrap();
        encode_tlv(&Value::string("hello"), &mut buf).unwrap();

        let (first, n1) = decode_tlv(&buf, 0).unwrap();
        let (second, n2) = decode_tlv(&buf, n1 as u64).unwrap();

        assert_eq!(first, Value::Int64(-7));
        assert_eq!(second, Value::string("hello"));
        assert_eq!(n1 + n2, buf.len());
    }

    #[test]
    fn test_tag_is_authoritative() {
        let buf = tlv_bytes(&Value::string("abcd")).unwrap();
        let item = TlvItem::read_at(&buf, 0).unwrap().unwrap();
        let err = item.into_value_as(DataType::Int32).unwrap_err();
        assert_eq!(err, CodecError::type_mismatch(5, 2));
    }

    #[test]
    fn test_null_accepted_for_any_type() {
        let buf = tlv_bytes(&Value::Null).unwrap();
        let item = TlvItem::read_at(&buf, 0).unwrap().unwrap();
        assert_eq!(item.into_value_as(DataType::Int64).unwrap(), Value::Null);
    }

    #[test]
    fn test_u32_item() {
        let mut buf = Vec::new();
        encode_u32_tlv(79, &mut buf);
        assert_eq!(buf, vec![7, 4, 0, 0, 0, 79, 0, 0, 0]);
        let item = TlvItem::read_at(&buf, 0).unwrap().unwrap();
        assert_eq!(item.into_u32().unwrap(), 79);
    }

    #[test]
    fn test_read_at_end_and_truncated() {
        let buf = tlv_bytes(&Value::string("hello")).unwrap();
        assert!(TlvItem::read_at(&buf, buf.len() as u64).unwrap().is_none());

        let truncated = &buf[..buf.len() - 1];
        let err = TlvItem::read_at(truncated, 0).unwrap_err();
        assert!(matches!(err, StorageError::IncompleteRead { .. }));

        let err = TlvHeader::read_at(&buf[..3], 0).unwrap_err();
        assert!(matches!(err, StorageError::IncompleteRead { .. }));
    }
}
