//! Raw scalar encoding.
//!
//! Fixed-width numbers are written little-endian in their natural width.
//! Strings are written as their UTF-8 bytes with no terminator; the
//! surrounding TLV length bounds them.

use bytes::{Buf, BufMut};
use flatdb_common::{CodecError, CodecResult, DataType, Value, TAG_NULL};

/// Appends the raw bytes of `value` to `buf`.
///
/// NULL contributes no bytes.
pub fn encode_value<B: BufMut>(value: &Value, buf: &mut B) {
    match value {
        Value::Null => {}
        Value::Int32(v) => buf.put_i32_le(*v),
        Value::Int64(v) => buf.put_i64_le(*v),
        Value::Byte(v) => buf.put_u8(*v),
        Value::Bool(v) => buf.put_u8(u8::from(*v)),
        Value::String(v) => buf.put_slice(v.as_bytes()),
    }
}

/// Returns the raw bytes of `value`.
#[must_use]
pub fn marshal(value: &Value) -> Vec<u8> {
    let mut buf = Vec::with_capacity(value.value_len());
    encode_value(value, &mut buf);
    buf
}

/// Decodes raw bytes written under `tag`.
///
/// Tag 0 decodes to NULL and must carry no bytes. Booleans treat any
/// non-zero byte as `true`.
pub fn unmarshal(tag: u8, bytes: &[u8]) -> CodecResult<Value> {
    if tag == TAG_NULL {
        if !bytes.is_empty() {
            return Err(CodecError::NonEmptyNull { len: bytes.len() });
        }
        return Ok(Value::Null);
    }
    let data_type = DataType::from_u8(tag).ok_or(CodecError::UnsupportedDataType { tag })?;
    decode_value(data_type, bytes)
}

/// Decodes raw bytes of a known column type.
pub fn decode_value(data_type: DataType, mut bytes: &[u8]) -> CodecResult<Value> {
    if let Some(width) = data_type.fixed_width() {
        if bytes.len() != width {
            return Err(CodecError::InvalidLength {
                data_type,
                expected: width,
                actual: bytes.len(),
            });
        }
    }

    let value = match data_type {
        DataType::Int32 => Value::Int32(bytes.get_i32_le()),
        DataType::Int64 => Value::Int64(bytes.get_i64_le()),
        DataType::Byte => Value::Byte(bytes.get_u8()),
        DataType::Bool => Value::Bool(bytes.get_u8() != 0),
        DataType::String => Value::String(
            std::str::from_utf8(bytes)
                .map_err(|_| CodecError::InvalidUtf8)?
                .to_owned(),
        ),
    };
    Ok(value)
}
