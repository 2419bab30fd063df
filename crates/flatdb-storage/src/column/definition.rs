//! Column definition block.
//!
//! ```text
//! +---------+-------------+------------------------+-------------------+--------------------+
//! | 99 (1B) | length (4B) | name: TLV string (64B) | type: TLV byte    | allow_null: TLV bool |
//! +---------+-------------+------------------------+-------------------+--------------------+
//! ```

use std::fmt;

use flatdb_common::{
    CodecError, DataType, Value, COLUMN_NAME_LEN, LEN_BYTE, LEN_META, TAG_COLUMN_DEFINITION,
    TAG_STRING,
};

use crate::codec::{encode_tlv, TlvHeader, TlvItem};
use crate::error::{StorageError, StorageResult};
use crate::file::ReadAt;

/// Body length of every column definition block.
pub const COLUMN_DEFINITION_BODY_LEN: usize =
    (LEN_META + COLUMN_NAME_LEN) + (LEN_META + LEN_BYTE) + (LEN_META + LEN_BYTE);

/// Full on-disk size of a column definition block.
pub const COLUMN_DEFINITION_SIZE: usize = LEN_META + COLUMN_DEFINITION_BODY_LEN;

/// A table column: name, scalar type and nullability.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnDefinition {
    /// Column name (at most 64 bytes of UTF-8).
    pub name: String,
    /// Scalar type of the column.
    pub data_type: DataType,
    /// Whether the column accepts NULL.
    pub nullable: bool,
}

impl ColumnDefinition {
    /// Creates a non-nullable column.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: false,
        }
    }

    /// Creates a nullable column.
    pub fn nullable(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
        }
    }

    /// Sets nullability.
    #[must_use]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Returns true if `value` may be stored in this column.
    pub fn accepts(&self, value: &Value) -> bool {
        if value.is_null() {
            return self.nullable;
        }
        value.fits(self.data_type)
    }

    /// Serializes the definition block.
    pub fn encode(&self) -> StorageResult<Vec<u8>> {
        let name = self.name.as_bytes();
        if name.len() > COLUMN_NAME_LEN {
            return Err(CodecError::TooLarge { len: name.len() }.into());
        }

        let mut buf = Vec::with_capacity(COLUMN_DEFINITION_SIZE);
        TlvHeader::new(TAG_COLUMN_DEFINITION, COLUMN_DEFINITION_BODY_LEN)?.encode(&mut buf);

        TlvHeader::new(TAG_STRING, COLUMN_NAME_LEN)?.encode(&mut buf);
        buf.extend_from_slice(name);
        buf.resize(buf.len() + COLUMN_NAME_LEN - name.len(), 0);

        encode_tlv(&Value::Byte(self.data_type.as_u8()), &mut buf)?;
        encode_tlv(&Value::Bool(self.nullable), &mut buf)?;
        Ok(buf)
    }

    /// Decodes a definition block starting at `offset`.
    ///
    /// Returns the definition and the number of bytes consumed.
    pub fn decode_at<R: ReadAt + ?Sized>(src: &R, offset: u64) -> StorageResult<(Self, usize)> {
        let header = TlvHeader::read_at(src, offset)?
            .ok_or_else(|| StorageError::short_read(offset, LEN_META, 0))?;
        if header.tag != TAG_COLUMN_DEFINITION {
            return Err(StorageError::corrupt(
                offset,
                format!("expected column definition, found tag {}", header.tag),
            ));
        }

        let mut pos = offset + LEN_META as u64;
        let name_item = TlvItem::read_required(src, pos)?;
        pos += name_item.encoded_len() as u64;
        let type_item = TlvItem::read_required(src, pos)?;
        pos += type_item.encoded_len() as u64;
        let null_item = TlvItem::read_required(src, pos)?;
        pos += null_item.encoded_len() as u64;

        let consumed = (pos - offset) as usize;
        if consumed != header.full_size() {
            return Err(StorageError::corrupt(
                offset,
                format!(
                    "column definition declares {} bytes but holds {}",
                    header.full_size(),
                    consumed
                ),
            ));
        }

        let name = name_item.into_string()?;
        let name = name.trim_end_matches('\0').to_owned();

        let tag = match type_item.into_value_as(DataType::Byte)? {
            Value::Byte(tag) => tag,
            _ => return Err(StorageError::corrupt(offset, "column type is NULL")),
        };
        let data_type = DataType::from_u8(tag).ok_or(StorageError::UnsupportedDataType { tag })?;

        let nullable = matches!(null_item.into_value_as(DataType::Bool)?, Value::Bool(true));

        Ok((
            Self {
                name,
                data_type,
                nullable,
            },
            consumed,
        ))
    }
}

impl fmt::Display for ColumnDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;
        if !self.nullable {
            f.write_str(" NOT NULL")?;
        }
        Ok(())
    }
}
