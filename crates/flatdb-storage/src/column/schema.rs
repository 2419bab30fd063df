//! Schema header of a table file.

use flatdb_common::{TAG_COLUMN_DEFINITION, TAG_PAGE};

use super::definition::ColumnDefinition;
use crate::codec::TlvHeader;
use crate::error::{StorageError, StorageResult};
use crate::file::{ReadAt, WriteAt};

/// Column definitions read from the head of a table file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Columns in declaration order.
    pub columns: Vec<ColumnDefinition>,
    /// Offset of the first byte after the last definition block.
    pub payload_start: u64,
}

impl Schema {
    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

/// Serializes `columns` as consecutive definition blocks.
pub fn encode_schema(columns: &[ColumnDefinition]) -> StorageResult<Vec<u8>> {
    let mut buf = Vec::new();
    for column in columns {
        buf.extend_from_slice(&column.encode()?);
    }
    Ok(buf)
}

/// Writes the schema header at the start of `dst`.
///
/// Returns the payload start offset.
pub fn write_schema<W: WriteAt + ?Sized>(
    dst: &W,
    columns: &[ColumnDefinition],
) -> StorageResult<u64> {
    let buf = encode_schema(columns)?;
    dst.write_all_at(&buf, 0)?;
    Ok(buf.len() as u64)
}

/// Reads definition blocks from offset 0 until the first page or the end.
///
/// A block cut off by the end of the file is `CorruptRecord`.
pub fn read_schema<R: ReadAt + ?Sized>(src: &R) -> StorageResult<Schema> {
    let mut columns = Vec::new();
    let mut offset = 0u64;

    while let Some(header) = TlvHeader::read_at(src, offset).map_err(|e| truncated(e, offset))? {
        match header.tag {
            TAG_COLUMN_DEFINITION => {
                let (column, consumed) =
                    ColumnDefinition::decode_at(src, offset).map_err(|e| truncated(e, offset))?;
                columns.push(column);
                offset += consumed as u64;
            }
            TAG_PAGE => break,
            tag => {
                return Err(StorageError::corrupt(
                    offset,
                    format!("unexpected tag {tag} in schema header"),
                ))
            }
        }
    }

    Ok(Schema {
        columns,
        payload_start: offset,
    })
}

fn truncated(err: StorageError, offset: u64) -> StorageError {
    match err {
        StorageError::IncompleteRead { actual, .. } => StorageError::corrupt(
            offset,
            format!("truncated column definition ({actual} bytes)"),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::COLUMN_DEFINITION_SIZE;
    use flatdb_common::DataType;

    fn columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("id", DataType::Int32),
            ColumnDefinition::nullable("username", DataType::String),
            ColumnDefinition::new("active", DataType::Bool),
        ]
    }

    #[test]
    fn test_read_schema_without_pages() {
        let bytes = encode_schema(&columns()).unwrap();
        let schema = read_schema(&bytes).unwrap();
        assert_eq!(schema.columns, columns());
        assert_eq!(schema.payload_start, 3 * COLUMN_DEFINITION_SIZE as u64);
        assert_eq!(schema.column_names(), vec!["id", "username", "active"]);
    }

    #[test]
    fn test_read_schema_stops_at_page() {
        let mut bytes = encode_schema(&columns()).unwrap();
        let header_len = bytes.len() as u64;
        bytes.extend_from_slice(&[TAG_PAGE, 0, 0, 0, 0]);
        let schema = read_schema(&bytes).unwrap();
        assert_eq!(schema.columns.len(), 3);
        assert_eq!(schema.payload_start, header_len);
    }

    #[test]
    fn test_read_schema_rejects_garbage() {
        let mut bytes = encode_schema(&columns()).unwrap();
        bytes.extend_from_slice(&[42, 0, 0, 0, 0]);
        assert!(read_schema(&bytes).unwrap_err().is_corruption());
    }

    #[test]
    fn test_truncated_definition() {
        let bytes = encode_schema(&columns()).unwrap();

        // cut inside the last block's fields
        let err = read_schema(&bytes[..bytes.len() - 10]).unwrap_err();
        assert!(err.is_corruption());
        assert!(!err.is_incomplete());

        // cut inside the second block's header
        let cut = COLUMN_DEFINITION_SIZE + 3;
        assert!(read_schema(&bytes[..cut]).unwrap_err().is_corruption());
    }

    #[test]
    fn test_empty_source() {
        let schema = read_schema(&Vec::new()).unwrap();
        assert!(schema.columns.is_empty());
        assert_eq!(schema.payload_start, 0);
    }
}
