//! WAL entry format.
//!
//! ```text
//! +--------+-------------+---------------+---------------+------------------+----------------+
//! | 6 (1B) | length (4B) | id: TLV str   | op: TLV str   | table: TLV str   | record bytes   |
//! +--------+-------------+---------------+---------------+------------------+----------------+
//! ```
//!
//! `length` covers everything after the header.

use std::fmt;

use flatdb_common::{LEN_META, TAG_RECORD, TAG_WAL_ENTRY, WAL_ID_BYTES};
use flatdb_storage::codec::{encode_str_tlv, TlvHeader, TlvItem};
use flatdb_storage::ReadAt;
use rand::RngCore;

use crate::error::{WalError, WalResult};

/// Operation recorded by a WAL entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// A record insert; the payload is the record bytes.
    Insert,
}

impl Operation {
    /// Returns the string written to the log.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
        }
    }

    /// Parses an operation string from the log.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "insert" => Some(Self::Insert),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generates a fresh entry id: 16 random bytes as lowercase hex.
pub fn generate_id() -> String {
    let mut bytes = [0u8; WAL_ID_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// One entry of the append-only log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalEntry {
    /// Entry id.
    pub id: String,
    /// Operation string (`"insert"` for everything this crate writes).
    pub op: String,
    /// Table the entry belongs to.
    pub table: String,
    /// Serialized record bytes.
    pub payload: Vec<u8>,
}

impl WalEntry {
    /// Creates an entry with a fresh id.
    pub fn new(op: Operation, table: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            id: generate_id(),
            op: op.as_str().to_owned(),
            table: table.into(),
            payload: payload.into(),
        }
    }

    /// Returns the parsed operation, if known.
    pub fn operation(&self) -> Option<Operation> {
        Operation::parse(&self.op)
    }

    /// Serializes the entry.
    pub fn encode(&self) -> WalResult<Vec<u8>> {
        let mut body = Vec::with_capacity(
            3 * LEN_META + self.id.len() + self.op.len() + self.table.len() + self.payload.len(),
        );
        encode_str_tlv(&self.id, &mut body)?;
        encode_str_tlv(&self.op, &mut body)?;
        encode_str_tlv(&self.table, &mut body)?;
        body.extend_from_slice(&self.payload);

        let header = TlvHeader::new(TAG_WAL_ENTRY, body.len())?;
        let mut buf = Vec::with_capacity(header.full_size());
        header.encode(&mut buf);
        buf.extend_from_slice(&body);
        Ok(buf)
    }

    /// Decodes the entry at `offset`.
    ///
    /// Returns `Ok(None)` at the end of the log, otherwise the entry and its
    /// full on-disk size. An entry whose header or body runs past the end
    /// of `src` is `TruncatedEntry`; any other damage is `CorruptEntry`.
    pub fn read_at<R: ReadAt + ?Sized>(src: &R, offset: u64) -> WalResult<Option<(Self, usize)>> {
        let header = match TlvHeader::read_at(src, offset) {
            Ok(Some(header)) => header,
            Ok(None) => return Ok(None),
            Err(e) if e.is_incomplete() => return Err(WalError::TruncatedEntry { offset }),
            Err(e) => return Err(e.into()),
        };
        if header.tag != TAG_WAL_ENTRY {
            return Err(WalError::corrupt_entry(
                offset,
                format!("expected WAL entry tag, found {}", header.tag),
            ));
        }

        if offset + header.full_size() as u64 > src.size()? {
            return Err(WalError::TruncatedEntry { offset });
        }

        let mut body = vec![0u8; header.len as usize];
        src.read_exact_at(&mut body, offset + LEN_META as u64)
            .map_err(|e| {
                if e.is_incomplete() {
                    WalError::TruncatedEntry { offset }
                } else {
                    e.into()
                }
            })?;

        let entry = Self::decode_body(&body).map_err(|e| match e {
            WalError::Storage(inner) => WalError::corrupt_entry(offset, inner.to_string()),
            other => other,
        })?;
        Ok(Some((entry, header.full_size())))
    }

    fn decode_body(body: &[u8]) -> WalResult<Self> {
        let mut pos = 0u64;
        let mut next_string = || -> WalResult<String> {
            let item = TlvItem::read_required(body, pos)?;
            pos += item.encoded_len() as u64;
            Ok(item.into_string()?)
        };
        let id = next_string()?;
        let op = next_string()?;
        let table = next_string()?;
        let payload = body[pos as usize..].to_vec();

        Ok(Self {
            id,
            op,
            table,
            payload,
        })
    }

    /// Checks that the payload is exactly one active record.
    pub fn validate_record_payload(&self, offset: u64) -> WalResult<()> {
        let header = TlvHeader::read_at(self.payload.as_slice(), 0)
            .ok()
            .flatten()
            .ok_or_else(|| WalError::corrupt_entry(offset, "entry payload is not a record"))?;
        if header.tag != TAG_RECORD {
            return Err(WalError::corrupt_entry(
                offset,
                format!("entry payload has tag {}, expected a record", header.tag),
            ));
        }
        if header.full_size() != self.payload.len() {
            return Err(WalError::corrupt_entry(
                offset,
                format!(
                    "record declares {} bytes but payload holds {}",
                    header.full_size(),
                    self.payload.len()
                ),
            ));
        }
        Ok(())
    }
}
