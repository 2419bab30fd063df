//! Last-commit pointer format.
//!
//! `[8][length:4][id: TLV string][len: TLV u32]`, rewritten in full on
//! every commit.

use flatdb_common::{LEN_INT32, LEN_META, TAG_WAL_LAST_COMMIT};
use flatdb_storage::codec::{encode_str_tlv, encode_u32_tlv, TlvHeader, TlvItem};

use crate::error::{WalError, WalResult};

/// The most recent WAL entry known to be reflected in the table file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastCommit {
    /// Id of the committed entry.
    pub id: String,
    /// Full on-disk size of the committed entry.
    pub len: u32,
}

impl LastCommit {
    /// Creates a pointer.
    pub fn new(id: impl Into<String>, len: u32) -> Self {
        Self { id: id.into(), len }
    }

    /// Serializes the pointer.
    pub fn encode(&self) -> WalResult<Vec<u8>> {
        let body_len = LEN_META + self.id.len() + LEN_META + LEN_INT32;
        let header = TlvHeader::new(TAG_WAL_LAST_COMMIT, body_len)?;

        let mut buf = Vec::with_capacity(header.full_size());
        header.encode(&mut buf);
        encode_str_tlv(&self.id, &mut buf)?;
        encode_u32_tlv(self.len, &mut buf);
        Ok(buf)
    }

    /// Decodes a pointer from the full contents of the last-commit file.
    pub fn decode(bytes: &[u8]) -> WalResult<Self> {
        let corrupt = |reason: String| WalError::corrupt_entry(0, reason);

        let header = TlvHeader::read_at(bytes, 0)
            .map_err(|e| corrupt(e.to_string()))?
            .ok_or_else(|| corrupt("empty last-commit item".to_string()))?;
        if header.tag != TAG_WAL_LAST_COMMIT {
            return Err(corrupt(format!(
                "expected last-commit tag, found {}",
                header.tag
            )));
        }
        if header.full_size() > bytes.len() {
            return Err(corrupt(format!(
                "last-commit item declares {} bytes but file holds {}",
                header.full_size(),
                bytes.len()
            )));
        }

        let mut pos = LEN_META as u64;
        let id_item = TlvItem::read_required(bytes, pos).map_err(|e| corrupt(e.to_string()))?;
        pos += id_item.encoded_len() as u64;
        let len_item = TlvItem::read_required(bytes, pos).map_err(|e| corrupt(e.to_string()))?;

        let id = id_item.into_string().map_err(|e| corrupt(e.to_string()))?;
        let len = len_item.into_u32().map_err(|e| corrupt(e.to_string()))?;
        Ok(Self { id, len })
    }
}
