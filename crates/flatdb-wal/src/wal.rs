//! Main WAL manager.
//!
//! Each table has two WAL files: an append-only log of intended inserts,
//! and a single-slot last-commit file naming the newest entry already
//! copied into the table file. A mutation follows three steps:
//!
//! 1. [`Wal::append_log`] records the intent.
//! 2. The caller writes the record into the table file.
//! 3. [`Wal::commit`] moves the last-commit pointer to that entry.
//!
//! On open, [`Wal::get_restorable_data`] returns every record logged after
//! the last commit, so a crash between steps 1 and 3 loses nothing.

use flatdb_common::LEN_META;
use flatdb_storage::{ReadAt, StandardFile, WriteAt};
use tracing::{debug, info, warn};

use crate::config::WalConfig;
use crate::error::{WalError, WalResult};
use crate::record::{LastCommit, Operation, WalEntry};

/// Handle to an appended entry, passed back to [`Wal::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Entry id.
    pub id: String,
    /// Full on-disk size of the entry.
    pub len: u32,
}

impl From<&LastCommit> for Entry {
    fn from(commit: &LastCommit) -> Self {
        Self {
            id: commit.id.clone(),
            len: commit.len,
        }
    }
}

/// Records logged after the last commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestorableData {
    /// The newest entry in the log; commit it once `data` is replayed.
    pub last_entry: Entry,
    /// Concatenated record bytes to replay, in log order.
    pub data: Vec<u8>,
}

impl RestorableData {
    /// Returns true if there is nothing to replay.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Splits `data` into individual records (marker, length and fields).
    pub fn records(&self) -> WalResult<Vec<&[u8]>> {
        let mut records = Vec::new();
        let mut pos = 0usize;
        while pos < self.data.len() {
            let rest = &self.data[pos..];
            if rest.len() < LEN_META {
                return Err(WalError::corrupt_entry(pos as u64, "truncated restorable record"));
            }
            let len = u32::from_le_bytes([rest[1], rest[2], rest[3], rest[4]]) as usize;
            let size = LEN_META + len;
            if size > rest.len() {
                return Err(WalError::corrupt_entry(pos as u64, "truncated restorable record"));
            }
            records.push(&rest[..size]);
            pos += size;
        }
        Ok(records)
    }
}

/// The write-ahead log of one table.
#[derive(Debug)]
pub struct Wal {
    config: WalConfig,
    log: StandardFile,
    last_commit: StandardFile,
}

impl Wal {
    /// Opens the WAL files, creating them when absent.
    ///
    /// An entry left half-written at the end of the log by a crash during
    /// [`append_log`](Self::append_log) is cut off, so the next append starts
    /// on an entry boundary.
    pub fn open(config: WalConfig) -> WalResult<Self> {
        config.validate()?;
        let log = StandardFile::open_or_create(config.log_path())?;
        let last_commit = StandardFile::open_or_create(config.last_commit_path())?;
        debug!(table = %config.table, dir = %config.dir.display(), "opened WAL");
        let wal = Self {
            config,
            log,
            last_commit,
        };
        wal.trim_truncated_tail()?;
        Ok(wal)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &WalConfig {
        &self.config
    }

    /// Appends an entry to the end of the log.
    pub fn append_log(&self, op: Operation, table: &str, payload: &[u8]) -> WalResult<Entry> {
        let entry = WalEntry::new(op, table, payload);
        let bytes = entry.encode()?;
        let len = u32::try_from(bytes.len())
            .map_err(|_| WalError::corrupt_entry(0, "entry exceeds 4 GiB"))?;

        let offset = self.log.append(&bytes)?;
        if self.config.sync_policy.syncs() {
            self.log.sync()?;
        }

        debug!(id = %entry.id, %op, offset, len, "appended WAL entry");
        Ok(Entry { id: entry.id, len })
    }

    /// Overwrites the last-commit file with `entry`.
    pub fn commit(&self, entry: &Entry) -> WalResult<()> {
        let bytes = LastCommit::new(entry.id.clone(), entry.len).encode()?;
        self.last_commit.set_len(0)?;
        self.last_commit.write_all_at(&bytes, 0)?;
        if self.config.sync_policy.syncs() {
            self.last_commit.sync()?;
        }
        debug!(id = %entry.id, "committed WAL entry");
        Ok(())
    }

    /// Empties both WAL files.
    ///
    /// Used when a table file is created from scratch, so the new table
    /// never replays a log left behind by an earlier table of the same name.
    pub fn reset(&self) -> WalResult<()> {
        let stale = self.log.size()? + self.last_commit.size()?;
        if stale > 0 {
            warn!(table = %self.config.table, bytes = stale, "discarding stale WAL files");
        }
        self.log.set_len(0)?;
        self.last_commit.set_len(0)?;
        if self.config.sync_policy.syncs() {
            self.log.sync()?;
            self.last_commit.sync()?;
        }
        Ok(())
    }

    /// Reads the last-commit pointer. Returns `None` if nothing was ever
    /// committed.
    pub fn last_commit(&self) -> WalResult<Option<LastCommit>> {
        let size = self.last_commit.size()?;
        if size == 0 {
            return Ok(None);
        }
        let mut buf = vec![0u8; size as usize];
        self.last_commit.read_exact_at(&mut buf, 0)?;
        Ok(Some(LastCommit::decode(&buf)?))
    }

    /// Returns the records logged after the last commit.
    ///
    /// `None` means the log and the table file agree (or nothing was ever
    /// committed). Otherwise the caller replays `data` and then commits
    /// `last_entry`.
    pub fn get_restorable_data(&self) -> WalResult<Option<RestorableData>> {
        let Some(committed) = self.last_commit()? else {
            debug!(table = %self.config.table, "no committed WAL entry");
            return Ok(None);
        };

        let Some(last_entry) = self.read_last_entry(committed.len)? else {
            warn!(
                table = %self.config.table,
                id = %committed.id,
                "WAL log is empty but a commit is recorded"
            );
            return Ok(None);
        };

        if last_entry.id == committed.id {
            debug!(id = %committed.id, "WAL is in sync with the table");
            return Ok(None);
        }

        let data = self.collect_after(&committed.id)?;
        info!(
            table = %self.config.table,
            committed = %committed.id,
            last = %last_entry.id,
            bytes = data.len(),
            "found uncommitted WAL entries"
        );
        Ok(Some(RestorableData { last_entry, data }))
    }

    /// Locates the newest entry in the log.
    ///
    /// Tries the entry that starts `committed_len` bytes before the end; if
    /// that is not a whole entry ending exactly at the end (the newest entry
    /// has a different size), falls back to a forward scan.
    fn read_last_entry(&self, committed_len: u32) -> WalResult<Option<Entry>> {
        let size = self.log.size()?;
        if size == 0 {
            return Ok(None);
        }

        if let Some(offset) = size.checked_sub(u64::from(committed_len)) {
            if let Ok(Some((entry, len))) = WalEntry::read_at(&self.log, offset) {
                if offset + len as u64 == size {
                    return Ok(Some(Entry {
                        id: entry.id,
                        len: len as u32,
                    }));
                }
            }
        }

        debug!(committed_len, "scanning WAL forward for its last entry");
        let mut last = None;
        let mut offset = 0u64;
        while let Some((entry, len)) = self.next_entry(offset)? {
            offset += len as u64;
            last = Some(Entry {
                id: entry.id,
                len: len as u32,
            });
        }
        Ok(last)
    }

    /// Concatenates the record payloads of every entry after `committed_id`.
    ///
    /// If `committed_id` never appears, nothing is returned.
    fn collect_after(&self, committed_id: &str) -> WalResult<Vec<u8>> {
        let mut data = Vec::new();
        let mut found = false;
        let mut offset = 0u64;

        while let Some((entry, len)) = self.next_entry(offset)? {
            let entry_offset = offset;
            offset += len as u64;

            if !found {
                found = entry.id == committed_id;
                continue;
            }

            if entry.operation() != Some(Operation::Insert) {
                return Err(WalError::unsupported_operation(entry.op));
            }
            entry.validate_record_payload(entry_offset)?;
            data.extend_from_slice(&entry.payload);
        }

        if !found {
            warn!(id = %committed_id, "committed WAL entry not found in log");
        }
        Ok(data)
    }

    /// Reads the entry at `offset`, treating an entry cut off by the end of
    /// the log as the end of the log.
    fn next_entry(&self, offset: u64) -> WalResult<Option<(WalEntry, usize)>> {
        match WalEntry::read_at(&self.log, offset) {
            Err(WalError::TruncatedEntry { offset }) => {
                warn!(table = %self.config.table, offset, "ignoring incomplete entry at end of WAL");
                Ok(None)
            }
            other => other,
        }
    }

    /// Cuts the log back to the end of its last whole entry.
    ///
    /// Damage before the tail is left in place for
    /// [`get_restorable_data`](Self::get_restorable_data) to report.
    fn trim_truncated_tail(&self) -> WalResult<()> {
        let mut offset = 0u64;
        loop {
            match WalEntry::read_at(&self.log, offset) {
                Ok(Some((_, len))) => offset += len as u64,
                Ok(None) => return Ok(()),
                Err(WalError::TruncatedEntry { .. }) => break,
                Err(e) if e.is_corruption() => return Ok(()),
                Err(e) => return Err(e),
            }
        }

        let size = self.log.size()?;
        warn!(
            table = %self.config.table,
            offset,
            dropped = size - offset,
            "truncating incomplete entry at end of WAL"
        );
        self.log.set_len(offset)?;
        if self.config.sync_policy.syncs() {
            self.log.sync()?;
        }
        Ok(())
    }
}
