//! First-fit page allocation.
//!
//! Every allocation walks the page headers from the start of the payload
//! region. Nothing about pages is cached between calls.

use flatdb_common::{SyncPolicy, PAGE_CAPACITY};
use tracing::debug;

use super::header::PageHeader;
use crate::error::{StorageError, StorageResult};
use crate::file::{ReadAt, StandardFile, WriteAt};

/// Handle to a page chosen by [`PageAllocator::allocate_space`].
pub type PageHandle = PageHeader;

/// Packs records into fixed-capacity pages of a table file.
#[derive(Debug)]
pub struct PageAllocator<'a> {
    file: &'a StandardFile,
    payload_start: u64,
    sync_policy: SyncPolicy,
}

impl<'a> PageAllocator<'a> {
    /// Creates an allocator over the pages that start at `payload_start`.
    pub fn new(file: &'a StandardFile, payload_start: u64) -> Self {
        Self {
            file,
            payload_start,
            sync_policy: SyncPolicy::default(),
        }
    }

    /// Sets the sync policy applied by [`commit_space`](Self::commit_space).
    #[must_use]
    pub fn with_sync_policy(mut self, policy: SyncPolicy) -> Self {
        self.sync_policy = policy;
        self
    }

    /// Finds the first page with room for `required` bytes.
    ///
    /// If no page fits, a new empty page header is appended at the end of
    /// the file. A request larger than the capacity never fits an existing
    /// page, so it always gets a fresh page of its own.
    ///
    /// A page whose payload reaches past the end of the file is
    /// `CorruptRecord`; writing behind it would leave a gap of zeros.
    pub fn allocate_space(&self, required: usize) -> StorageResult<PageHandle> {
        let size = self.file.size()?;
        let mut offset = self.payload_start;

        while let Some(page) = PageHeader::read_at(self.file, offset)? {
            if page.payload_end() > size {
                return Err(StorageError::corrupt(
                    page.offset,
                    format!(
                        "page declares {} payload bytes but the file ends at {size}",
                        page.used
                    ),
                ));
            }
            if page.fits(required) {
                debug!(page = page.offset, used = page.used, required, "reusing page");
                return Ok(page);
            }
            offset = page.payload_end();
        }

        let page = PageHeader { offset, used: 0 };
        page.write_to(self.file)?;
        if required > PAGE_CAPACITY {
            debug!(page = offset, required, "appended oversize page");
        } else {
            debug!(page = offset, required, "appended page");
        }
        Ok(page)
    }

    /// Writes `bytes` at the end of the page's payload, then rewrites the
    /// page header with the new used length.
    ///
    /// Returns the updated handle. The header is only rewritten once the
    /// payload write has completed.
    pub fn commit_space(&self, handle: PageHandle, bytes: &[u8]) -> StorageResult<PageHandle> {
        let added = u32::try_from(bytes.len())
            .map_err(|_| StorageError::corrupt(handle.offset, "record too large for a page"))?;
        let used = handle
            .used
            .checked_add(added)
            .ok_or_else(|| StorageError::corrupt(handle.offset, "page length overflow"))?;

        self.file.write_all_at(bytes, handle.payload_end())?;
        if self.sync_policy.syncs() {
            self.file.sync()?;
        }

        let page = PageHeader {
            offset: handle.offset,
            used,
        };
        page.write_to(self.file)?;
        if self.sync_policy.syncs() {
            self.file.sync()?;
        }
        Ok(page)
    }

    /// Allocates space for `record` and writes it.
    ///
    /// Returns the offset the record was written at.
    pub fn write_record(&self, record: &[u8]) -> StorageResult<u64> {
        let handle = self.allocate_space(record.len())?;
        let offset = handle.payload_end();
        self.commit_space(handle, record)?;
        Ok(offset)
    }
}
