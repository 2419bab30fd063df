//! Positional read/write traits.

use crate::error::{StorageError, StorageResult};

/// Source of bytes addressed by absolute offset.
///
/// Every decoder in this crate takes an explicit offset instead of relying
/// on a shared cursor, so the same code runs against a live file or an
/// in-memory buffer.
pub trait ReadAt {
    /// Returns the total number of bytes in the source.
    fn size(&self) -> StorageResult<u64>;

    /// Reads up to `buf.len()` bytes at `offset`.
    ///
    /// Returns the number of bytes read, which is 0 at or past the end.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> StorageResult<usize>;

    /// Reads as many bytes as are available, up to `buf.len()`.
    fn fill_at(&self, buf: &mut [u8], offset: u64) -> StorageResult<usize> {
        let mut total_read = 0;
        while total_read < buf.len() {
            let n = self.read_at(&mut buf[total_read..], offset + total_read as u64)?;
            if n == 0 {
                break;
            }
            total_read += n;
        }
        Ok(total_read)
    }

    /// Reads exactly `buf.len()` bytes at `offset`.
    ///
    /// Returns `IncompleteRead` if the end is reached first.
    fn read_exact_at(&self, buf: &mut [u8], offset: u64) -> StorageResult<()> {
        let n = self.fill_at(buf, offset)?;
        if n < buf.len() {
            return Err(StorageError::short_read(offset, buf.len(), n));
        }
        Ok(())
    }

    /// Like [`read_exact_at`](Self::read_exact_at), but returns `Ok(false)`
    /// when `offset` is exactly at the end. Partial data is still an error.
    fn try_read_exact_at(&self, buf: &mut [u8], offset: u64) -> StorageResult<bool> {
        let n = self.fill_at(buf, offset)?;
        if n == 0 && !buf.is_empty() {
            return Ok(false);
        }
        if n < buf.len() {
            return Err(StorageError::short_read(offset, buf.len(), n));
        }
        Ok(true)
    }
}

/// Sink of bytes addressed by absolute offset.
pub trait WriteAt {
    /// Writes data at `offset`, returning the number of bytes accepted.
    fn write_at(&self, buf: &[u8], offset: u64) -> StorageResult<usize>;

    /// Writes all of `buf` at `offset`.
    ///
    /// Returns `IncompleteWrite` if the sink stops accepting bytes.
    fn write_all_at(&self, buf: &[u8], offset: u64) -> StorageResult<()> {
        let mut total_written = 0;
        while total_written < buf.len() {
            let n = self.write_at(&buf[total_written..], offset + total_written as u64)?;
            if n == 0 {
                return Err(StorageError::short_write(offset, buf.len(), total_written));
            }
            total_written += n;
        }
        Ok(())
    }
}

impl ReadAt for [u8] {
    fn size(&self) -> StorageResult<u64> {
        Ok(self.len() as u64)
    }

    fn read_at(&self, buf: &mut [u8], offset: u64) -> StorageResult<usize> {
        let Ok(start) = usize::try_from(offset) else {
            return Ok(0);
        };
        if start >= self.len() {
            return Ok(0);
        }
        let n = buf.len().min(self.len() - start);
        buf[..n].copy_from_slice(&self[start..start + n]);
        Ok(n)
    }
}

impl ReadAt for Vec<u8> {
    fn size(&self) -> StorageResult<u64> {
        self.as_slice().size()
    }

    fn read_at(&self, buf: &mut [u8], offset: u64) -> StorageResult<usize> {
        self.as_slice().read_at(buf, offset)
    }
}
