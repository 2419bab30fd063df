//! Synchronous file implementation.

use std::fs::{File as StdFile, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::handle::{ReadAt, WriteAt};
use crate::error::{StorageError, StorageResult};

/// A file accessed by absolute offset.
///
/// Wraps a standard file in a mutex so that each positional operation
/// (seek then read/write) is atomic with respect to the handle.
#[derive(Debug)]
pub struct StandardFile {
    /// The underlying file.
    file: Mutex<StdFile>,
    /// The file path.
    path: PathBuf,
}

impl StandardFile {
    /// Creates a new file, failing with `AlreadyExists` if it is present.
    pub fn create_new(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| StorageError::from_io_with_path(e, path))?;
        Ok(Self::from_std(file, path))
    }

    /// Opens an existing file for reading and writing.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| StorageError::from_io_with_path(e, path))?;
        Ok(Self::from_std(file, path))
    }

    /// Opens a file for reading and writing, creating it when absent.
    pub fn open_or_create(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| StorageError::from_io_with_path(e, path))?;
        Ok(Self::from_std(file, path))
    }

    fn from_std(file: StdFile, path: &Path) -> Self {
        Self {
            file: Mutex::new(file),
            path: path.to_path_buf(),
        }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `buf` at the current end of the file.
    ///
    /// Returns the offset the data was written at.
    pub fn append(&self, buf: &[u8]) -> StorageResult<u64> {
        let offset = self.size()?;
        self.write_all_at(buf, offset)?;
        Ok(offset)
    }

    /// Syncs all data and metadata to disk.
    pub fn sync(&self) -> StorageResult<()> {
        self.file.lock().sync_all()?;
        Ok(())
    }

    /// Truncates or extends the file to the specified size.
    pub fn set_len(&self, size: u64) -> StorageResult<()> {
        self.file.lock().set_len(size)?;
        Ok(())
    }
}

impl ReadAt for StandardFile {
    fn size(&self) -> StorageResult<u64> {
        Ok(self.file.lock().metadata()?.len())
    }

    fn read_at(&self, buf: &mut [u8], offset: u64) -> StorageResult<usize> {
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(offset))?;
        Ok(file.read(buf)?)
    }
}

impl WriteAt for StandardFile {
    fn write_at(&self, buf: &[u8], offset: u64) -> StorageResult<usize> {
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(offset))?;
        Ok(file.write(buf)?)
    }
}
