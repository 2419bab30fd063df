//! # flatdb-storage
//!
//! On-disk format of FlatDB table files.
//!
//! A table file is a schema header followed by fixed-capacity pages of
//! records:
//!
//! ```text
//! [ColumnDefinition]*  [Page [Record]*]*
//! ```
//!
//! This crate provides:
//! - **Codecs**: scalar values and their TLV framing
//! - **Columns**: column definitions and the schema header
//! - **Records**: record encoding, tombstones and the decode loop
//! - **Pages**: first-fit allocation and page-by-page scans
//! - **Files**: positional I/O over disk files and byte buffers

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod column;
pub mod error;
pub mod file;
pub mod page;
pub mod record;

pub use column::{ColumnDefinition, Schema};
pub use error::{StorageError, StorageResult};
pub use file::{ReadAt, StandardFile, WriteAt};
pub use page::{PageAllocator, PageHandle, PageHeader, RecordScan};
pub use record::{RecordMarker, ScannedRecord};
