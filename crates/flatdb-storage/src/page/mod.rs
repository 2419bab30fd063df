//! Page layout and allocation.
//!
//! After the schema header, a table file is a sequence of pages:
//!
//! ```text
//! +-----------+-------------------+---------------------------+
//! | 102 (1B)  | used_length (4B)  | records (used_length B)   |
//! +-----------+-------------------+---------------------------+
//! ```
//!
//! A page holds at most [`PAGE_CAPACITY`] payload bytes. Records never
//! straddle pages; a record larger than the capacity gets a page to itself.

mod allocator;
mod header;
mod scan;

pub use allocator::{PageAllocator, PageHandle};
pub use header::PageHeader;
pub use scan::{PageIter, RecordScan};

pub use flatdb_common::{PAGE_CAPACITY, PAGE_HEADER_SIZE};
