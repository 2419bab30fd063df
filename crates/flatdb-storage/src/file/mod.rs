//! File I/O layer for FlatDB.
//!
//! All access is positional (pread/pwrite style): callers pass the offset
//! of every read and write explicitly.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │   ReadAt / WriteAt traits    │
//! └──────────────────────────────┘
//!        │               │
//!        ▼               ▼
//! ┌──────────────┐ ┌──────────────┐
//! │ StandardFile │ │ [u8], Vec<u8>│
//! │ (on disk)    │ │ (in memory)  │
//! └──────────────┘ └──────────────┘
//! ```

mod handle;
mod std_io;

pub use handle::{ReadAt, WriteAt};
pub use std_io::StandardFile;
