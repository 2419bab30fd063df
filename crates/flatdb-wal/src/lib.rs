//! # flatdb-wal
//!
//! Write-ahead log for FlatDB tables.
//!
//! Every insert is logged before it touches the table file and committed
//! after. On startup, entries logged after the last commit are handed back
//! for replay.
//!
//! ## Files
//!
//! ```text
//! {table}_wal.bin              [WalEntry]*       append-only
//! {table}_wal_last_commit.bin  LastCommit        overwritten on commit
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use flatdb_wal::{Operation, Wal, WalConfig};
//!
//! # fn main() -> flatdb_wal::WalResult<()> {
//! let wal = Wal::open(WalConfig::new("/tmp/db", "users"))?;
//! let record = [100u8, 9, 0, 0, 0, 5, 4, 0, 0, 0, 1, 0, 0, 0];
//! let entry = wal.append_log(Operation::Insert, "users", &record)?;
//! // ... write the record into the table file ...
//! wal.commit(&entry)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod record;
pub mod wal;

pub use config::WalConfig;
pub use error::{WalError, WalResult};
pub use record::{LastCommit, Operation, WalEntry};
pub use wal::{Entry, RestorableData, Wal};
