//! WAL record types and serialization.
//!
//! Two item kinds are written: entries, appended to the log, and the
//! last-commit pointer, which overwrites its own file.

pub mod entry;
pub mod last_commit;

pub use entry::{generate_id, Operation, WalEntry};
pub use last_commit::LastCommit;
