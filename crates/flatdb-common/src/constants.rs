//! System-wide constants for FlatDB.
//!
//! This module defines the on-disk type tags and the fixed widths used by
//! every binary structure in a table file and its write-ahead log.

// =============================================================================
// Type Tags
// =============================================================================

/// Tag of an explicit NULL field (carries zero value bytes).
pub const TAG_NULL: u8 = 0;

/// Tag of a 64-bit signed integer.
pub const TAG_INT64: u8 = 1;

/// Tag of a UTF-8 string.
pub const TAG_STRING: u8 = 2;

/// Tag of a single unsigned byte.
pub const TAG_BYTE: u8 = 3;

/// Tag of a boolean.
pub const TAG_BOOL: u8 = 4;

/// Tag of a 32-bit signed integer.
pub const TAG_INT32: u8 = 5;

/// Tag of a WAL entry.
pub const TAG_WAL_ENTRY: u8 = 6;

/// Tag of a 32-bit unsigned integer.
///
/// Not a column type; only the last-commit pointer stores one.
pub const TAG_UINT32: u8 = 7;

/// Tag of the WAL last-commit item.
pub const TAG_WAL_LAST_COMMIT: u8 = 8;

/// Tag of a column definition block in the schema header.
pub const TAG_COLUMN_DEFINITION: u8 = 99;

/// Marker of a live record.
pub const TAG_RECORD: u8 = 100;

/// Marker of a deleted record (tombstone).
pub const TAG_DELETED_RECORD: u8 = 101;

/// Marker of a page header.
pub const TAG_PAGE: u8 = 102;

// =============================================================================
// Widths
// =============================================================================

/// Width of a type tag or marker byte.
pub const LEN_BYTE: usize = 1;

/// Width of a 32-bit integer.
pub const LEN_INT32: usize = 4;

/// Width of a 64-bit integer.
pub const LEN_INT64: usize = 8;

/// Width of the `[tag:1][length:4]` prefix shared by every TLV-style item.
pub const LEN_META: usize = LEN_BYTE + LEN_INT32;

// =============================================================================
// Table File Layout
// =============================================================================

/// Fixed width of a column name inside a column definition (null-padded).
pub const COLUMN_NAME_LEN: usize = 64;

/// Payload capacity of a page in bytes.
pub const PAGE_CAPACITY: usize = 128;

/// Size of a page header (`[Page marker][used_length]`).
pub const PAGE_HEADER_SIZE: usize = LEN_META;

/// File extension of table files.
pub const TABLE_FILE_EXTENSION: &str = "bin";

// =============================================================================
// WAL Constants
// =============================================================================

/// Suffix appended to the table name to form the WAL log filename.
pub const WAL_FILE_SUFFIX: &str = "_wal.bin";

/// Suffix appended to the table name to form the last-commit filename.
pub const WAL_LAST_COMMIT_FILE_SUFFIX: &str = "_wal_last_commit.bin";

/// Number of random bytes in a WAL entry id (rendered as hex).
pub const WAL_ID_BYTES: usize = 16;
