//! Record format.
//!
//! A record is a marker, a length and one TLV field per column. Deleted
//! records keep their length with a zeroed payload so scans can step over
//! them without an index.

mod codec;
mod marker;

pub use codec::{decode_one, encode_record, tombstone, ScannedRecord};
pub use marker::RecordMarker;
