//! Column definitions and the schema header.
//!
//! A table file starts with one definition block per column, in
//! declaration order. Column order is the field order of every record.

mod definition;
mod schema;

pub use definition::{ColumnDefinition, COLUMN_DEFINITION_BODY_LEN, COLUMN_DEFINITION_SIZE};
pub use schema::{encode_schema, read_schema, write_schema, Schema};
