//! Type definitions for FlatDB.
//!
//! This module contains the column types and field values shared by every
//! layer of the engine.

mod data_type;
mod value;

pub use data_type::DataType;
pub use value::Value;
