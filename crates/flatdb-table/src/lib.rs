//! # flatdb-table
//!
//! Tables for FlatDB: a schema header, pages of records and a write-ahead
//! log, exposed as insert/select/update/delete over name-keyed rows.
//!
//! ## Example
//!
//! ```rust,no_run
//! use flatdb_common::{DataType, DatabaseConfig, Value};
//! use flatdb_storage::ColumnDefinition;
//! use flatdb_table::{row, Predicate, Table};
//!
//! # fn main() -> flatdb_table::TableResult<()> {
//! let config = DatabaseConfig::with_data_dir("/tmp/db");
//! let mut table = Table::create(
//!     &config.data_dir,
//!     "users",
//!     vec![
//!         ColumnDefinition::new("id", DataType::Int32),
//!         ColumnDefinition::nullable("username", DataType::String),
//!     ],
//!     &config,
//! )?;
//!
//! table.insert(&row([("id", Value::Int32(1)), ("username", Value::string("bany"))]))?;
//! let rows = table.select(&Predicate::equals("username", "bany"))?;
//! assert_eq!(rows.len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod predicate;
pub mod table;

pub use error::{TableError, TableResult};
pub use predicate::{row, Predicate, Row};
pub use table::Table;
