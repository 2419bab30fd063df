//! # flatdb-common
//!
//! Common types, errors, and utilities for FlatDB.
//!
//! This crate provides the foundations shared by the storage, WAL and table
//! crates:
//!
//! - **Types**: column [`DataType`]s and field [`Value`]s
//! - **Errors**: codec and configuration errors
//! - **Config**: database configuration and sync policy
//! - **Constants**: type tags and on-disk widths
//! - **Logging**: `tracing` subscriber setup
//!
//! ## Example
//!
//! ```rust
//! use flatdb_common::types::{DataType, Value};
//!
//! let v = Value::from(42i32);
//! assert_eq!(v.data_type(), Some(DataType::Int32));
//! assert_eq!(v.encoded_len(), 9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used items at the crate root
pub use config::{DatabaseConfig, SyncPolicy};
pub use constants::*;
pub use error::{CodecError, CodecResult, ConfigError, ConfigResult};
pub use types::{DataType, Value};
