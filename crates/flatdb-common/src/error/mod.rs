//! Error handling for FlatDB.
//!
//! Errors shared by every crate in the workspace. Storage, WAL and table
//! errors live in their own crates and wrap these with `#[from]`.

mod codec;
mod config;

pub use codec::{CodecError, CodecResult};
pub use config::{ConfigError, ConfigResult};
