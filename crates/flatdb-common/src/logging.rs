//! Logging setup.
//!
//! Library code only emits `tracing` events; binaries and tests call
//! [`init_from`] (or [`init`]) to print them.

use tracing_subscriber::EnvFilter;

use crate::config::DatabaseConfig;

/// Installs the subscriber with the configuration's `log_filter`.
pub fn init_from(config: &DatabaseConfig) -> bool {
    init(&config.log_filter)
}

/// Installs a global `fmt` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` is used, falling
/// back to `info` if it does not parse. Returns false when a subscriber was
/// already installed, so it is safe to call from every test.
pub fn init(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .is_ok()
}
