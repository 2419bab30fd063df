//! Database configuration structures.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Durability policy for table and WAL writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPolicy {
    /// `fsync` after every WAL append, WAL commit and page commit.
    #[default]
    EveryWrite,
    /// Never `fsync`; leave flushing to the operating system (tests only).
    Never,
}

impl SyncPolicy {
    /// Returns true if writes must be synced to disk before returning.
    #[inline]
    #[must_use]
    pub const fn syncs(self) -> bool {
        matches!(self, Self::EveryWrite)
    }
}

/// Top-level configuration for a FlatDB instance.
///
/// # Example
///
/// ```rust
/// use flatdb_common::config::{DatabaseConfig, SyncPolicy};
///
/// let config = DatabaseConfig::with_data_dir("/tmp/flatdb").with_sync_policy(SyncPolicy::Never);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Directory holding table files and their WAL files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Durability policy.
    #[serde(default)]
    pub sync_policy: SyncPolicy,

    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            sync_policy: SyncPolicy::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl DatabaseConfig {
    /// Creates a configuration with the specified data directory.
    #[must_use]
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Creates a configuration for tests: no fsync, debug logging.
    #[must_use]
    pub fn for_testing(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            sync_policy: SyncPolicy::Never,
            log_filter: "debug".to_string(),
        }
    }

    /// Sets the sync policy.
    #[must_use]
    pub fn with_sync_policy(mut self, policy: SyncPolicy) -> Self {
        self.sync_policy = policy;
        self
    }

    /// Sets the log filter.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid("data_dir must not be empty"));
        }

        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::invalid("log_filter must not be empty"));
        }

        Ok(())
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Saves configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }

        std::fs::write(path, content).map_err(|e| ConfigError::io(path, e))?;
        Ok(())
    }

    /// Converts configuration to a TOML string.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
