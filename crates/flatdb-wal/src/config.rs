//! WAL configuration.

use std::path::{Path, PathBuf};

use flatdb_common::{SyncPolicy, WAL_FILE_SUFFIX, WAL_LAST_COMMIT_FILE_SUFFIX};

use crate::error::{WalError, WalResult};

/// Configuration for one table's write-ahead log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalConfig {
    /// Directory where the WAL files live (the table's directory).
    pub dir: PathBuf,

    /// Table name the file names are derived from.
    pub table: String,

    /// Sync policy for durability.
    pub sync_policy: SyncPolicy,
}

impl WalConfig {
    /// Creates a WAL configuration for `table` in `dir`.
    pub fn new(dir: impl Into<PathBuf>, table: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            table: table.into(),
            sync_policy: SyncPolicy::default(),
        }
    }

    /// Sets the sync policy.
    #[must_use]
    pub fn with_sync_policy(mut self, policy: SyncPolicy) -> Self {
        self.sync_policy = policy;
        self
    }

    /// Path of the append-only log: `{dir}/{table}_wal.bin`.
    pub fn log_path(&self) -> PathBuf {
        self.dir.join(format!("{}{}", self.table, WAL_FILE_SUFFIX))
    }

    /// Path of the last-commit file: `{dir}/{table}_wal_last_commit.bin`.
    pub fn last_commit_path(&self) -> PathBuf {
        self.dir
            .join(format!("{}{}", self.table, WAL_LAST_COMMIT_FILE_SUFFIX))
    }

    /// Returns the WAL directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Validates the configuration.
    pub fn validate(&self) -> WalResult<()> {
        if self.table.is_empty() {
            return Err(WalError::config_error("table name must not be empty"));
        }
        if self.table.contains(std::path::is_separator) {
            return Err(WalError::config_error(format!(
                "table name must not contain a path separator: {}",
                self.table
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let config = WalConfig::new("/data", "tb_user");
        assert_eq!(config.log_path(), PathBuf::from("/data/tb_user_wal.bin"));
        assert_eq!(
            config.last_commit_path(),
            PathBuf::from("/data/tb_user_wal_last_commit.bin")
        );
        assert_eq!(config.sync_policy, SyncPolicy::EveryWrite);
    }

    #[test]
    fn test_validate() {
        assert!(WalConfig::new("/data", "users").validate().is_ok());
        assert!(WalConfig::new("/data", "").validate().is_err());
        assert!(WalConfig::new("/data", "a/b").validate().is_err());
    }
}
