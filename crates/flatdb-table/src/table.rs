//! Table implementation.
//!
//! A table owns three files for its whole lifetime: the table file and the
//! two WAL files. Nothing is cached between calls; every operation walks
//! the pages from the end of the schema header.
//!
//! Inserts (including the re-inserts an update performs) go through the
//! WAL: append the intent, write the record into a page, then commit.
//! Tombstones are written in place without a WAL entry.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use flatdb_common::{DatabaseConfig, SyncPolicy, Value, COLUMN_NAME_LEN, TABLE_FILE_EXTENSION};
use flatdb_storage::column::{read_schema, write_schema};
use flatdb_storage::record::{encode_record, tombstone};
use flatdb_storage::{
    ColumnDefinition, PageAllocator, RecordMarker, RecordScan, ScannedRecord, Schema,
    StandardFile, StorageError,
};
use flatdb_wal::{Operation, Wal, WalConfig};
use tracing::{debug, info, warn};

use crate::error::{TableError, TableResult};
use crate::predicate::{Predicate, Row};

/// A table backed by a single file plus its WAL.
///
/// A table has one owner. Operations that write take `&mut self`, since
/// choosing a page and filling it are separate steps. Opening the same file
/// twice at once is not supported.
#[derive(Debug)]
pub struct Table {
    name: String,
    path: PathBuf,
    file: StandardFile,
    schema: Schema,
    wal: Wal,
    sync_policy: SyncPolicy,
}

impl Table {
    /// Creates `{dir}/{name}.bin` with the given columns.
    ///
    /// Fails with `TableExists` if the file is already there. If anything
    /// fails after the file was created, the file is removed again.
    pub fn create(
        dir: impl AsRef<Path>,
        name: &str,
        columns: Vec<ColumnDefinition>,
        config: &DatabaseConfig,
    ) -> TableResult<Self> {
        let dir = dir.as_ref();
        let path = dir.join(format!("{name}.{TABLE_FILE_EXTENSION}"));
        if name.is_empty() || name.contains(std::path::is_separator) {
            return Err(TableError::InvalidFilename { path });
        }
        validate_columns(&columns)?;

        let file = match StandardFile::create_new(&path) {
            Ok(file) => file,
            Err(StorageError::AlreadyExists { .. }) => {
                return Err(TableError::TableExists { path });
            }
            Err(e) => return Err(e.into()),
        };

        match Self::init(file, dir, name, columns, config.sync_policy) {
            Ok(table) => {
                info!(table = %table.name, path = %table.path.display(), "created table");
                Ok(table)
            }
            Err(e) => {
                if let Err(rm) = fs::remove_file(&path) {
                    warn!(path = %path.display(), error = %rm, "failed to remove partial table file");
                }
                Err(e)
            }
        }
    }

    fn init(
        file: StandardFile,
        dir: &Path,
        name: &str,
        columns: Vec<ColumnDefinition>,
        sync_policy: SyncPolicy,
    ) -> TableResult<Self> {
        let payload_start = write_schema(&file, &columns)?;
        if sync_policy.syncs() {
            file.sync()?;
        }

        let wal = Wal::open(WalConfig::new(dir, name).with_sync_policy(sync_policy))?;
        wal.reset()?;

        Ok(Self {
            name: name.to_string(),
            path: file.path().to_path_buf(),
            file,
            schema: Schema {
                columns,
                payload_start,
            },
            wal,
            sync_policy,
        })
    }

    /// Opens an existing table file and replays its WAL.
    ///
    /// The table name is the file stem; the WAL files are expected next to
    /// the table file.
    pub fn open(path: impl AsRef<Path>, config: &DatabaseConfig) -> TableResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| TableError::InvalidFilename {
                path: path.to_path_buf(),
            })?
            .to_string();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let file = StandardFile::open(path)?;
        let schema = read_schema(&file)?;
        if schema.columns.is_empty() {
            return Err(StorageError::corrupt(0, "table file has no column definitions").into());
        }

        let wal = Wal::open(WalConfig::new(dir, name.as_str()).with_sync_policy(config.sync_policy))?;
        let mut table = Self {
            name,
            path: path.to_path_buf(),
            file,
            schema,
            wal,
            sync_policy: config.sync_policy,
        };

        let replayed = table.recover()?;
        info!(
            table = %table.name,
            columns = table.schema.columns.len(),
            replayed,
            "opened table"
        );
        Ok(table)
    }

    /// Replays records the WAL holds beyond its last commit.
    ///
    /// Returns the number of records written. Running it again right after
    /// is a no-op.
    pub fn recover(&mut self) -> TableResult<usize> {
        let Some(restorable) = self.wal.get_restorable_data()? else {
            return Ok(0);
        };

        let records = restorable.records()?;
        if !records.is_empty() {
            warn!(
                table = %self.name,
                records = records.len(),
                "replaying uncommitted records from WAL"
            );
        }

        let allocator = self.allocator();
        for record in &records {
            allocator.write_record(record)?;
        }
        self.wal.commit(&restorable.last_entry)?;
        Ok(records.len())
    }

    /// Returns the table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the path of the table file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the columns in declaration order.
    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.schema.columns
    }

    /// Returns the column names in declaration order.
    pub fn column_names(&self) -> Vec<String> {
        self.schema.column_names()
    }

    /// Returns the table's WAL.
    pub fn wal(&self) -> &Wal {
        &self.wal
    }

    /// Inserts one row. Returns the number of rows written (always 1).
    pub fn insert(&mut self, row: &Row) -> TableResult<usize> {
        let values = self.validate_row(row)?;
        self.write_logged(&values)?;
        Ok(1)
    }

    /// Returns every row matching `predicate`, in file order.
    pub fn select(&self, predicate: &Predicate) -> TableResult<Vec<Row>> {
        predicate.validate(self.columns())?;
        let rows = self
            .scan(predicate)?
            .into_iter()
            .map(|record| self.to_row(record.values))
            .collect();
        Ok(rows)
    }

    /// Tombstones every row matching `predicate`. Returns how many.
    pub fn delete(&mut self, predicate: &Predicate) -> TableResult<usize> {
        predicate.validate(self.columns())?;
        let matched = self.scan(predicate)?;
        self.tombstone_all(&matched)?;
        debug!(table = %self.name, count = matched.len(), "deleted rows");
        Ok(matched.len())
    }

    /// Replaces every row matching `predicate` with a copy that has
    /// `values` merged over it. Returns how many rows were updated.
    ///
    /// The old records are tombstoned first, then the merged rows are
    /// inserted as new records.
    pub fn update(&mut self, predicate: &Predicate, values: &Row) -> TableResult<usize> {
        predicate.validate(self.columns())?;
        let mut changes = Vec::with_capacity(values.len());
        for (name, value) in values {
            let idx = self.column_index(name)?;
            validate_value(&self.schema.columns[idx], value)?;
            changes.push((idx, value));
        }

        let matched = self.scan(predicate)?;
        self.tombstone_all(&matched)?;

        for record in &matched {
            let mut merged = record.values.clone();
            for &(idx, value) in &changes {
                merged[idx] = value.clone();
            }
            self.write_logged(&merged)?;
        }

        debug!(table = %self.name, count = matched.len(), "updated rows");
        Ok(matched.len())
    }

    fn allocator(&self) -> PageAllocator<'_> {
        PageAllocator::new(&self.file, self.schema.payload_start).with_sync_policy(self.sync_policy)
    }

    fn scan(&self, predicate: &Predicate) -> TableResult<Vec<ScannedRecord>> {
        let mut matched = Vec::new();
        for record in RecordScan::new(&self.file, self.schema.payload_start, self.columns()) {
            let record = record?;
            if predicate.matches(self.columns(), &record.values) {
                matched.push(record);
            }
        }
        Ok(matched)
    }

    fn tombstone_all(&self, records: &[ScannedRecord]) -> TableResult<()> {
        for record in records {
            tombstone(&self.file, record.offset)?;
        }
        if !records.is_empty() && self.sync_policy.syncs() {
            self.file.sync()?;
        }
        Ok(())
    }

    /// WAL append, page write, WAL commit.
    ///
    /// The page is chosen before the append, so a damaged page chain fails
    /// the insert without leaving an entry for recovery to replay.
    fn write_logged(&self, values: &[Value]) -> TableResult<()> {
        let bytes = encode_record(RecordMarker::Active, values)?;
        let allocator = self.allocator();
        let handle = allocator.allocate_space(bytes.len())?;
        let entry = self.wal.append_log(Operation::Insert, &self.name, &bytes)?;
        let offset = handle.payload_end();
        allocator.commit_space(handle, &bytes)?;
        self.wal.commit(&entry)?;
        debug!(table = %self.name, offset, len = bytes.len(), "inserted record");
        Ok(())
    }

    fn column_index(&self, name: &str) -> TableResult<usize> {
        self.schema
            .columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
    }

    /// Orders a row by the schema, checking presence and types.
    fn validate_row(&self, row: &Row) -> TableResult<Vec<Value>> {
        if let Some(extra) = row.keys().find(|k| self.column_index(k).is_err()) {
            return Err(TableError::UnknownColumn(extra.clone()));
        }

        self.schema
            .columns
            .iter()
            .map(|column| -> TableResult<Value> {
                let value = row
                    .get(&column.name)
                    .ok_or_else(|| TableError::MissingColumn(column.name.clone()))?;
                validate_value(column, value)?;
                Ok(value.clone())
            })
            .collect()
    }

    fn to_row(&self, values: Vec<Value>) -> Row {
        self.schema
            .columns
            .iter()
            .map(|c| c.name.clone())
            .zip(values)
            .collect()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Table{{Name: {}, Columns: [{}]}}",
            self.name,
            self.column_names().join(" ")
        )
    }
}

fn validate_columns(columns: &[ColumnDefinition]) -> TableResult<()> {
    if columns.is_empty() {
        return Err(TableError::cannot_create("table must have at least one column"));
    }
    for (i, column) in columns.iter().enumerate() {
        if column.name.is_empty() {
            return Err(TableError::cannot_create("column name cannot be empty"));
        }
        if column.name.len() > COLUMN_NAME_LEN {
            return Err(TableError::cannot_create(format!(
                "column name {} exceeds {COLUMN_NAME_LEN} bytes",
                column.name
            )));
        }
        if columns[..i].iter().any(|c| c.name == column.name) {
            return Err(TableError::cannot_create(format!(
                "duplicate column name {}",
                column.name
            )));
        }
    }
    Ok(())
}

fn validate_value(column: &ColumnDefinition, value: &Value) -> TableResult<()> {
    match value.data_type() {
        None if !column.nullable => Err(TableError::NullNotAllowed(column.name.clone())),
        Some(found) if found != column.data_type => Err(TableError::TypeMismatch {
            column: column.name.clone(),
            expected: column.data_type,
            found,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::row;
    use flatdb_common::DataType;
    use tempfile::TempDir;

    fn columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("id", DataType::Int32),
            ColumnDefinition::nullable("username", DataType::String),
        ]
    }

    fn setup() -> (TempDir, Table) {
        let dir = TempDir::new().unwrap();
        let config = DatabaseConfig::for_testing(dir.path());
        let table = Table::create(dir.path(), "tb_user", columns(), &config).unwrap();
        (dir, table)
    }

    #[test]
    fn test_create_writes_schema() {
        let (dir, table) = setup();
        assert_eq!(table.name(), "tb_user");
        assert_eq!(table.path(), dir.path().join("tb_user.bin"));
        assert_eq!(table.column_names(), vec!["id", "username"]);
        // two 86-byte definition blocks
        assert_eq!(fs::metadata(table.path()).unwrap().len(), 172);
        assert!(dir.path().join("tb_user_wal.bin").exists());
        assert!(dir.path().join("tb_user_wal_last_commit.bin").exists());
    }

    #[test]
    fn test_display() {
        let (_dir, table) = setup();
        assert_eq!(table.to_string(), "Table{Name: tb_user, Columns: [id username]}");
    }

    #[test]
    fn test_create_rejects_bad_columns() {
        let dir = TempDir::new().unwrap();
        let config = DatabaseConfig::for_testing(dir.path());

        let err = Table::create(dir.path(), "t", vec![], &config).unwrap_err();
        assert!(matches!(err, TableError::CannotCreateTable(_)));

        let dup = vec![
            ColumnDefinition::new("id", DataType::Int32),
            ColumnDefinition::new("id", DataType::Int64),
        ];
        let err = Table::create(dir.path(), "t", dup, &config).unwrap_err();
        assert!(matches!(err, TableError::CannotCreateTable(_)));

        let long = vec![ColumnDefinition::new("x".repeat(65), DataType::Int32)];
        assert!(Table::create(dir.path(), "t", long, &config).is_err());

        let err = Table::create(dir.path(), "a/b", columns(), &config).unwrap_err();
        assert!(matches!(err, TableError::InvalidFilename { .. }));

        // nothing was left behind
        assert!(!dir.path().join("t.bin").exists());
    }

    #[test]
    fn test_create_twice() {
        let (dir, _table) = setup();
        let config = DatabaseConfig::for_testing(dir.path());
        let err = Table::create(dir.path(), "tb_user", columns(), &config).unwrap_err();
        assert!(matches!(err, TableError::TableExists { .. }));
    }

    #[test]
    fn test_insert_validation() {
        let (_dir, mut table) = setup();

        let err = table.insert(&row([("id", 1i32)])).unwrap_err();
        assert!(matches!(err, TableError::MissingColumn(ref c) if c == "username"));

        let err = table
            .insert(&row([("id", Value::Null), ("username", Value::string("x"))]))
            .unwrap_err();
        assert!(matches!(err, TableError::NullNotAllowed(ref c) if c == "id"));

        let err = table
            .insert(&row([("id", Value::Int64(1)), ("username", Value::string("x"))]))
            .unwrap_err();
        assert!(matches!(err, TableError::TypeMismatch { ref column, .. } if column == "id"));

        let err = table
            .insert(&row([
                ("id", Value::Int32(1)),
                ("username", Value::string("x")),
                ("email", Value::string("x@y")),
            ]))
            .unwrap_err();
        assert!(matches!(err, TableError::UnknownColumn(ref c) if c == "email"));

        assert!(table.select(&Predicate::all()).unwrap().is_empty());
    }

    #[test]
    fn test_insert_null() {
        let (_dir, mut table) = setup();
        table
            .insert(&row([("id", Value::Int32(1)), ("username", Value::Null)]))
            .unwrap();

        let rows = table.select(&Predicate::all()).unwrap();
        assert_eq!(rows, vec![row([("id", Value::Int32(1)), ("username", Value::Null)])]);
    }

    #[test]
    fn test_update_rejects_unknown_and_mistyped() {
        let (_dir, mut table) = setup();
        table
            .insert(&row([("id", Value::Int32(1)), ("username", Value::string("a"))]))
            .unwrap();

        let err = table
            .update(&Predicate::all(), &row([("email", "x")]))
            .unwrap_err();
        assert!(matches!(err, TableError::UnknownColumn(_)));

        let err = table
            .update(&Predicate::all(), &row([("username", 5i32)]))
            .unwrap_err();
        assert!(matches!(err, TableError::TypeMismatch { .. }));

        // the failed updates did not touch the row
        assert_eq!(table.select(&Predicate::equals("username", "a")).unwrap().len(), 1);
    }

    #[test]
    fn test_recover_is_idempotent() {
        let (_dir, mut table) = setup();
        table
            .insert(&row([("id", Value::Int32(1)), ("username", Value::string("a"))]))
            .unwrap();
        assert_eq!(table.recover().unwrap(), 0);
        assert_eq!(table.recover().unwrap(), 0);
        assert_eq!(table.select(&Predicate::all()).unwrap().len(), 1);
    }
}
