//! Integration tests for table operations.

use std::fs;

use flatdb_common::{DataType, DatabaseConfig, Value, PAGE_CAPACITY};
use flatdb_storage::{ColumnDefinition, PageHeader, ReadAt, StandardFile};
use flatdb_table::{row, Predicate, Row, Table};
use tempfile::TempDir;

fn user_columns() -> Vec<ColumnDefinition> {
    vec![
        ColumnDefinition::new("id", DataType::Int32),
        ColumnDefinition::nullable("username", DataType::String),
    ]
}

fn user(id: i32, name: &str) -> Row {
    row([("id", Value::Int32(id)), ("username", Value::string(name))])
}

fn create(dir: &TempDir) -> Table {
    let config = DatabaseConfig::for_testing(dir.path());
    let _ = flatdb_common::logging::init_from(&config);
    Table::create(dir.path(), "tb_user", user_columns(), &config).unwrap()
}

/// Reads every page header of a table file.
fn pages(table: &Table) -> Vec<PageHeader> {
    let file = StandardFile::open(table.path()).unwrap();
    let schema = flatdb_storage::column::read_schema(&file).unwrap();
    let mut out = Vec::new();
    let mut offset = schema.payload_start;
    while let Some(page) = PageHeader::read_at(&file, offset).unwrap() {
        offset = page.payload_end();
        out.push(page);
    }
    assert_eq!(offset, file.size().unwrap());
    out
}

#[test]
fn test_insert_select_delete() {
    let dir = TempDir::new().unwrap();
    let mut table = create(&dir);

    assert_eq!(table.insert(&user(1, "bany")).unwrap(), 1);

    let rows = table.select(&Predicate::equals("username", "bany")).unwrap();
    assert_eq!(rows, vec![user(1, "bany")]);

    assert_eq!(table.delete(&Predicate::equals("id", 1i32)).unwrap(), 1);
    assert!(table.select(&Predicate::all()).unwrap().is_empty());
}

#[test]
fn test_select_filters() {
    let dir = TempDir::new().unwrap();
    let mut table = create(&dir);

    for (id, name) in [(1, "a"), (2, "b"), (3, "a")] {
        table.insert(&user(id, name)).unwrap();
    }

    assert_eq!(table.select(&Predicate::all()).unwrap().len(), 3);
    assert_eq!(
        table.select(&Predicate::equals("username", "a")).unwrap(),
        vec![user(1, "a"), user(3, "a")]
    );
    assert_eq!(
        table
            .select(&Predicate::equals("username", "a").and_eq("id", 3i32))
            .unwrap(),
        vec![user(3, "a")]
    );
    assert!(table
        .select(&Predicate::equals("username", "zzz"))
        .unwrap()
        .is_empty());
    assert!(table.select(&Predicate::equals("email", "a")).is_err());
}

#[test]
fn test_tombstone_keeps_file_length() {
    let dir = TempDir::new().unwrap();
    let mut table = create(&dir);

    for id in 1..=4 {
        table.insert(&user(id, "u")).unwrap();
    }
    let len_before = fs::metadata(table.path()).unwrap().len();

    assert_eq!(table.delete(&Predicate::equals("id", 2i32)).unwrap(), 1);
    assert_eq!(fs::metadata(table.path()).unwrap().len(), len_before);

    let ids: Vec<Value> = table
        .select(&Predicate::all())
        .unwrap()
        .into_iter()
        .map(|r| r["id"].clone())
        .collect();
    assert_eq!(ids, vec![Value::Int32(1), Value::Int32(3), Value::Int32(4)]);

    // deleting again finds nothing
    assert_eq!(table.delete(&Predicate::equals("id", 2i32)).unwrap(), 0);
}

#[test]
fn test_update_merges_fields() {
    let dir = TempDir::new().unwrap();
    let mut table = create(&dir);

    table.insert(&user(1, "bany")).unwrap();
    table.insert(&user(2, "other")).unwrap();

    let updated = table
        .update(&Predicate::equals("id", 1i32), &row([("username", "x")]))
        .unwrap();
    assert_eq!(updated, 1);

    assert_eq!(
        table.select(&Predicate::equals("id", 1i32)).unwrap(),
        vec![user(1, "x")]
    );
    assert_eq!(
        table.select(&Predicate::equals("id", 2i32)).unwrap(),
        vec![user(2, "other")]
    );
    assert_eq!(table.select(&Predicate::all()).unwrap().len(), 2);
}

#[test]
fn test_update_to_null() {
    let dir = TempDir::new().unwrap();
    let mut table = create(&dir);

    table.insert(&user(1, "bany")).unwrap();
    table
        .update(&Predicate::all(), &row([("username", Value::Null)]))
        .unwrap();

    assert_eq!(
        table.select(&Predicate::all()).unwrap(),
        vec![row([("id", Value::Int32(1)), ("username", Value::Null)])]
    );
}

#[test]
fn test_small_records_share_a_page() {
    let dir = TempDir::new().unwrap();
    let mut table = create(&dir);

    // 5 + 9 + 9 = 23 bytes each; five of them fill 115 of 128 bytes
    for id in 0..5 {
        table.insert(&user(id, "abcd")).unwrap();
    }
    let layout = pages(&table);
    assert_eq!(layout.len(), 1);
    assert_eq!(layout[0].used, 115);

    // the sixth does not fit and opens a new page
    table.insert(&user(5, "abcd")).unwrap();
    let layout = pages(&table);
    assert_eq!(layout.len(), 2);
    assert_eq!(layout[0].used, 115);
    assert_eq!(layout[1].used, 23);
    assert!(layout.iter().all(|p| p.used as usize <= PAGE_CAPACITY));
}

#[test]
fn test_first_fit_reuses_earlier_page() {
    let dir = TempDir::new().unwrap();
    let mut table = create(&dir);

    // 5 + 9 + (5 + 80) = 99 bytes: one per page
    let long = "x".repeat(80);
    table.insert(&user(1, &long)).unwrap();
    table.insert(&user(2, &long)).unwrap();
    assert_eq!(pages(&table).len(), 2);

    // a small record still fits after the first
    table.insert(&user(3, "ab")).unwrap();
    let layout = pages(&table);
    assert_eq!(layout.len(), 2);
    assert_eq!(layout[0].used, 99 + 21);
    assert_eq!(table.select(&Predicate::all()).unwrap().len(), 3);
}

#[test]
fn test_oversize_record_gets_own_page() {
    let dir = TempDir::new().unwrap();
    let mut table = create(&dir);

    let huge = "y".repeat(300);
    table.insert(&user(1, "a")).unwrap();
    table.insert(&user(2, &huge)).unwrap();
    table.insert(&user(3, "b")).unwrap();

    let layout = pages(&table);
    assert_eq!(layout.len(), 2);
    assert_eq!(layout[1].used, 5 + 9 + 5 + 300);
    assert_eq!(
        table.select(&Predicate::equals("id", 2i32)).unwrap(),
        vec![user(2, &huge)]
    );
    assert_eq!(table.select(&Predicate::all()).unwrap().len(), 3);
}

#[test]
fn test_reopen_reads_schema_and_rows() {
    let dir = TempDir::new().unwrap();
    let path = {
        let mut table = create(&dir);
        table.insert(&user(1, "a")).unwrap();
        table.insert(&user(2, "b")).unwrap();
        table.path().to_path_buf()
    };

    let config = DatabaseConfig::for_testing(dir.path());
    let table = Table::open(&path, &config).unwrap();
    assert_eq!(table.name(), "tb_user");
    assert_eq!(table.columns(), user_columns().as_slice());
    assert_eq!(table.select(&Predicate::all()).unwrap().len(), 2);
}

#[test]
fn test_open_missing_file() {
    let dir = TempDir::new().unwrap();
    let config = DatabaseConfig::for_testing(dir.path());
    assert!(Table::open(dir.path().join("nope.bin"), &config).is_err());
}

#[test]
fn test_create_removes_nothing_on_existing() {
    let dir = TempDir::new().unwrap();
    let mut table = create(&dir);
    table.insert(&user(1, "a")).unwrap();

    let config = DatabaseConfig::for_testing(dir.path());
    assert!(Table::create(dir.path(), "tb_user", user_columns(), &config).is_err());

    // the existing table is untouched
    assert_eq!(table.select(&Predicate::all()).unwrap().len(), 1);
}
