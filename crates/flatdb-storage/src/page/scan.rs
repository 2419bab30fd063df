//! Sequential scans over pages and the records inside them.

use super::header::PageHeader;
use crate::column::ColumnDefinition;
use crate::error::StorageResult;
use crate::file::ReadAt;
use crate::record::{decode_one, ScannedRecord};

/// Iterator over the page headers of a table file.
pub struct PageIter<'a, R: ReadAt + ?Sized> {
    src: &'a R,
    offset: u64,
    done: bool,
}

impl<'a, R: ReadAt + ?Sized> PageIter<'a, R> {
    /// Starts at the first page header, found at `payload_start`.
    pub fn new(src: &'a R, payload_start: u64) -> Self {
        Self {
            src,
            offset: payload_start,
            done: false,
        }
    }
}

impl<R: ReadAt + ?Sized> Iterator for PageIter<'_, R> {
    type Item = StorageResult<PageHeader>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match PageHeader::read_at(self.src, self.offset) {
            Ok(Some(page)) => {
                self.offset = page.payload_end();
                Some(Ok(page))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Iterator over the live records of a table file, in file order.
///
/// Tombstones are skipped. The first error ends the iteration.
pub struct RecordScan<'a, R: ReadAt + ?Sized> {
    src: &'a R,
    columns: &'a [ColumnDefinition],
    pages: PageIter<'a, R>,
    current: Option<(u64, u64)>,
    done: bool,
}

impl<'a, R: ReadAt + ?Sized> RecordScan<'a, R> {
    /// Scans the pages that start at `payload_start`.
    pub fn new(src: &'a R, payload_start: u64, columns: &'a [ColumnDefinition]) -> Self {
        Self {
            src,
            columns,
            pages: PageIter::new(src, payload_start),
            current: None,
            done: false,
        }
    }

    fn advance(&mut self) -> StorageResult<Option<ScannedRecord>> {
        loop {
            let (pos, end) = match self.current {
                Some(range) => range,
                None => match self.pages.next() {
                    Some(page) => {
                        let page = page?;
                        (page.payload_start(), page.payload_end())
                    }
                    None => return Ok(None),
                },
            };

            match decode_one(self.src, pos, end, self.columns)? {
                Some(record) => {
                    self.current = Some((record.end(), end));
                    return Ok(Some(record));
                }
                None => {
                    if end > self.src.size()? {
                        // the file stops inside this page
                        return Ok(None);
                    }
                    self.current = None;
                }
            }
        }
    }
}

impl<R: ReadAt + ?Sized> Iterator for RecordScan<'_, R> {
    type Item = StorageResult<ScannedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.advance().transpose();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{encode_schema, read_schema};
    use crate::file::{StandardFile, WriteAt};
    use crate::page::PageAllocator;
    use crate::record::{encode_record, tombstone, RecordMarker};
    use flatdb_common::{DataType, SyncPolicy, Value};
    use tempfile::TempDir;

    fn columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("id", DataType::Int32),
            ColumnDefinition::nullable("username", DataType::String),
        ]
    }

    fn setup() -> (TempDir, StandardFile, u64) {
        let dir = TempDir::new().unwrap();
        let file = StandardFile::create_new(dir.path().join("t.bin")).unwrap();
        let header = encode_schema(&columns()).unwrap();
        file.write_all_at(&header, 0).unwrap();
        (dir, file, header.len() as u64)
    }

    fn insert(alloc: &PageAllocator<'_>, id: i32, name: &str) -> u64 {
        let bytes = encode_record(
            RecordMarker::Active,
            &[Value::Int32(id), Value::string(name)],
        )
        .unwrap();
        alloc.write_record(&bytes).unwrap()
    }

    #[test]
    fn test_empty_table() {
        let (_dir, file, start) = setup();
        let cols = columns();
        assert_eq!(RecordScan::new(&file, start, &cols).count(), 0);
        assert_eq!(read_schema(&file).unwrap().payload_start, start);
    }

    #[test]
    fn test_scan_across_pages() {
        let (_dir, file, start) = setup();
        let cols = columns();
        let alloc = PageAllocator::new(&file, start).with_sync_policy(SyncPolicy::Never);

        // each record is 5 + 9 + 5 + 6 = 25 bytes: five fit in a page
        for id in 0..12 {
            insert(&alloc, id, "user00");
        }

        let pages: Vec<_> = PageIter::new(&file, start).map(Result::unwrap).collect();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].used, 125);

        let ids: Vec<_> = RecordScan::new(&file, start, &cols)
            .map(|r| r.unwrap().values[0].clone())
            .collect();
        assert_eq!(ids, (0..12).map(Value::Int32).collect::<Vec<_>>());
    }

    #[test]
    fn test_scan_skips_tombstones() {
        let (_dir, file, start) = setup();
        let cols = columns();
        let alloc = PageAllocator::new(&file, start).with_sync_policy(SyncPolicy::Never);

        insert(&alloc, 1, "a");
        let victim = insert(&alloc, 2, "b");
        insert(&alloc, 3, "c");
        tombstone(&file, victim).unwrap();

        let ids: Vec<_> = RecordScan::new(&file, start, &cols)
            .map(|r| r.unwrap().values[0].clone())
            .collect();
        assert_eq!(ids, vec![Value::Int32(1), Value::Int32(3)]);
    }

    #[test]
    fn test_scan_reports_offsets() {
        let (_dir, file, start) = setup();
        let cols = columns();
        let alloc = PageAllocator::new(&file, start).with_sync_policy(SyncPolicy::Never);

        let a = insert(&alloc, 1, "a");
        let b = insert(&alloc, 2, "bb");
        let offsets: Vec<_> = RecordScan::new(&file, start, &cols)
            .map(|r| r.unwrap().offset)
            .collect();
        assert_eq!(offsets, vec![a, b]);
    }

    #[test]
    fn test_corrupt_page_marker_stops_scan() {
        let (_dir, file, start) = setup();
        let cols = columns();
        let alloc = PageAllocator::new(&file, start).with_sync_policy(SyncPolicy::Never);
        insert(&alloc, 1, "a");
        file.write_all_at(&[42], start).unwrap();

        let results: Vec<_> = RecordScan::new(&file, start, &cols).collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].as_ref().unwrap_err().is_corruption());
    }
}
